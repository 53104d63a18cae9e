use quill_primitives::Address;
#[allow(deprecated)]
// This is test code, it's ok to use `DangerousSecretKeyStr`
use quill_signer::{DangerousSecretKeyStr, public_key_to_address};
pub use quill_signer::{SecretKey, SignatureError};

/// Secret key of the first default Hardhat/Anvil account,
/// `0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266`.
pub const HARDHAT_SECRET_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address belonging to [`HARDHAT_SECRET_KEY`].
pub const HARDHAT_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// Converts a hex string to a secret key.
pub fn secret_key_from_str(secret_key: &str) -> Result<SecretKey, SignatureError> {
    // This is test code, it's ok to use `DangerousSecretKeyStr`
    #[allow(deprecated)]
    quill_signer::secret_key_from_str(DangerousSecretKeyStr(secret_key))
}

/// Converts a secret key in a hex string format to an address.
///
/// Note that this function is in `quill_test_utils` to restrict opportunities
/// for misuse. In production code there should be only one place where secret
/// keys are parsed from string to avoid potential leakage into logs and error
/// messages.
///
/// # Examples
///
/// ```
/// use quill_test_utils::secret_key::{HARDHAT_SECRET_KEY, secret_key_to_address};
///
/// let address = secret_key_to_address(HARDHAT_SECRET_KEY).unwrap();
/// assert_eq!(address.to_string(), quill_test_utils::secret_key::HARDHAT_ADDRESS);
/// ```
pub fn secret_key_to_address(secret_key: &str) -> Result<Address, SignatureError> {
    let secret_key = secret_key_from_str(secret_key)?;
    Ok(public_key_to_address(secret_key.public_key()))
}

/// Converts a secret key to a 0x-prefixed hex string.
pub fn secret_key_to_str(secret_key: &SecretKey) -> String {
    format!("0x{}", hex::encode(secret_key.to_bytes().as_slice()))
}
