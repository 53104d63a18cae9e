use quill_primitives::{Hash, keccak256_concat};

/// Hash a message according to EIP-191.
///
/// The data is a UTF-8 encoded string and will be enveloped as follows:
/// `"\x19Ethereum Signed Message:\n" + message.length + message` and hashed
/// using keccak256.
pub fn hash_message<S>(message: S) -> Hash
where
    S: AsRef<[u8]>,
{
    const PREFIX: &str = "\x19Ethereum Signed Message:\n";

    let message = message.as_ref();
    let length = message.len().to_string();

    keccak256_concat([PREFIX.as_bytes(), length.as_bytes(), message])
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn hello_world() -> anyhow::Result<()> {
        assert_eq!(
            hash_message("hello world"),
            Hash::from_str("0xd9eba16ed0ecae432b71fe008c98cc872bb4cc214d3220a36f365326cf807d68")?
        );

        Ok(())
    }
}
