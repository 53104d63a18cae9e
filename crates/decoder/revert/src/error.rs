use std::fmt;

use alloy_primitives::U256;
use quill_abi::AbiValue;

/// How a revert payload was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevertKind {
    /// `Error(string)`, emitted by `require` and `revert("...")`
    ErrorString,
    /// `Panic(uint256)`, emitted by compiler-inserted checks
    Panic,
    /// A custom error found in the registry
    Custom,
    /// Anything else, including malformed payloads
    Unknown,
}

/// A custom error decoded against its registered signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCustomError {
    pub name: String,
    /// Canonical signature, e.g. `InsufficientBalance(uint256,uint256)`
    pub signature: String,
    pub args: Vec<AbiValue>,
}

impl fmt::Display for DecodedCustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// A decoded revert.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("execution reverted{}", reason_suffix(.reason))]
pub struct RevertError {
    pub kind: RevertKind,
    /// Human-readable reason; `None` when the payload is not understood
    pub reason: Option<String>,
    /// The revert data exactly as received
    pub raw_hex: String,
    /// Set for [`RevertKind::Panic`]
    pub panic_code: Option<U256>,
    /// Set for [`RevertKind::Custom`]
    pub custom_error: Option<DecodedCustomError>,
}

impl RevertError {
    /// An unclassified revert that keeps its raw data.
    pub fn unknown(raw_hex: impl Into<String>) -> Self {
        Self {
            kind: RevertKind::Unknown,
            reason: None,
            raw_hex: raw_hex.into(),
            panic_code: None,
            custom_error: None,
        }
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}
