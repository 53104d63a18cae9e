use alloy_primitives::U256;
use quill_abi::{AbiValue, DecodeError, TypeSchema};
use quill_primitives::hex;

use crate::{
    CustomErrorRegistry, DecodedCustomError, ERROR_STRING_SELECTOR, PANIC_SELECTOR, RevertError,
    RevertKind, panic::panic_message,
};

/// Decodes revert payloads, consulting a registry of custom errors.
#[derive(Clone, Debug, Default)]
pub struct RevertDecoder {
    registry: CustomErrorRegistry,
}

impl RevertDecoder {
    pub fn new(registry: CustomErrorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CustomErrorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CustomErrorRegistry {
        &mut self.registry
    }

    /// Classifies hex-encoded revert data. The `0x` prefix is optional.
    ///
    /// Never fails: data that is not valid hex, shorter than a selector, or
    /// not decodable against its selector's schema is returned as
    /// [`RevertKind::Unknown`] with `raw_hex` preserved.
    pub fn decode(&self, raw_hex: &str) -> RevertError {
        match hex::decode(raw_hex) {
            Ok(data) => self.classify(&data, raw_hex.to_string()),
            Err(error) => {
                log::debug!("Revert data is not valid hex: {error}");
                RevertError::unknown(raw_hex)
            }
        }
    }

    /// Classifies raw revert bytes.
    pub fn decode_bytes(&self, data: &[u8]) -> RevertError {
        self.classify(data, hex::encode_prefixed(data))
    }

    fn classify(&self, data: &[u8], raw_hex: String) -> RevertError {
        let Some((selector, payload)) = data.split_first_chunk::<4>() else {
            log::debug!("Revert data of {} bytes has no selector", data.len());
            return RevertError::unknown(raw_hex);
        };

        let decoded = match *selector {
            ERROR_STRING_SELECTOR => decode_error_string(payload).map(|reason| RevertError {
                kind: RevertKind::ErrorString,
                reason: Some(reason),
                raw_hex: raw_hex.clone(),
                panic_code: None,
                custom_error: None,
            }),
            PANIC_SELECTOR => decode_panic_code(payload).map(|code| RevertError {
                kind: RevertKind::Panic,
                reason: Some(panic_message(&code)),
                raw_hex: raw_hex.clone(),
                panic_code: Some(code),
                custom_error: None,
            }),
            _ => {
                let Some(error) = self.registry.get(selector) else {
                    log::debug!(
                        "No custom error registered for selector {}",
                        hex::encode_prefixed(selector)
                    );
                    return RevertError::unknown(raw_hex);
                };

                error.decode_input(data).map(|args| {
                    let custom_error = DecodedCustomError {
                        name: error.name.clone(),
                        signature: error.signature(),
                        args,
                    };

                    RevertError {
                        kind: RevertKind::Custom,
                        reason: Some(custom_error.to_string()),
                        raw_hex: raw_hex.clone(),
                        panic_code: None,
                        custom_error: Some(custom_error),
                    }
                })
            }
        };

        decoded.unwrap_or_else(|error| {
            log::debug!(
                "Failed to decode revert data with selector {}: {error}",
                hex::encode_prefixed(selector)
            );
            RevertError::unknown(raw_hex)
        })
    }
}

/// Classifies revert data without any custom errors registered.
pub fn decode_revert(raw_hex: &str) -> RevertError {
    RevertDecoder::default().decode(raw_hex)
}

fn decode_error_string(payload: &[u8]) -> Result<String, DecodeError> {
    match quill_abi::decode(payload, &[TypeSchema::String])?.pop() {
        Some(AbiValue::String(reason)) => Ok(reason),
        _ => Err(DecodeError::InvalidValue("string".to_string())),
    }
}

fn decode_panic_code(payload: &[u8]) -> Result<U256, DecodeError> {
    quill_abi::decode(payload, &[TypeSchema::UInt(256)])?
        .first()
        .and_then(AbiValue::as_uint)
        .ok_or_else(|| DecodeError::InvalidValue("uint256".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_only_error_string_is_unknown() {
        let revert = decode_revert("0x08c379a0");

        assert_eq!(revert.kind, RevertKind::Unknown);
        assert_eq!(revert.reason, None);
    }

    #[test]
    fn decode_bytes_preserves_hex() {
        let revert = decode_revert_bytes(&[0xde, 0xad, 0xbe, 0xef, 0x01]);

        assert_eq!(revert.kind, RevertKind::Unknown);
        assert_eq!(revert.raw_hex, "0xdeadbeef01");
    }

    fn decode_revert_bytes(data: &[u8]) -> RevertError {
        RevertDecoder::default().decode_bytes(data)
    }
}
