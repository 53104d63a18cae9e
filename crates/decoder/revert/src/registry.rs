use std::collections::HashMap;

use quill_abi::{Function, ParseError};

/// Custom errors known to the caller, keyed by selector.
#[derive(Clone, Debug, Default)]
pub struct CustomErrorRegistry {
    errors: HashMap<[u8; 4], Function>,
}

impl CustomErrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from error signatures such as
    /// `InsufficientBalance(uint256,uint256)`.
    pub fn from_signatures<I, S>(signatures: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for signature in signatures {
            registry.register(signature.as_ref())?;
        }
        Ok(registry)
    }

    /// Registers an error signature, returning its selector. A leading
    /// `error` keyword and parameter names are accepted.
    ///
    /// Registering a second error with the same selector replaces the first.
    pub fn register(&mut self, signature: &str) -> Result<[u8; 4], ParseError> {
        let trimmed = signature.trim();
        let trimmed = trimmed.strip_prefix("error ").unwrap_or(trimmed);

        let error = Function::parse(trimmed)?;
        let selector = error.selector();

        if let Some(previous) = self.errors.insert(selector, error) {
            log::debug!(
                "Custom error `{}` replaced `{}` in the registry",
                trimmed,
                previous.signature()
            );
        }

        Ok(selector)
    }

    pub fn get(&self, selector: &[u8; 4]) -> Option<&Function> {
        self.errors.get(selector)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_by_selector() -> anyhow::Result<()> {
        let registry = CustomErrorRegistry::from_signatures([
            "InsufficientBalance(uint256,uint256)",
            "error Unauthorized(address caller)",
        ])?;

        assert_eq!(registry.len(), 2);

        let error = registry
            .get(&[0xcf, 0x47, 0x91, 0x81])
            .expect("registered above");
        assert_eq!(error.signature(), "InsufficientBalance(uint256,uint256)");

        let selector = quill_abi::selector("Unauthorized(address)");
        assert_eq!(
            registry.get(&selector).map(|error| error.name.as_str()),
            Some("Unauthorized")
        );

        Ok(())
    }

    #[test]
    fn rejects_malformed_signature() {
        assert!(CustomErrorRegistry::from_signatures(["Broken(uint256"]).is_err());
    }
}
