use alloy_primitives::U256;

/// Returns the description of a Solidity panic code, or `None` if the code
/// is not one the compiler emits.
pub fn panic_reason(code: &U256) -> Option<&'static str> {
    let code = u64::try_from(*code).ok()?;

    let reason = match code {
        0x1 => "Assertion error",
        0x11 => "Arithmetic operation overflowed outside of an unchecked block",
        0x12 => "Division or modulo division by zero",
        0x21 => "Tried to convert a value into an enum, but the value was too big or negative",
        0x22 => "Incorrectly encoded storage byte array",
        0x31 => ".pop() was called on an empty array",
        0x32 => "Array accessed at an out-of-bounds or negative index",
        0x41 => "Too much memory was allocated, or an array was created that is too large",
        0x51 => "Called a zero-initialized variable of internal function type",
        _ => return None,
    };

    Some(reason)
}

pub(crate) fn panic_message(code: &U256) -> String {
    match panic_reason(code) {
        Some(reason) => format!("reverted with panic code 0x{code:x} ({reason})"),
        None => format!("reverted with unknown panic code 0x{code:x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_includes_reason() {
        assert_eq!(
            panic_message(&U256::from(0x12)),
            "reverted with panic code 0x12 (Division or modulo division by zero)"
        );
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(panic_reason(&U256::from(0x99)), None);
        assert_eq!(
            panic_message(&U256::from(0x99)),
            "reverted with unknown panic code 0x99"
        );
        assert_eq!(panic_reason(&U256::MAX), None);
    }
}
