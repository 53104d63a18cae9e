use quill_primitives::keccak256;

use crate::{
    AbiValue, DecodeError, EncodeError, ParseError, TypeSchema, decode, encode,
    schema::split_top_level,
};

/// Returns the first four bytes of the Keccak-256 hash of a canonical
/// signature such as `transfer(address,uint256)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// A contract function: its name, input types, and optionally its output
/// types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameter types
    pub inputs: Vec<TypeSchema>,
    /// Output parameter types, when known
    pub outputs: Option<Vec<TypeSchema>>,
}

impl Function {
    /// Parses a human-readable signature.
    ///
    /// Accepts canonical signatures (`transfer(address,uint256)`), named
    /// parameters (`transfer(address to, uint256 amount)`), an optional
    /// `function` keyword, and outputs either as `returns (bool)` or as a
    /// trailing group (`balanceOf(address)(uint256)`).
    pub fn parse(signature: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidSignature(signature.to_string());

        let trimmed = signature.trim();
        let trimmed = trimmed.strip_prefix("function ").unwrap_or(trimmed).trim_start();
        let (name, inputs, rest) = split_signature(trimmed).ok_or_else(invalid)?;

        let inputs = parse_params(inputs)?
            .into_iter()
            .map(|(schema, _)| schema)
            .collect();

        let outputs = match rest.find('(') {
            Some(open) => {
                let group = &rest[open..];
                let close = matching_paren(group).ok_or_else(invalid)?;
                Some(
                    parse_params(&group[1..close])?
                        .into_iter()
                        .map(|(schema, _)| schema)
                        .collect(),
                )
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            inputs,
            outputs,
        })
    }

    /// Returns the canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, TypeSchema::Tuple(self.inputs.clone()))
    }

    /// Returns the 4-byte selector.
    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }

    /// Encodes a call: the selector followed by the encoded arguments.
    pub fn encode_call(&self, args: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
        if args.len() != self.inputs.len() {
            return Err(EncodeError::ArgumentCount {
                expected: self.inputs.len(),
                actual: args.len(),
            });
        }

        for (index, (arg, expected)) in args.iter().zip(&self.inputs).enumerate() {
            let actual = arg.schema();
            if actual != *expected {
                return Err(EncodeError::ArgumentMismatch {
                    index,
                    expected: expected.canonical(),
                    actual: actual.canonical(),
                });
            }
        }

        let mut call = self.selector().to_vec();
        call.extend(encode(args)?);
        Ok(call)
    }

    /// Decodes call data produced by [`Function::encode_call`].
    pub fn decode_input(&self, calldata: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        let expected = self.selector();
        match calldata.split_at_checked(4) {
            Some((selector, params)) if selector == expected => decode(params, &self.inputs),
            _ => Err(DecodeError::SelectorMismatch { expected }),
        }
    }

    /// Decodes return data. A function without declared outputs decodes to
    /// no values.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        decode(data, self.outputs.as_deref().unwrap_or_default())
    }
}

/// Parses `signature` and encodes a call with `args`.
pub fn encode_function(signature: &str, args: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
    Function::parse(signature)?.encode_call(args)
}

/// Splits `name(params) rest` into its three parts.
pub(crate) fn split_signature(signature: &str) -> Option<(&str, &str, &str)> {
    let open = signature.find('(')?;
    let name = signature[..open].trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_' || character == '$')
    {
        return None;
    }

    let group = &signature[open..];
    let close = matching_paren(group)?;
    Some((name, &group[1..close], group[close + 1..].trim()))
}

/// Returns the index of the parenthesis closing the one at index 0.
fn matching_paren(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, character) in input.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses a comma-separated parameter list, returning each parameter's type
/// and the words after it (modifiers and name).
pub(crate) fn parse_params(params: &str) -> Result<Vec<(TypeSchema, &str)>, ParseError> {
    split_top_level(params)?
        .into_iter()
        .map(parse_param)
        .collect()
}

fn parse_param(param: &str) -> Result<(TypeSchema, &str), ParseError> {
    let param = param.trim();
    let param = param
        .strip_prefix("tuple")
        .filter(|rest| rest.starts_with('('))
        .unwrap_or(param);

    if !param.starts_with('(') {
        let (ty, rest) = param
            .split_once(char::is_whitespace)
            .unwrap_or((param, ""));
        return Ok((TypeSchema::parse(ty)?, rest.trim()));
    }

    let close = matching_paren(param).ok_or_else(|| ParseError::Unbalanced(param.to_string()))?;
    let components = parse_params(&param[1..close])?
        .into_iter()
        .map(|(schema, _)| schema)
        .collect();

    let after = &param[close + 1..];
    let suffix_end = after
        .find(|character: char| !(character == '[' || character == ']' || character.is_ascii_digit()))
        .unwrap_or(after.len());

    let schema = apply_array_suffixes(TypeSchema::Tuple(components), &after[..suffix_end])?;
    Ok((schema, after[suffix_end..].trim()))
}

/// Wraps `schema` in one array layer per `[]` or `[N]` group, innermost
/// first.
fn apply_array_suffixes(mut schema: TypeSchema, suffixes: &str) -> Result<TypeSchema, ParseError> {
    let mut rest = suffixes;
    while let Some(group) = rest.strip_prefix('[') {
        let close = group
            .find(']')
            .ok_or_else(|| ParseError::Unbalanced(suffixes.to_string()))?;
        let length = &group[..close];

        schema = if length.is_empty() {
            TypeSchema::Array(Box::new(schema))
        } else {
            let length = length
                .parse()
                .map_err(|_error| ParseError::UnknownType(suffixes.to_string()))?;
            TypeSchema::FixedArray(Box::new(schema), length)
        };
        rest = &group[close + 1..];
    }

    if rest.is_empty() {
        Ok(schema)
    } else {
        Err(ParseError::Unbalanced(suffixes.to_string()))
    }
}
