use quill_primitives::{Hash, keccak256};

use crate::{
    AbiValue, DecodeError, ParseError, TypeSchema, decode,
    function::{parse_params, split_signature},
};

/// An event parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventParam {
    /// Parameter type
    pub schema: TypeSchema,
    /// Whether the parameter is stored in a topic rather than in the data.
    pub indexed: bool,
}

/// A contract event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Parameters in declaration order
    pub inputs: Vec<EventParam>,
    /// Anonymous events do not emit their signature hash as the first topic.
    pub anonymous: bool,
}

impl Event {
    /// Parses a signature such as
    /// `Transfer(address indexed from, address indexed to, uint256 value)`.
    pub fn parse(signature: &str) -> Result<Self, ParseError> {
        let trimmed = signature.trim();
        let trimmed = trimmed.strip_prefix("event ").unwrap_or(trimmed).trim_start();
        let (name, params, rest) = split_signature(trimmed)
            .ok_or_else(|| ParseError::InvalidSignature(signature.to_string()))?;

        let inputs = parse_params(params)?
            .into_iter()
            .map(|(schema, modifiers)| EventParam {
                schema,
                indexed: modifiers.split_whitespace().next() == Some("indexed"),
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            inputs,
            anonymous: rest == "anonymous",
        })
    }

    /// Returns the canonical signature, e.g.
    /// `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> String {
        let schemas = self.inputs.iter().map(|param| param.schema.clone()).collect();
        format!("{}{}", self.name, TypeSchema::Tuple(schemas))
    }

    /// Returns the Keccak-256 hash of the signature, emitted as the first
    /// topic of non-anonymous events.
    pub fn topic0(&self) -> Hash {
        keccak256(self.signature().as_bytes())
    }

    /// Decodes a log into the event's values, in declaration order.
    ///
    /// Indexed value types are decoded from their topic. Indexed strings,
    /// byte arrays, arrays, and tuples are only present as their hash, which
    /// is returned as a `bytes32`.
    pub fn decode_log(&self, topics: &[Hash], data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        let indexed_count = self.inputs.iter().filter(|param| param.indexed).count();
        let expected = indexed_count + usize::from(!self.anonymous);
        if topics.len() != expected {
            return Err(DecodeError::TopicCount {
                expected,
                actual: topics.len(),
            });
        }

        let mut topics = topics.iter();
        if !self.anonymous && topics.next() != Some(&self.topic0()) {
            return Err(DecodeError::TopicMismatch);
        }

        let data_schemas: Vec<TypeSchema> = self
            .inputs
            .iter()
            .filter(|param| !param.indexed)
            .map(|param| param.schema.clone())
            .collect();
        let mut data_values = decode(data, &data_schemas)?.into_iter();

        self.inputs
            .iter()
            .map(|param| {
                if param.indexed {
                    let topic = topics.next().ok_or(DecodeError::TopicCount {
                        expected,
                        actual: expected - 1,
                    })?;
                    decode_topic(topic, &param.schema)
                } else {
                    data_values.next().ok_or(DecodeError::InvalidValue(param.schema.canonical()))
                }
            })
            .collect()
    }
}

fn decode_topic(topic: &Hash, schema: &TypeSchema) -> Result<AbiValue, DecodeError> {
    match schema {
        TypeSchema::UInt(_)
        | TypeSchema::Int(_)
        | TypeSchema::Bool
        | TypeSchema::Address
        | TypeSchema::FixedBytes(_) => decode(topic.as_bytes(), std::slice::from_ref(schema))?
            .pop()
            .ok_or_else(|| DecodeError::InvalidValue(schema.canonical())),
        TypeSchema::Bytes
        | TypeSchema::String
        | TypeSchema::Array(_)
        | TypeSchema::FixedArray(..)
        | TypeSchema::Tuple(_) => Ok(AbiValue::bytes32(topic.into_array())),
    }
}
