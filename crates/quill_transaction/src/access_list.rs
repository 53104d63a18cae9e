use alloy_rlp::{RlpDecodable, RlpDecodableWrapper, RlpEncodable, RlpEncodableWrapper};
use quill_primitives::{Address, Hash};

/// An address and the storage slots a transaction intends to touch in it.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    RlpDecodable,
    RlpEncodable,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<Hash>,
}

/// An EIP-2930 access list.
// `RlpEncodableWrapper` keeps the items from being nested in a second list.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    RlpDecodableWrapper,
    RlpEncodableWrapper,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}

impl From<AccessList> for Vec<AccessListItem> {
    fn from(list: AccessList) -> Self {
        list.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use quill_rlp::{DecodeError, Decoder};

    use super::*;

    #[test]
    fn empty_list_encodes_as_empty_rlp_list() {
        assert_eq!(quill_rlp::encode(&AccessList::default()), vec![0xc0]);
    }

    #[test]
    fn decodes_what_it_encodes() -> anyhow::Result<()> {
        let list = AccessList(vec![
            AccessListItem {
                address: Address::from_str("0x000000000000000000000000000000000000dead")?,
                storage_keys: vec![Hash::ZERO, Hash::new([0x11; 32])],
            },
            AccessListItem {
                address: Address::ZERO,
                storage_keys: Vec::new(),
            },
        ]);

        let encoded = quill_rlp::encode(&list);
        let mut decoder = Decoder::new(&encoded);
        assert_eq!(decoder.decode::<AccessList>()?, list);
        decoder.finish()?;

        Ok(())
    }

    #[test]
    fn rejects_item_with_extra_field() {
        let address = Address::ZERO;
        let keys: Vec<Hash> = Vec::new();
        let extra = 1u64;
        let mut item = Vec::new();
        quill_rlp::encode_list_into::<dyn quill_rlp::Encodable>(
            &[&address, &keys, &extra],
            &mut item,
        );

        let mut list = Vec::new();
        quill_rlp::Header {
            list: true,
            payload_length: item.len(),
        }
        .encode(&mut list);
        list.extend_from_slice(&item);

        assert!(matches!(
            Decoder::new(&list).decode::<AccessList>(),
            Err(DecodeError::ListLengthMismatch { .. })
        ));
    }

    #[test]
    fn serializes_storage_keys_in_camel_case() -> anyhow::Result<()> {
        let item = AccessListItem {
            address: Address::ZERO,
            storage_keys: vec![Hash::ZERO],
        };

        let json = serde_json::to_value(&item)?;
        assert_eq!(
            json["storageKeys"][0],
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );

        Ok(())
    }
}
