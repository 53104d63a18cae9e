use quill_primitives::Address;
use quill_rlp::{BufMut, Encodable, Header};

/// An RLP list of heterogeneous fields, encoded in order.
pub(crate) struct RlpFields<'a>(pub Vec<&'a dyn Encodable>);

impl RlpFields<'_> {
    fn header(&self) -> Header {
        Header {
            list: true,
            payload_length: self.0.iter().map(|field| field.length()).sum(),
        }
    }
}

impl Encodable for RlpFields<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.header().encode(out);

        for field in &self.0 {
            field.encode(out);
        }
    }

    fn length(&self) -> usize {
        let header = self.header();
        header.length() + header.payload_length
    }
}

/// The `to` field: the address, or the empty string for contract creation.
pub(crate) fn recipient(to: Option<&Address>) -> &dyn Encodable {
    match to {
        Some(address) => address,
        None => &[0u8; 0],
    }
}

/// RLP-encodes the provided value and prepends it with the provided type.
pub(crate) fn enveloped<T: Encodable + ?Sized>(id: u8, value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + value.length());
    out.push(id);
    value.encode(&mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_creation_recipient_is_empty_string() {
        assert_eq!(quill_rlp::encode(recipient(None)), vec![0x80]);

        let address = Address::new([0x11; 20]);
        assert_eq!(
            quill_rlp::encode(recipient(Some(&address))),
            quill_rlp::encode(&address)
        );
    }

    #[test]
    fn fields_are_wrapped_in_a_list() {
        let fields = RlpFields(vec![&1u64 as &dyn Encodable, &[0u8; 0]]);

        assert_eq!(fields.length(), 3);
        assert_eq!(quill_rlp::encode(&fields), vec![0xc2, 0x01, 0x80]);
        assert_eq!(enveloped(0x02, &fields), vec![0x02, 0xc2, 0x01, 0x80]);
    }
}
