//! Single-byte type, single-byte length records.

use crate::error::DhcpError;
use serde::{Deserialize, Serialize};

/// One `[type, length, value...]` record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    #[serde(rename = "type")]
    pub code: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    pub fn new(code: u8, value: &[u8]) -> Tlv {
        Tlv {
            code,
            value: value.to_vec(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, DhcpError> {
        encode_tlv(self.code, &self.value)
    }
}

/// `[code, len, value...]`. A value longer than 255 bytes cannot be
/// represented.
pub fn encode_tlv(code: u8, value: &[u8]) -> Result<Vec<u8>, DhcpError> {
    let length = u8::try_from(value.len()).map_err(|_| DhcpError::ValueTooLong(value.len()))?;
    let mut bytes = Vec::with_capacity(value.len() + 2);
    bytes.push(code);
    bytes.push(length);
    bytes.extend_from_slice(value);
    Ok(bytes)
}

/// Split a concatenation of TLVs. Fails if any record runs past the end.
pub fn decode_tlv(bytes: &[u8]) -> Result<Vec<Tlv>, DhcpError> {
    let mut records = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let length = *bytes.get(i + 1).ok_or(DhcpError::TruncatedTlv { offset: i })? as usize;
        let value = bytes
            .get(i + 2..i + 2 + length)
            .ok_or(DhcpError::TruncatedTlv { offset: i })?;
        records.push(Tlv::new(bytes[i], value));
        i += 2 + length;
    }
    Ok(records)
}
