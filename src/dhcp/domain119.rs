//! Option 119, domain search list (RFC 3397) without compression pointers.

use crate::error::DhcpError;

const MAX_LABEL: usize = 63;

/// `[len, label...]*` followed by a zero byte. A trailing dot is ignored.
pub fn encode_domain_name(domain: &str) -> Result<Vec<u8>, DhcpError> {
    let mut bytes = Vec::with_capacity(domain.len() + 2);
    for label in domain.trim().trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        if label.len() > MAX_LABEL {
            return Err(DhcpError::LabelTooLong(label.to_string()));
        }
        bytes.push(label.len() as u8);
        bytes.extend_from_slice(label.as_bytes());
    }
    bytes.push(0);
    Ok(bytes)
}

/// Concatenated encodings. A domain with an oversized label is left out.
pub fn encode_option_119<S: AsRef<str>>(domains: &[S]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for domain in domains {
        match encode_domain_name(domain.as_ref()) {
            Ok(encoded) => bytes.extend(encoded),
            Err(e) => log::warn!("Skipping Option 119 domain '{}': {e}", domain.as_ref()),
        }
    }
    bytes
}

/// Inverse of [`encode_option_119`].
pub fn decode_option_119(bytes: &[u8]) -> Result<Vec<String>, DhcpError> {
    let mut domains = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let length = usize::from(bytes[i]);
        if length == 0 {
            domains.push(labels.join("."));
            labels.clear();
            i += 1;
            continue;
        }
        if length > MAX_LABEL {
            return Err(DhcpError::InvalidLabelLength {
                length: bytes[i],
                offset: i,
            });
        }
        let label = bytes
            .get(i + 1..i + 1 + length)
            .ok_or(DhcpError::TruncatedLabel { offset: i })?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        i += 1 + length;
    }
    if !labels.is_empty() {
        return Err(DhcpError::TruncatedLabel { offset: bytes.len() });
    }
    Ok(domains)
}
