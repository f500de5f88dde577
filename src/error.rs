//! Error types shared by the calculators and codecs.
//!
//! Malformed user input gets a distinguishable reason so a caller can show
//! specific guidance. Policy problems (overlaps, cloud minimums) are not
//! errors, see [`crate::processing::PlanWarning`] and
//! [`crate::cloud::HostWarning`].

/// Why an address or CIDR string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    #[error("Missing prefix (expected address/prefix): {0}")]
    MissingPrefix(String),
    #[error("Invalid IPv4 address, expected 4 dotted octets: {0}")]
    InvalidAddress(String),
    #[error("Octets must be 0-255: {0}")]
    OctetOutOfRange(String),
    #[error("Prefix is not a number: {0}")]
    InvalidPrefix(String),
    #[error("Prefix must be 0-{max}: {prefix}")]
    PrefixOutOfRange { prefix: String, max: u8 },
    #[error("Only one '::' is allowed in an IPv6 address: {0}")]
    AmbiguousCompression(String),
    #[error("Invalid IPv6 address: {0}")]
    InvalidIpv6(String),
}

/// Subnet arithmetic that cannot produce a meaningful block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("New prefix /{new_prefix} must be longer than /{prefix} and <= {max}")]
    NewPrefixTooShort { prefix: u8, new_prefix: u8, max: u8 },
    #[error("Next subnet calculation overflowed")]
    Overflow,
    #[error(transparent)]
    Cidr(#[from] CidrError),
}

/// Hard failures of the DHCP byte codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DhcpError {
    #[error("Route at byte {offset} is truncated")]
    TruncatedRoute { offset: usize },
    #[error("Route prefix length {prefix} at byte {offset} is over 32")]
    PrefixTooLong { prefix: u8, offset: usize },
    #[error("TLV at byte {offset} is truncated")]
    TruncatedTlv { offset: usize },
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
    #[error("TLV value of {0} bytes does not fit a single length byte")]
    ValueTooLong(usize),
    #[error("DNS label '{0}' is longer than 63 bytes")]
    LabelTooLong(String),
    #[error("Domain label at byte {offset} is truncated or unterminated")]
    TruncatedLabel { offset: usize },
    #[error("Domain label length {length} at byte {offset} is over 63")]
    InvalidLabelLength { length: u8, offset: usize },
}

/// Share-state string could not be turned back into a state object.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Share state is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Share state is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Share state JSON error at '{path}': {message}")]
    Json { path: String, message: String },
    #[error("Share state is invalid: {0}")]
    Invalid(String),
}
