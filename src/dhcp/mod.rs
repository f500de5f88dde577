//! DHCP option byte codec.
//!
//! - [`hex`] - hex text form and IPv4 byte helpers
//! - [`tlv`] - generic type/length/value records
//! - [`route121`] - Option 121 classless static routes
//! - [`domain119`] - Option 119 domain search list
//! - [`vendor`] - Option 43 vendor templates
//! - [`options`] - standard option table

mod domain119;
mod hex;
mod options;
mod route121;
mod tlv;
mod vendor;

pub use domain119::{decode_option_119, encode_domain_name, encode_option_119};
pub use hex::{bytes_to_hex, bytes_to_ip, hex_to_bytes, ip_to_bytes, ip_to_hex};
pub use options::{
    encode_option, encode_option_value, standard_option, OptionKind, OptionValue,
    StandardOption, STANDARD_OPTIONS,
};
pub use route121::{decode_option_121, encode_option_121, encode_route_121, Route};
pub use tlv::{decode_tlv, encode_tlv, Tlv};
pub use vendor::{VendorConfig, VendorField, VendorInfo, VendorTemplate};
