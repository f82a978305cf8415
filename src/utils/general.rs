use regex::Regex;

lazy_static::lazy_static! {
    static ref ADDRESS_REGEX: Regex = Regex::new("^0x[a-fA-F0-9]{40}$").expect("invalid address regex");
}

pub const DEFAULT_ADDRESS: &str = "0xCD8A1c9aCc980ae031456573e34dC05cD7daE6e3";

/// Validates an RSK address: `0x` followed by exactly 40 hex characters, any case.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_REGEX.is_match(address)
}
