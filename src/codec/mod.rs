//! Cookie wire codec and value encoding.
//!
//! The [`Codec`] trait is the seam between the store and the cookie
//! grammar: it turns the host's raw cookie text into a name/value map and
//! turns a single record plus attributes into one `Set-Cookie`-style line.
//! [`WireCodec`] is the default RFC 6265-style implementation.
//!
//! Value decoding (raw string to structured JSON) lives in [`decode_value`]
//! and never fails.

mod value;
mod wire;

pub use value::decode_value;
pub use wire::WireCodec;

use crate::error::Result;
use crate::types::CookieAttributes;
use std::collections::BTreeMap;

/// Options for parsing raw cookie text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Percent-decode values. Values that do not decode to UTF-8 are kept as-is.
    pub percent_decode: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            percent_decode: true,
        }
    }
}

/// Parses and serializes the cookie wire format.
pub trait Codec: Send + Sync {
    /// Parse raw cookie text (`a=1; b=2`) into a name/value map.
    ///
    /// Parsing is lenient: malformed pairs are skipped, never reported.
    fn parse(&self, raw: &str, options: &ParseOptions) -> BTreeMap<String, String>;

    /// Serialize one record with its attributes into a wire line.
    fn serialize(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<String>;
}
