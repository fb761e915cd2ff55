//! RFC 6265-style cookie parsing and serialization.

use super::{Codec, ParseOptions};
use crate::error::{CookieError, Result};
use crate::types::CookieAttributes;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Characters escaped in cookie values (the `encodeURIComponent` set).
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// IMF-fixdate, as used by the `Expires` attribute.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Default codec for the cookie wire format.
#[derive(Clone, Copy, Debug, Default)]
pub struct WireCodec;

impl Codec for WireCodec {
    fn parse(&self, raw: &str, options: &ParseOptions) -> BTreeMap<String, String> {
        let mut cookies = BTreeMap::new();

        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || cookies.contains_key(name) {
                continue;
            }

            let value = unquote(value.trim());
            let value = if options.percent_decode && value.contains('%') {
                match percent_decode_str(value).decode_utf8() {
                    Ok(decoded) => decoded.into_owned(),
                    Err(_) => value.to_string(),
                }
            } else {
                value.to_string()
            };

            cookies.insert(name.to_string(), value);
        }

        cookies
    }

    fn serialize(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<String> {
        if !is_token(name) {
            return Err(CookieError::InvalidName(name.to_string()));
        }

        let mut line = format!("{}={}", name, utf8_percent_encode(value, VALUE_ENCODE_SET));

        if let Some(max_age) = attributes.max_age {
            let _ = write!(line, "; Max-Age={}", max_age);
        }
        if let Some(ref domain) = attributes.domain {
            check_field("domain", domain)?;
            let _ = write!(line, "; Domain={}", domain);
        }
        if let Some(ref path) = attributes.path {
            check_field("path", path)?;
            let _ = write!(line, "; Path={}", path);
        }
        if let Some(expires) = attributes.expires {
            let _ = write!(line, "; Expires={}", expires.format(EXPIRES_FORMAT));
        }
        if attributes.http_only {
            line.push_str("; HttpOnly");
        }
        if attributes.secure {
            line.push_str("; Secure");
        }
        if let Some(same_site) = attributes.same_site {
            let _ = write!(line, "; SameSite={}", same_site);
        }

        Ok(line)
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// RFC 2616 token: visible ASCII minus separators.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            (0x21..=0x7e).contains(&b) && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

fn check_field(attribute: &'static str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c == '\t' || (c >= ' ' && c != '\u{7f}' && c != ';'));
    if valid {
        Ok(())
    } else {
        Err(CookieError::InvalidAttribute {
            attribute,
            value: value.to_string(),
        })
    }
}
