//! Query string and form argument decoding.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::headers::HeaderList;

/// Characters left as-is by [`url_escape`]: the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Decode `%XX` escapes. Invalid escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn url_unescape(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Percent-encode everything except unreserved characters, for use inside a
/// query component.
pub fn url_escape(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

fn decode_component(input: &str) -> String {
    url_unescape(&input.replace('+', " "))
}

/// Parse `key=value` pairs separated by `&` or `;` into `arguments`.
///
/// A pair without `=` is added as a flag with no value. Keys and values are
/// percent-decoded and `+` decodes to a space. Pairs with an empty key are
/// dropped.
pub fn parse_arguments(input: &str, arguments: &mut HeaderList) {
    for pair in input.split(['&', ';']) {
        match pair.split_once('=') {
            Some((key, value)) => arguments.add(decode_component(key), decode_component(value)),
            None => arguments.add_flag(decode_component(pair)),
        }
    }
}
