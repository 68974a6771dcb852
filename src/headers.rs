//! Ordered, case-insensitive header lists.
//!
//! The same list type holds request headers, response headers and the decoded
//! request arguments. Entries keep their insertion order and a key may appear
//! more than once; lookups return the first match.

use std::fmt;

/// A single `key: value` entry. An empty value is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    key: String,
    value: Option<String>,
}

impl Header {
    /// The header name, as it was inserted.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The header value, if one was given.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// An ordered list of headers allowing duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<Header>,
}

/// Whether `text` can be written on a header line as-is.
fn is_single_line(text: &str) -> bool {
    !text.contains(['\r', '\n'])
}

fn stored_value(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl HeaderList {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, even if the key is already present.
    ///
    /// An empty `value` is stored as absent. Empty keys, and keys or values
    /// containing `\r` or `\n`, are ignored.
    pub fn add(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let key = key.into();
        if key.is_empty() || !is_single_line(&key) || !is_single_line(value.as_ref()) {
            return;
        }
        self.entries.push(Header {
            key,
            value: stored_value(value.as_ref()),
        });
    }

    /// Append a key with no value.
    pub fn add_flag(&mut self, key: impl Into<String>) {
        self.add(key, "");
    }

    /// Replace the value of the first header matching `key`, or append a new one.
    ///
    /// A value containing `\r` or `\n` is ignored and leaves the list unchanged.
    pub fn set(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let key = key.into();
        if !is_single_line(value.as_ref()) {
            return;
        }
        match self.position(&key) {
            Some(index) => self.entries[index].value = stored_value(value.as_ref()),
            None => self.add(key, value),
        }
    }

    /// The value of the first header matching `key`.
    ///
    /// Returns `None` both when the key is missing and when it has no value;
    /// use [`HeaderList::exists`] to tell the two apart.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).and_then(|index| self.entries[index].value())
    }

    /// Iterate over the values of every header matching `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.entries
            .iter()
            .filter(move |header| header.key.eq_ignore_ascii_case(key))
            .map(Header::value)
    }

    /// Check whether any header matches `key`.
    pub fn exists(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// The number of entries, duplicates included.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key and value stored at `index`, in insertion order.
    pub fn get_at(&self, index: usize) -> Option<(&str, Option<&str>)> {
        self.entries
            .get(index)
            .map(|header| (header.key(), header.value()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.entries.iter()
    }

    /// Parse a raw `Key: value` line and append it.
    ///
    /// Lines without a colon, or with nothing before it, are dropped. Leading
    /// whitespace is trimmed from the value.
    pub fn parse_line(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        self.add(key, value.trim_start());
    }

    /// Serialize every entry as `key: value\r\n` into `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for header in &self.entries {
            out.extend_from_slice(header.key.as_bytes());
            out.extend_from_slice(b": ");
            if let Some(value) = &header.value {
                out.extend_from_slice(value.as_bytes());
            }
            out.extend_from_slice(b"\r\n");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|header| header.key.eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for HeaderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in &self.entries {
            write!(f, "{}: {}\r\n", header.key, header.value.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_duplicates_in_order() {
        let mut headers = HeaderList::new();
        headers.add("Accept", "text/html");
        headers.add("accept", "text/plain");

        assert_eq!(headers.count(), 2);
        assert_eq!(headers.get_at(0), Some(("Accept", Some("text/html"))));
        assert_eq!(headers.get_at(1), Some(("accept", Some("text/plain"))));
        assert_eq!(headers.get("ACCEPT"), Some("text/html"));
        assert_eq!(headers.get_at(2), None);
    }

    #[test]
    fn test_set_replaces_first_match_only() {
        let mut headers = HeaderList::new();
        headers.add("X-Test", "one");
        headers.add("X-Test", "two");
        headers.set("x-test", "three");

        let values: Vec<_> = headers.get_all("X-Test").collect();
        assert_eq!(values, vec![Some("three"), Some("two")]);
    }

    #[test]
    fn test_set_appends_missing_key() {
        let mut headers = HeaderList::new();
        headers.set("Content-Type", "text/plain");
        assert_eq!(headers.count(), 1);
        assert_eq!(headers.get("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let mut headers = HeaderList::new();
        headers.add("flag", "");

        assert!(headers.exists("flag"));
        assert_eq!(headers.get("flag"), None);
        assert_eq!(headers.get_at(0), Some(("flag", None)));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut headers = HeaderList::new();
        headers.add("", "value");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_line_breaks_are_refused() {
        let mut headers = HeaderList::new();
        headers.add("Location", "/x\r\nSet-Cookie: evil=1");
        headers.add("X-Bad\nKey", "value");
        assert!(headers.is_empty());

        headers.add("Location", "/safe");
        headers.set("location", "/x\nSet-Cookie: evil=1");
        assert_eq!(headers.count(), 1);
        assert_eq!(headers.get("Location"), Some("/safe"));

        let mut out = Vec::new();
        headers.write_to(&mut out);
        assert_eq!(out, b"Location: /safe\r\n");
    }

    #[test]
    fn test_parse_line() {
        let mut headers = HeaderList::new();
        headers.parse_line("Host:   example.com");
        headers.parse_line("X-Time: 12:30:00");
        headers.parse_line("no colon here");
        headers.parse_line(": orphan value");
        headers.parse_line("Empty:");

        assert_eq!(headers.count(), 3);
        assert_eq!(headers.get("host"), Some("example.com"));
        assert_eq!(headers.get("x-time"), Some("12:30:00"));
        assert!(headers.exists("Empty"));
        assert_eq!(headers.get("Empty"), None);
    }

    #[test]
    fn test_write_to() {
        let mut headers = HeaderList::new();
        headers.add("Content-Type", "text/plain");
        headers.add("Connection", "close");

        let mut out = Vec::new();
        headers.write_to(&mut out);
        assert_eq!(out, b"Content-Type: text/plain\r\nConnection: close\r\n");
    }
}
