//! Weighted MIME type lists.

use std::fmt;

/// A quality value (`q=`) stored as tenths, always within `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// `q=1.0`, the weight of an entry without a `q` parameter.
    pub const MAX: Quality = Quality(10);
    /// `q=0.0`.
    pub const MIN: Quality = Quality(0);

    /// Create a quality from a number of tenths, if it is at most 10.
    pub fn new(tenths: u8) -> Option<Self> {
        (tenths <= 10).then_some(Quality(tenths))
    }

    /// Parse a decimal q-value, rounding it to the nearest tenth.
    ///
    /// Only values that parse completely and lie within `[0.0, 1.0]` are accepted.
    pub fn from_q_value(value: &str) -> Option<Self> {
        let q: f64 = value.trim().parse().ok()?;
        if !(0.0..=1.0).contains(&q) {
            return None;
        }
        // In range, so the rounded product fits in 0..=10.
        Some(Quality((q * 10.0).round() as u8))
    }

    /// The weight in tenths.
    pub fn tenths(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::MAX
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// One MIME type together with its weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    mime_type: String,
    quality: Quality,
}

impl Preference {
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// A list of MIME types kept in descending order of weight.
///
/// Entries with equal weights keep the order in which they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationList {
    entries: Vec<Preference>,
}

/// Check whether a client type accepts a server type.
///
/// Only the full wildcard `*/*` is understood; `text/*` style ranges are
/// compared literally.
pub fn compare_types(server_type: &str, client_type: &str) -> bool {
    client_type == "*/*" || server_type == client_type
}

fn parse_quality(params: &str) -> Quality {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .filter_map(|(_, value)| Quality::from_q_value(value))
        .last()
        .unwrap_or(Quality::MAX)
}

impl NegotiationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated `Accept`-style value such as
    /// `text/html,application/xhtml+xml;q=0.9,*/*;q=0.8`.
    ///
    /// A `q` parameter that is missing, unparsable or out of range leaves the
    /// weight at 1.0. Other media type parameters are discarded.
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for token in value.split(',') {
            let (mime_type, params) = token.split_once(';').unwrap_or((token, ""));
            list.insert(mime_type, parse_quality(params));
        }
        list
    }

    /// Insert a type after every entry of equal or greater weight.
    ///
    /// Surrounding whitespace is trimmed; blank types are ignored.
    pub fn insert(&mut self, mime_type: &str, quality: Quality) {
        let mime_type = mime_type.trim();
        if mime_type.is_empty() {
            return;
        }
        let index = self
            .entries
            .iter()
            .position(|entry| entry.quality < quality)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            Preference {
                mime_type: mime_type.to_string(),
                quality,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The type and weight at `index`.
    pub fn get(&self, index: usize) -> Option<(&str, Quality)> {
        self.entries
            .get(index)
            .map(|entry| (entry.mime_type.as_str(), entry.quality))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Preference> {
        self.entries.iter()
    }

    /// Pick the server type that best satisfies the client's list.
    ///
    /// Every compatible (server, client) pair scores the product of their
    /// weights. The first pair, in server order then client order, to reach
    /// the highest score wins. Returns `None` when nothing is compatible.
    pub fn choose<'a>(&'a self, client: &NegotiationList) -> Option<&'a str> {
        let mut best: Option<(u8, &'a str)> = None;

        for offered in &self.entries {
            for accepted in &client.entries {
                if !compare_types(&offered.mime_type, &accepted.mime_type) {
                    continue;
                }
                let score = offered.quality.tenths() * accepted.quality.tenths();
                if best.map_or(true, |(best_score, _)| score > best_score) {
                    best = Some((score, offered.mime_type.as_str()));
                }
            }
        }

        best.map(|(_, mime_type)| mime_type)
    }
}

impl fmt::Display for NegotiationList {
    /// Render the list back into an `Accept`-style value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            f.write_str(&entry.mime_type)?;
            if entry.quality != Quality::MAX {
                write!(f, ";q={}", entry.quality)?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a NegotiationList {
    type Item = &'a Preference;
    type IntoIter = std::slice::Iter<'a, Preference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Choose a representation for an `Accept` header value.
///
/// `server_types` lists what the server can produce, in the same syntax as an
/// `Accept` header. Falls back to `default` when the client sent no `Accept`
/// header or nothing it accepts is on offer.
pub fn negotiate_type(accept: Option<&str>, server_types: &str, default: &str) -> String {
    let Some(accept) = accept.filter(|value| !value.trim().is_empty()) else {
        return default.to_string();
    };
    let server = NegotiationList::parse(server_types);
    let client = NegotiationList::parse(accept);
    server.choose(&client).unwrap_or(default).to_string()
}
