//! MIME type content negotiation.
//!
//! This module parses `Accept`-style header values into weighted lists and
//! picks the best representation a server can offer for a client.
//!
//! Weights are kept as integer tenths (`0..=10`), so the score of a
//! server/client pair is their product in `0..=100`.

mod list;
mod tests;

pub use list::{compare_types, negotiate_type, NegotiationList, Preference, Quality};
