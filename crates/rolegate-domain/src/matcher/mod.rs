//! Request path matching against rule path patterns.

mod key_match;
mod key_match_proptest;

pub use key_match::key_match2;
