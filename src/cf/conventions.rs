//! The global `Conventions` attribute.

use crate::data::AttrValue;

/// Name of the global attribute declaring the metadata convention.
pub const CONVENTIONS_ATTR: &str = "Conventions";

/// Convention every converted file declares.
pub const CF_CONVENTIONS: &str = "CF-1.6";

/// State of a dataset's `Conventions` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConventionsStatus {
    /// The attribute is absent.
    Missing,
    /// The attribute already lists CF-1.6.
    Conforming,
    /// The attribute exists with another value (shown as read).
    NonConforming(String),
}

/// Classify the current `Conventions` value.
///
/// Non-string values never conform.
pub fn conventions_status(value: Option<&AttrValue>) -> ConventionsStatus {
    match value {
        None => ConventionsStatus::Missing,
        Some(v) => match v.as_str() {
            Some(s) if tokens(s).any(|t| t == CF_CONVENTIONS) => ConventionsStatus::Conforming,
            _ => ConventionsStatus::NonConforming(v.text.clone()),
        },
    }
}

/// Value to store in place of a non-conforming `Conventions` attribute.
///
/// A different CF version is replaced and other conventions are kept, so
/// `CF-1.4 ACDD-1.3` becomes `CF-1.6 ACDD-1.3`. Without any CF entry the value
/// is simply `CF-1.6`.
pub fn normalized_conventions(old: &str) -> String {
    if !tokens(old).any(is_cf_token) {
        return CF_CONVENTIONS.to_string();
    }

    let mut seen_cf = false;
    let mut out: Vec<&str> = Vec::new();
    for token in tokens(old) {
        if is_cf_token(token) {
            if !seen_cf {
                out.push(CF_CONVENTIONS);
                seen_cf = true;
            }
        } else {
            out.push(token);
        }
    }

    let separator = if old.contains(',') { ", " } else { " " };
    out.join(separator)
}

fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn is_cf_token(token: &str) -> bool {
    token.len() > 3
        && token
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("CF-"))
}
