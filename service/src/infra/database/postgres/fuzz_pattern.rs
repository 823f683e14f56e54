//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` SQL pattern to be used for fuzzy searching.
///
/// Each whitespace-separated word of the input becomes an alternative, so
/// searching for any word of a brand name matches the whole listing.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!(
                    "%{}%",
                    word.replace('\\', r"\\")
                        .replace('%', r"\%")
                        .replace('|', r"\|")
                        .replace('*', r"\*")
                        .replace('+', r"\+")
                        .replace('?', r"\?")
                        .replace('{', r"\{")
                        .replace('}', r"\}")
                        .replace('(', r"\(")
                        .replace(')', r"\)")
                        .replace('[', r"\[")
                        .replace(']', r"\]")
                        .replace('_', r"\_")
                ))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn words_become_alternatives() {
        assert_eq!(
            FuzzPattern::new("Firefox Bikes").to_string(),
            "(%Firefox%|%Bikes%)",
        );
    }

    #[test]
    fn pattern_metacharacters_are_escaped() {
        assert_eq!(
            FuzzPattern::new("100%_brand").to_string(),
            r"(%100\%\_brand%)",
        );
    }
}
