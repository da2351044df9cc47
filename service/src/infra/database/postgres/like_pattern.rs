//! [`LikePattern`] definition.

use derive_more::{Display, Into};

/// SQL `LIKE` pattern matching any value containing a literal term.
///
/// Must be used with the `ESCAPE '\'` clause.
#[derive(Clone, Debug, Display, Eq, Into, PartialEq)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching values containing the provided
    /// `term` literally.
    #[must_use]
    pub fn containing(term: &str) -> Self {
        Self(format!(
            "%{}%",
            term.replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}
