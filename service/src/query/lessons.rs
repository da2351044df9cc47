//! [`Query`] collection related to the multiple [`Lesson`]s.

use crate::domain::Lesson;
#[cfg(doc)]
use crate::Query;

use super::listing;

/// Queries a page of [`Lesson`]s.
pub type List = listing::List<Lesson>;

/// Queries total count of [`Lesson`]s matching the search and the filters.
pub type Count = listing::Count<Lesson>;
