//! [`Query`] collection related to the multiple [`User`]s.

use crate::domain::User;
#[cfg(doc)]
use crate::Query;

use super::listing;

/// Queries a page of [`User`]s.
pub type List = listing::List<User>;

/// Queries total count of [`User`]s matching the search and the filters.
pub type Count = listing::Count<User>;
