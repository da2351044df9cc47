//! [`Query`] collection related to a single [`Lesson`].

use common::operations::By;

use crate::domain::{lesson, Lesson};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Lesson`] by its [`lesson::Id`].
pub type ById = DatabaseQuery<By<Option<Lesson>, lesson::Id>>;
