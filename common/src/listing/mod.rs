//! Listing queries over a collection of [`Listable`] entities.
//!
//! A listing is described by a [`Descriptor`], produced out of the raw query
//! parameters by [`Descriptor::normalize()`]. The descriptor combines:
//! - a [`Filter`] (search term plus per-field [`Criterion`]s);
//! - a [`Sorting`] giving a total order (ties are broken by ascending ID);
//! - pagination [`Arguments`] (either offset or cursor based).
//!
//! Data sources either run these engines directly over the entities in
//! memory, or translate them into their own query language. In both cases
//! the semantics defined here are the reference.

mod cursor;
mod filter;
mod normalize;
mod sort;

use std::fmt;

use derive_more::{Display, Error as StdError};
#[cfg(feature = "postgres")]
use postgres_types::{to_sql_checked, IsNull, ToSql, Type};

use crate::{pagination::Arguments, DateTime};

pub use self::{
    cursor::{Anchor, Cursor},
    filter::{Criterion, Filter, Match},
    normalize::{Limits, Mode, RawQuery},
    sort::{Order, Sorting},
};

/// Entity which can be listed.
pub trait Listable: Clone + Send + Sync + 'static {
    /// [`Field`]s of this entity exposed to listings.
    type Field: Field;

    /// Returns the opaque unique ID of this entity.
    fn id(&self) -> &str;

    /// Returns the [`Value`] of the provided [`Field`] of this entity.
    fn value(&self, field: Self::Field) -> Value;
}

/// Field of a [`Listable`] entity.
pub trait Field: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// All the fields of the entity.
    const ALL: &'static [Self];

    /// Field to order by when no sorting is requested.
    const DEFAULT_SORT: Self;

    /// Returns the name of this [`Field`] as used in query parameters.
    fn name(self) -> &'static str;

    /// Returns the [`Kind`] of values this [`Field`] holds.
    fn kind(self) -> Kind;

    /// Indicates whether entities can be sorted by this [`Field`].
    fn is_sortable(self) -> bool;

    /// Indicates whether this [`Field`] takes part in a text search.
    fn is_searchable(self) -> bool;

    /// Returns how this [`Field`] can be filtered by, if it can be at all.
    fn filtering(self) -> Option<Filtering>;

    /// Parses a filter operand of this [`Field`].
    fn parse(self, raw: &str) -> Option<Value> {
        self.kind().parse(raw)
    }

    /// Looks up a [`Field`] by its [`name`].
    ///
    /// [`name`]: Field::name
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Kind of [`Value`]s held by a [`Field`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Free text.
    Text,

    /// Integer number (also used for enumerations codes).
    Integer,

    /// Point in time.
    Timestamp,
}

impl Kind {
    /// Parses a [`Value`] of this [`Kind`] out of a query parameter.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Text => Some(Value::Text(raw.to_owned())),
            Self::Integer => raw.trim().parse().ok().map(Value::Integer),
            Self::Timestamp => {
                DateTime::from_rfc3339(raw.trim()).ok().map(Value::Timestamp)
            }
        }
    }
}

/// The way a [`Field`] can be filtered by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Filtering {
    /// Only exact matches.
    Equality,

    /// Exact matches and `min..max` ranges.
    Range,
}

/// Typed value of a [`Field`].
///
/// Values of the same [`Kind`] are ordered naturally: text
/// lexicographically by bytes (so case-sensitive), integers numerically and
/// timestamps chronologically.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Value {
    /// Free text.
    Text(String),

    /// Integer number.
    Integer(i64),

    /// Point in time.
    Timestamp(DateTime),
}

impl Value {
    /// Returns the [`Kind`] of this [`Value`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::Text,
            Self::Integer(_) => Kind::Integer,
            Self::Timestamp(_) => Kind::Timestamp,
        }
    }

    /// Returns the text of this [`Value`], if it's a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) | Self::Timestamp(_) => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl<Of: ?Sized> From<crate::DateTimeOf<Of>> for Value {
    fn from(dt: crate::DateTimeOf<Of>) -> Self {
        Self::Timestamp(dt.coerce())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Value {
    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <DateTime as ToSql>::accepts(ty)
    }

    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut postgres_types::private::BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Text(s) => s.to_sql(ty, w),
            Self::Integer(n) => n.to_sql(ty, w),
            Self::Timestamp(dt) => dt.to_sql(ty, w),
        }
    }
}

/// Validated description of a listing query.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor<F> {
    /// [`Filter`] entities must satisfy.
    pub filter: Filter<F>,

    /// [`Sorting`] of the entities.
    pub sorting: Sorting<F>,

    /// Pagination [`Arguments`].
    pub arguments: Arguments,
}

/// Error of a listing query validation.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Requested sort field is unknown or not sortable.
    #[display("Unknown or unsortable field `{_0}`")]
    InvalidSortField(#[error(not(source))] String),

    /// Requested sort order is neither `ASC` nor `DESC`.
    #[display("Sort order must be `ASC` or `DESC`, got `{_0}`")]
    InvalidSortOrder(#[error(not(source))] String),

    /// Requested limit is not a positive integer or exceeds the maximum.
    #[display("Limit must be an integer between 1 and {max}, got `{value}`")]
    InvalidLimit {
        /// Provided limit.
        value: String,

        /// Maximum allowed limit.
        max: usize,
    },

    /// Requested page is not a positive integer.
    #[display("Page must be a positive integer, got `{_0}`")]
    InvalidPage(#[error(not(source))] String),

    /// Provided cursor is malformed or was issued for another ordering.
    #[display("Cursor is malformed or was issued for another ordering")]
    InvalidCursor,

    /// Filter value cannot be parsed for its field.
    #[display("Invalid value `{value}` of `{field}` filter")]
    InvalidFilterValue {
        /// Name of the filtered field.
        field: &'static str,

        /// Provided value.
        value: String,
    },
}
