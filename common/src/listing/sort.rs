//! [`Sorting`] engine.

use std::{cmp, str::FromStr};

use derive_more::Display;

use super::{Anchor, Error, Field, Listable, Value};

/// Order of a [`Sorting`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    #[default]
    #[display("ASC")]
    Ascending,

    /// Descending order.
    #[display("DESC")]
    Descending,
}

impl Order {
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Ascending),
            "DESC" => Ok(Self::Descending),
            _ => Err(Error::InvalidSortOrder(s.to_owned())),
        }
    }
}

/// Total order of [`Listable`] entities.
///
/// Entities are compared by the [`Field`] value in the requested [`Order`],
/// and then by their IDs in ascending order, regardless of the [`Order`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sorting<F> {
    /// [`Field`] to sort by.
    pub field: F,

    /// [`Order`] of the [`Field`] values.
    pub order: Order,
}

impl<F: Field> Sorting<F> {
    /// Compares `(value, id)` keys according to this [`Sorting`].
    #[must_use]
    pub fn compare_keys(
        &self,
        (a_value, a_id): (&Value, &str),
        (b_value, b_id): (&Value, &str),
    ) -> cmp::Ordering {
        let primary = a_value.cmp(b_value);
        let primary = match self.order {
            Order::Ascending => primary,
            Order::Descending => primary.reverse(),
        };
        primary.then_with(|| a_id.cmp(b_id))
    }

    /// Compares the provided entities according to this [`Sorting`].
    #[must_use]
    pub fn compare<E>(&self, a: &E, b: &E) -> cmp::Ordering
    where
        E: Listable<Field = F>,
    {
        self.compare_keys(
            (&a.value(self.field), a.id()),
            (&b.value(self.field), b.id()),
        )
    }

    /// Indicates whether the provided entity goes strictly after the provided
    /// [`Anchor`] according to this [`Sorting`].
    #[must_use]
    pub fn follows<E>(&self, entity: &E, anchor: &Anchor) -> bool
    where
        E: Listable<Field = F>,
    {
        self.compare_keys(
            (&entity.value(self.field), entity.id()),
            (&anchor.value, &anchor.id),
        )
        .is_gt()
    }

    /// Sorts the provided entities according to this [`Sorting`].
    pub fn sort<E>(&self, entities: &mut [E])
    where
        E: Listable<Field = F>,
    {
        entities.sort_by(|a, b| self.compare(a, b));
    }
}
