//! [`User`] definitions.

use std::{str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Learner or administrator registered on the platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`Status`] of this [`User`].
    pub status: Status,

    /// [`DateTime`] when this [`User`] joined the platform.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(String);

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part and a
        /// dotted domain, both without whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

define_kind! {
    #[doc = "Administrative status of a [`User`]."]
    enum Status {
        #[doc = "[`User`] can use the platform."]
        Active = 1,

        #[doc = "[`User`] is blocked by an administrator."]
        Blocked = 2,
    }
}

/// [`DateTime`] when a [`User`] joined the platform.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;
