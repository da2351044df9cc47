//! [`Lesson`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// Sign-language lesson.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lesson {
    /// ID of this [`Lesson`].
    pub id: Id,

    /// [`Title`] of this [`Lesson`].
    pub title: Title,

    /// [`Description`] of this [`Lesson`].
    pub description: Description,

    /// [`Category`] of this [`Lesson`].
    pub category: Category,

    /// [`Status`] of this [`Lesson`].
    pub status: Status,

    /// [`DateTime`] when this [`Lesson`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Lesson`].
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

/// Title of a [`Lesson`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 256
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Free-form description of a [`Lesson`].
#[derive(AsRef, Clone, Debug, Default, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

/// Category a [`Lesson`] belongs to (alphabet, numbers, greetings, etc).
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty() && name.trim() == name && name.len() <= 64)
            .then_some(Self(name))
    }
}

define_kind! {
    #[doc = "Publication status of a [`Lesson`]."]
    enum Status {
        #[doc = "[`Lesson`] is being prepared and is hidden from learners."]
        Draft = 1,

        #[doc = "[`Lesson`] is visible to learners."]
        Published = 2,
    }
}

/// [`DateTime`] when a [`Lesson`] was created.
pub type CreationDateTime = DateTimeOf<(Lesson, unit::Creation)>;
