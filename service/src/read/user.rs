//! [`User`] read model definition.

use common::listing::{self, Filtering, Kind, Listable, Value};

use crate::domain::{user, User};

/// [`User`] field exposed to listings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    /// [`DateTime`] when the [`User`] joined the platform.
    ///
    /// [`DateTime`]: common::DateTime
    CreatedAt,

    /// [`user::Name`].
    Name,

    /// [`user::Email`].
    Email,

    /// [`user::Status`].
    Status,
}

impl listing::Field for Field {
    const ALL: &'static [Self] =
        &[Self::CreatedAt, Self::Name, Self::Email, Self::Status];
    const DEFAULT_SORT: Self = Self::CreatedAt;

    fn name(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Name => "name",
            Self::Email => "email",
            Self::Status => "status",
        }
    }

    fn kind(self) -> Kind {
        match self {
            Self::CreatedAt => Kind::Timestamp,
            Self::Name | Self::Email => Kind::Text,
            Self::Status => Kind::Integer,
        }
    }

    fn is_sortable(self) -> bool {
        true
    }

    fn is_searchable(self) -> bool {
        matches!(self, Self::Name | Self::Email)
    }

    fn filtering(self) -> Option<Filtering> {
        Some(match self {
            Self::CreatedAt => Filtering::Range,
            Self::Name | Self::Email | Self::Status => Filtering::Equality,
        })
    }

    fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Status => raw
                .trim()
                .parse::<user::Status>()
                .ok()
                .map(|s| i64::from(s.u8()).into()),
            Self::CreatedAt | Self::Name | Self::Email => self.kind().parse(raw),
        }
    }
}

impl Listable for User {
    type Field = Field;

    fn id(&self) -> &str {
        self.id.as_ref()
    }

    fn value(&self, field: Field) -> Value {
        match field {
            Field::CreatedAt => self.created_at.into(),
            Field::Name => self.name.to_string().into(),
            Field::Email => self.email.to_string().into(),
            Field::Status => i64::from(self.status.u8()).into(),
        }
    }
}

pub mod list {
    //! [`User`]s list definitions.
    //!
    //! [`User`]: crate::domain::User

    use common::define_pagination;

    use crate::domain::User;

    define_pagination!(User);
}
