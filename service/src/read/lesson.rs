//! [`Lesson`] read model definition.

use common::listing::{self, Filtering, Kind, Listable, Value};

use crate::domain::{lesson, Lesson};

/// [`Lesson`] field exposed to listings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    /// [`DateTime`] when the [`Lesson`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    CreatedAt,

    /// [`lesson::Title`].
    Title,

    /// [`lesson::Description`].
    Description,

    /// [`lesson::Category`].
    Category,

    /// [`lesson::Status`].
    Status,
}

impl listing::Field for Field {
    const ALL: &'static [Self] = &[
        Self::CreatedAt,
        Self::Title,
        Self::Description,
        Self::Category,
        Self::Status,
    ];
    const DEFAULT_SORT: Self = Self::CreatedAt;

    fn name(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Status => "status",
        }
    }

    fn kind(self) -> Kind {
        match self {
            Self::CreatedAt => Kind::Timestamp,
            Self::Title | Self::Description | Self::Category => Kind::Text,
            Self::Status => Kind::Integer,
        }
    }

    fn is_sortable(self) -> bool {
        matches!(self, Self::CreatedAt | Self::Title | Self::Status)
    }

    fn is_searchable(self) -> bool {
        matches!(self, Self::Title | Self::Description)
    }

    fn filtering(self) -> Option<Filtering> {
        match self {
            Self::CreatedAt => Some(Filtering::Range),
            Self::Title | Self::Category | Self::Status => {
                Some(Filtering::Equality)
            }
            Self::Description => None,
        }
    }

    fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Status => raw
                .trim()
                .parse::<lesson::Status>()
                .ok()
                .map(|s| i64::from(s.u8()).into()),
            Self::CreatedAt
            | Self::Title
            | Self::Description
            | Self::Category => self.kind().parse(raw),
        }
    }
}

impl Listable for Lesson {
    type Field = Field;

    fn id(&self) -> &str {
        self.id.as_ref()
    }

    fn value(&self, field: Field) -> Value {
        match field {
            Field::CreatedAt => self.created_at.into(),
            Field::Title => self.title.to_string().into(),
            Field::Description => self.description.to_string().into(),
            Field::Category => self.category.to_string().into(),
            Field::Status => i64::from(self.status.u8()).into(),
        }
    }
}

pub mod list {
    //! [`Lesson`]s list definitions.
    //!
    //! [`Lesson`]: crate::domain::Lesson

    use common::define_pagination;

    use crate::domain::Lesson;

    define_pagination!(Lesson);
}

#[cfg(test)]
mod spec {
    use common::listing::{Field as _, Filtering};

    use super::Field;

    #[test]
    fn sort_whitelist() {
        let sortable = Field::ALL
            .iter()
            .filter(|f| f.is_sortable())
            .map(|f| f.name())
            .collect::<Vec<_>>();

        assert_eq!(sortable, ["createdAt", "title", "status"]);
    }

    #[test]
    fn description_is_searchable_only() {
        assert!(Field::Description.is_searchable());
        assert_eq!(Field::Description.filtering(), None);
        assert_eq!(Field::Category.filtering(), Some(Filtering::Equality));
    }
}
