//! [`Filter`] engine.

use super::{Error, Field, Filtering, Listable, Value};

/// Separator of range bounds in a filter value.
const RANGE_SEPARATOR: &str = "..";

/// Condition a single [`Value`] is tested against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Match {
    /// Value must be equal to the provided one.
    Equals(Value),

    /// Value must lie within the provided bounds (inclusive).
    Range {
        /// Lower bound, if any.
        min: Option<Value>,

        /// Upper bound, if any.
        max: Option<Value>,
    },
}

impl Match {
    /// Tests the provided [`Value`] against this [`Match`].
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::Range { min, max } => {
                min.as_ref().map_or(true, |min| value >= min)
                    && max.as_ref().map_or(true, |max| value <= max)
            }
        }
    }
}

/// [`Match`] applied to a [`Field`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Criterion<F> {
    /// [`Field`] being tested.
    pub field: F,

    /// [`Match`] the [`Field`] value must satisfy.
    pub matches: Match,
}

impl<F: Field> Criterion<F> {
    /// Parses the raw filter `value` of the provided [`Field`].
    ///
    /// A value of a [`Filtering::Range`] field is a range whenever it contains
    /// `..`, either bound of which may be omitted.
    ///
    /// # Errors
    ///
    /// If the `value` cannot be parsed for the [`Field`].
    pub fn parse(
        field: F,
        filtering: Filtering,
        value: &str,
    ) -> Result<Self, Error> {
        let invalid = || Error::InvalidFilterValue {
            field: field.name(),
            value: value.to_owned(),
        };
        let bound = |raw: &str| {
            let raw = raw.trim();
            if raw.is_empty() {
                Ok(None)
            } else {
                field.parse(raw).map(Some).ok_or_else(invalid)
            }
        };

        let matches = match (filtering, value.split_once(RANGE_SEPARATOR)) {
            (Filtering::Range, Some((min, max))) => {
                let (min, max) = (bound(min)?, bound(max)?);
                if min.is_none() && max.is_none() {
                    return Err(invalid());
                }
                Match::Range { min, max }
            }
            (Filtering::Range | Filtering::Equality, _) => {
                Match::Equals(field.parse(value).ok_or_else(invalid)?)
            }
        };

        Ok(Self { field, matches })
    }

    /// Tests the provided entity against this [`Criterion`].
    #[must_use]
    pub fn test<E>(&self, entity: &E) -> bool
    where
        E: Listable<Field = F>,
    {
        self.matches.test(&entity.value(self.field))
    }
}

/// Predicate over [`Listable`] entities.
///
/// Entities satisfy a [`Filter`] when they contain the search term (if any)
/// in at least one of the searchable [`Field`]s, and satisfy every
/// [`Criterion`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Filter<F> {
    /// Search term, matched case-insensitively as a substring.
    pub search: Option<String>,

    /// [`Criterion`]s all of which must be satisfied.
    pub criteria: Vec<Criterion<F>>,
}

impl<F> Default for Filter<F> {
    fn default() -> Self {
        Self {
            search: None,
            criteria: Vec::new(),
        }
    }
}

impl<F: Field> Filter<F> {
    /// Returns the [`Field`]s the search term is looked up in.
    pub fn searchable() -> impl Iterator<Item = F> {
        F::ALL.iter().copied().filter(|f| f.is_searchable())
    }

    /// Tests the provided entity against this [`Filter`].
    #[must_use]
    pub fn matches<E>(&self, entity: &E) -> bool
    where
        E: Listable<Field = F>,
    {
        let found = self.search.as_ref().map_or(true, |term| {
            let term = term.to_lowercase();
            Self::searchable().any(|f| {
                entity
                    .value(f)
                    .as_text()
                    .is_some_and(|text| text.to_lowercase().contains(&term))
            })
        });

        found && self.criteria.iter().all(|c| c.test(entity))
    }

    /// Counts the provided entities satisfying this [`Filter`].
    #[must_use]
    pub fn count<'e, E>(&self, entities: impl IntoIterator<Item = &'e E>) -> usize
    where
        E: Listable<Field = F>,
    {
        entities.into_iter().filter(|e| self.matches(*e)).count()
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        listing::{
            fixture::{Field, Item},
            Error, Filtering, Value,
        },
        DateTime,
    };

    use super::{Criterion, Filter, Match};

    fn items() -> Vec<Item> {
        vec![
            Item::new("a", "Alice Smith", 1, 10),
            Item::new("b", "bob", 2, 20),
            Item::new("c", "ALICIA", 2, 30),
            Item::new("d", "Dan", 1, 40),
        ]
    }

    fn ids<'i>(filter: &Filter<Field>, items: &'i [Item]) -> Vec<&'i str> {
        items
            .iter()
            .filter(|i| filter.matches(*i))
            .map(|i| i.id.as_str())
            .collect()
    }

    fn at(secs: i64) -> Value {
        Value::Timestamp(DateTime::from_unix_timestamp(secs).unwrap())
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filter = Filter {
            search: Some("alic".into()),
            criteria: vec![],
        };

        assert_eq!(ids(&filter, &items()), ["a", "c"]);
    }

    #[test]
    fn criteria_are_and_combined_with_search() {
        let filter = Filter {
            search: Some("ALI".into()),
            criteria: vec![Criterion {
                field: Field::Status,
                matches: Match::Equals(Value::Integer(2)),
            }],
        };

        assert_eq!(ids(&filter, &items()), ["c"]);
        assert_eq!(filter.count(&items()), 1);
    }

    #[test]
    fn equality_on_text_is_exact() {
        let c = Criterion::parse(Field::Name, Filtering::Equality, "bob")
            .unwrap();
        let filter = Filter {
            search: None,
            criteria: vec![c],
        };

        assert_eq!(ids(&filter, &items()), ["b"]);

        let c = Criterion::parse(Field::Name, Filtering::Equality, "Bob")
            .unwrap();
        assert_eq!(Filter { search: None, criteria: vec![c] }.count(&items()), 0);
    }

    #[test]
    fn ranges_are_inclusive_and_open_ended() {
        let c = Criterion::parse(
            Field::CreatedAt,
            Filtering::Range,
            "1970-01-01T00:00:20Z..1970-01-01T00:00:30Z",
        )
        .unwrap();
        assert_eq!(
            c.matches,
            Match::Range {
                min: Some(at(20)),
                max: Some(at(30)),
            },
        );
        let filter = Filter {
            search: None,
            criteria: vec![c],
        };
        assert_eq!(ids(&filter, &items()), ["b", "c"]);

        let c = Criterion::parse(
            Field::CreatedAt,
            Filtering::Range,
            "1970-01-01T00:00:30Z..",
        )
        .unwrap();
        let filter = Filter {
            search: None,
            criteria: vec![c],
        };
        assert_eq!(ids(&filter, &items()), ["c", "d"]);
    }

    #[test]
    fn range_field_accepts_plain_equality() {
        let c = Criterion::parse(
            Field::CreatedAt,
            Filtering::Range,
            "1970-01-01T00:00:40Z",
        )
        .unwrap();

        assert_eq!(c.matches, Match::Equals(at(40)));
    }

    #[test]
    fn rejects_unparsable_values() {
        for value in ["..", "yesterday..", "1970-01-01T00:00:40Z..soon"] {
            assert_eq!(
                Criterion::parse(Field::CreatedAt, Filtering::Range, value),
                Err(Error::InvalidFilterValue {
                    field: "createdAt",
                    value: value.into(),
                }),
                "input: {value}",
            );
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(Filter::<Field>::default().count(&items()), 4);
    }
}
