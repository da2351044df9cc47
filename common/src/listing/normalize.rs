//! Normalization of raw query parameters into a [`Descriptor`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::pagination::Arguments;

use super::{
    Criterion, Cursor, Descriptor, Error, Field, Filter, Order, Sorting,
};

/// Keys of a search term.
const SEARCH: &[&str] = &["q", "search"];

/// Keys of a sort field.
const SORT_BY: &[&str] = &["sortBy", "by"];

/// Keys of a sort order.
const SORT_ORDER: &[&str] = &["sortOrder", "order"];

/// Key of a page size.
const LIMIT: &str = "limit";

/// Key of a page number.
const PAGE: &str = "page";

/// Key of a continuation cursor.
const CURSOR: &str = "cursor";

/// Raw query parameters, as received in a URL query string.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct RawQuery(HashMap<String, String>);

impl RawQuery {
    /// Returns the value of the first present key out of the provided
    /// aliases.
    #[must_use]
    pub fn get(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .find_map(|key| self.0.get(*key))
            .map(String::as_str)
    }

    /// Sets the provided key to the provided value, unless it's present
    /// already.
    pub fn set_default(&mut self, key: &str, value: impl ToString) {
        _ = self
            .0
            .entry(key.to_owned())
            .or_insert_with(|| value.to_string());
    }

    /// Iterates over the parameters which are not reserved by listings, so
    /// are filter candidates.
    fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .filter(|(k, _)| !is_reserved(k))
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Checks whether the provided query parameter key is reserved by listings.
fn is_reserved(key: &str) -> bool {
    SEARCH.contains(&key)
        || SORT_BY.contains(&key)
        || SORT_ORDER.contains(&key)
        || [LIMIT, PAGE, CURSOR].contains(&key)
}

/// Page size limits of listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Page size used when none is requested.
    pub default: usize,

    /// Maximum page size which can be requested.
    pub max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default: 20,
            max: 100,
        }
    }
}

/// Preferred pagination mode of a listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Paging by page number.
    Offset,

    /// Paging by continuation cursor.
    Cursor,
}

impl<F: Field> Descriptor<F> {
    /// Normalizes the provided [`RawQuery`] into a [`Descriptor`].
    ///
    /// The provided [`Mode`] is used unless a `cursor` parameter is present,
    /// which always selects [`Mode::Cursor`] (a `page` is ignored then).
    /// Parameters not recognized as a listing parameter nor as a filterable
    /// [`Field`] are ignored.
    ///
    /// # Errors
    ///
    /// If any of the recognized parameters is invalid.
    pub fn normalize(
        raw: &RawQuery,
        limits: Limits,
        mode: Mode,
    ) -> Result<Self, Error> {
        let sorting = Sorting {
            field: raw.get(SORT_BY).map_or(Ok(F::DEFAULT_SORT), |name| {
                F::from_name(name)
                    .filter(|f| f.is_sortable())
                    .ok_or_else(|| Error::InvalidSortField(name.to_owned()))
            })?,
            order: raw
                .get(SORT_ORDER)
                .map_or(Ok(Order::Ascending), str::parse)?,
        };

        let limit = raw.get(&[LIMIT]).map_or(Ok(limits.default), |l| {
            l.trim()
                .parse::<usize>()
                .ok()
                .filter(|l| (1..=limits.max).contains(l))
                .ok_or_else(|| Error::InvalidLimit {
                    value: l.to_owned(),
                    max: limits.max,
                })
        })?;

        let cursor = raw.get(&[CURSOR]);
        let arguments = if cursor.is_some() || mode == Mode::Cursor {
            let after = cursor
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| Cursor::from(c.to_owned()).decode(&sorting))
                .transpose()?;
            Arguments::Cursor { after, limit }
        } else {
            let page = raw.get(&[PAGE]).map_or(Ok(1), |p| {
                p.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| Error::InvalidPage(p.to_owned()))
            })?;
            Arguments::Offset { page, limit }
        };

        Ok(Self {
            filter: Filter::normalize(raw)?,
            sorting,
            arguments,
        })
    }
}

impl<F: Field> Filter<F> {
    /// Normalizes the search term and the filters of the provided
    /// [`RawQuery`] into a [`Filter`].
    ///
    /// Sorting and pagination parameters are neither used nor validated.
    ///
    /// # Errors
    ///
    /// If any filter value cannot be parsed for its [`Field`].
    pub fn normalize(raw: &RawQuery) -> Result<Self, Error> {
        let search = raw
            .get(SEARCH)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
        let mut criteria = raw
            .filters()
            .filter_map(|(key, value)| {
                let field = F::from_name(key)?;
                let filtering = field.filtering()?;
                Some(Criterion::parse(field, filtering, value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Keeps the order stable regardless of the map iteration order.
        criteria.sort_by_key(|c| c.field.name());

        Ok(Self { search, criteria })
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        listing::{
            fixture::{Field, Item},
            Anchor, Cursor, Descriptor, Error, Filter, Match, Order, Sorting,
            Value,
        },
        pagination::Arguments,
        DateTime,
    };

    use super::{Limits, Mode, RawQuery};

    fn raw<const N: usize>(pairs: [(&str, &str); N]) -> RawQuery {
        pairs.into_iter().collect()
    }

    fn normalize(
        pairs: RawQuery,
        mode: Mode,
    ) -> Result<Descriptor<Field>, Error> {
        Descriptor::normalize(&pairs, Limits::default(), mode)
    }

    #[test]
    fn defaults() {
        let d = normalize(RawQuery::default(), Mode::Offset).unwrap();

        assert_eq!(
            d.sorting,
            Sorting {
                field: Field::CreatedAt,
                order: Order::Ascending,
            },
        );
        assert_eq!(d.arguments, Arguments::Offset { page: 1, limit: 20 });
        assert_eq!(d.filter.search, None);
        assert!(d.filter.criteria.is_empty());

        let d = normalize(RawQuery::default(), Mode::Cursor).unwrap();
        assert_eq!(
            d.arguments,
            Arguments::Cursor {
                after: None,
                limit: 20,
            },
        );
    }

    #[test]
    fn sort_field_is_whitelisted() {
        let d = normalize(raw([("sortBy", "name")]), Mode::Offset).unwrap();
        assert_eq!(d.sorting.field, Field::Name);

        let d = normalize(raw([("by", "status")]), Mode::Offset).unwrap();
        assert_eq!(d.sorting.field, Field::Status);

        assert_eq!(
            normalize(raw([("sortBy", "password")]), Mode::Offset),
            Err(Error::InvalidSortField("password".into())),
        );
        assert_eq!(
            normalize(raw([("sortBy", "secret")]), Mode::Offset),
            Err(Error::InvalidSortField("secret".into())),
        );
    }

    #[test]
    fn sort_order_is_case_insensitive() {
        for (input, expected) in [
            ("ASC", Order::Ascending),
            ("desc", Order::Descending),
            ("Desc", Order::Descending),
        ] {
            let d = normalize(raw([("order", input)]), Mode::Offset).unwrap();
            assert_eq!(d.sorting.order, expected, "input: {input}");
        }

        assert_eq!(
            normalize(raw([("sortOrder", "up")]), Mode::Offset),
            Err(Error::InvalidSortOrder("up".into())),
        );
    }

    #[test]
    fn limit_is_bounded() {
        let d = normalize(raw([("limit", "100")]), Mode::Offset).unwrap();
        assert_eq!(d.arguments.limit(), 100);

        for bad in ["0", "-1", "101", "ten", ""] {
            assert_eq!(
                normalize(raw([("limit", bad)]), Mode::Offset),
                Err(Error::InvalidLimit {
                    value: bad.into(),
                    max: 100,
                }),
                "input: {bad}",
            );
        }
    }

    #[test]
    fn page_must_be_positive() {
        let d = normalize(raw([("page", "3"), ("limit", "5")]), Mode::Offset)
            .unwrap();
        assert_eq!(d.arguments, Arguments::Offset { page: 3, limit: 5 });

        assert_eq!(
            normalize(raw([("page", "0")]), Mode::Offset),
            Err(Error::InvalidPage("0".into())),
        );
    }

    #[test]
    fn cursor_takes_precedence_over_page() {
        let sorting = Sorting {
            field: Field::CreatedAt,
            order: Order::Ascending,
        };
        let anchor = Anchor::of(&sorting, &Item::new("b", "Bob", 1, 1));
        let token = Cursor::encode(&sorting, &anchor).to_string();

        let d = normalize(
            raw([("page", "7"), ("cursor", token.as_str())]),
            Mode::Offset,
        )
        .unwrap();

        assert_eq!(
            d.arguments,
            Arguments::Cursor {
                after: Some(anchor),
                limit: 20,
            },
        );
    }

    #[test]
    fn empty_cursor_starts_from_the_beginning() {
        let d = normalize(raw([("cursor", "")]), Mode::Offset).unwrap();

        assert_eq!(
            d.arguments,
            Arguments::Cursor {
                after: None,
                limit: 20,
            },
        );
    }

    #[test]
    fn malformed_cursor_is_rejected() {
        assert_eq!(
            normalize(raw([("cursor", "not-a-cursor")]), Mode::Cursor),
            Err(Error::InvalidCursor),
        );
    }

    #[test]
    fn collects_filters_and_ignores_unknown_ones() {
        let d = normalize(
            raw([
                ("status", "2"),
                ("q", "  ali "),
                ("favouriteColor", "green"),
                ("secret", "x"),
                (
                    "createdAt",
                    "2024-01-01T00:00:00Z..2024-02-01T00:00:00Z",
                ),
            ]),
            Mode::Offset,
        )
        .unwrap();

        assert_eq!(d.filter.search.as_deref(), Some("ali"));
        assert_eq!(
            d.filter
                .criteria
                .iter()
                .map(|c| (c.field, c.matches.clone()))
                .collect::<Vec<_>>(),
            vec![
                (
                    Field::CreatedAt,
                    Match::Range {
                        min: Some(Value::Timestamp(
                            DateTime::from_rfc3339("2024-01-01T00:00:00Z")
                                .unwrap(),
                        )),
                        max: Some(Value::Timestamp(
                            DateTime::from_rfc3339("2024-02-01T00:00:00Z")
                                .unwrap(),
                        )),
                    },
                ),
                (Field::Status, Match::Equals(Value::Integer(2))),
            ],
        );
    }

    #[test]
    fn blank_search_is_absent() {
        let d = normalize(raw([("search", "   ")]), Mode::Offset).unwrap();

        assert_eq!(d.filter.search, None);
    }

    #[test]
    fn filter_ignores_paging_parameters() {
        let f = Filter::<Field>::normalize(&raw([
            ("limit", "100000"),
            ("sortBy", "secret"),
            ("search", "bob"),
        ]))
        .unwrap();

        assert_eq!(f.search.as_deref(), Some("bob"));
        assert!(f.criteria.is_empty());
    }

    #[test]
    fn invalid_filter_value_is_reported() {
        assert_eq!(
            normalize(raw([("status", "blocked")]), Mode::Offset),
            Err(Error::InvalidFilterValue {
                field: "status",
                value: "blocked".into(),
            }),
        );
    }
}
