//! Abstractions for pagination.

use serde::Serialize;

use crate::listing::{Anchor, Cursor, Listable, Sorting};

/// A page of a listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<N> {
    /// Nodes on this [`Page`].
    pub items: Vec<N>,

    /// [`Cursor`] of the next [`Page`].
    ///
    /// Present only for cursor pagination and only if more nodes exist
    /// beyond this [`Page`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,

    /// Total number of nodes matching the listing, regardless of pagination.
    ///
    /// Present only for offset pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<N: Listable> Page<N> {
    /// Creates a new [`Page`] out of the nodes selected with one node of
    /// lookahead (at most `limit + 1` nodes in the provided [`Sorting`]).
    ///
    /// The lookahead node is dropped, and its presence is what a
    /// [`Page::next_cursor`] is issued for.
    #[must_use]
    pub fn from_lookahead(
        arguments: &Arguments,
        sorting: &Sorting<N::Field>,
        mut items: Vec<N>,
    ) -> Self {
        let limit = arguments.limit();
        let has_more = items.len() > limit;
        items.truncate(limit);

        let next_cursor = (has_more && arguments.is_cursor())
            .then(|| items.last())
            .flatten()
            .map(|last| Cursor::encode(sorting, &Anchor::of(sorting, last)));

        Self {
            items,
            next_cursor,
            total_count: None,
        }
    }

    /// Selects a [`Page`] out of the nodes already filtered and sorted
    /// according to the provided [`Sorting`].
    #[must_use]
    pub fn paginate(
        arguments: &Arguments,
        sorting: &Sorting<N::Field>,
        sorted: &[N],
    ) -> Self {
        let start = match arguments {
            Arguments::Offset { .. } => arguments.offset(),
            Arguments::Cursor { after, .. } => Some(after.as_ref().map_or(
                0,
                |anchor| {
                    sorted.partition_point(|n| !sorting.follows(n, anchor))
                },
            )),
        };
        let items = start
            .and_then(|start| sorted.get(start..))
            .unwrap_or_default()
            .iter()
            .take(arguments.limit().saturating_add(1))
            .cloned()
            .collect();

        Self::from_lookahead(arguments, sorting, items)
    }
}

impl<N> Page<N> {
    /// Attaches the provided total count to this [`Page`].
    #[must_use]
    pub fn with_total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Maps the nodes of this [`Page`].
    #[must_use]
    pub fn map<M>(self, f: impl FnMut(N) -> M) -> Page<M> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            total_count: self.total_count,
        }
    }
}

/// Pagination arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Arguments {
    /// Offset pagination.
    Offset {
        /// 1-indexed number of the page.
        page: usize,

        /// Number of items to return.
        limit: usize,
    },

    /// Cursor pagination.
    Cursor {
        /// [`Anchor`] after which to return items.
        ///
        /// [`None`] starts from the beginning.
        after: Option<Anchor>,

        /// Number of items to return.
        limit: usize,
    },
}

impl Arguments {
    /// Returns limit requested by these [`Arguments`].
    #[must_use]
    pub fn limit(&self) -> usize {
        match *self {
            Self::Offset { limit, .. } | Self::Cursor { limit, .. } => limit,
        }
    }

    /// Returns number of items to skip before the requested page.
    ///
    /// [`None`] if the page lies beyond any representable offset, so is
    /// empty.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::Offset { page, limit } => {
                page.saturating_sub(1).checked_mul(limit)
            }
            Self::Cursor { .. } => Some(0),
        }
    }

    /// Indicates whether these [`Arguments`] request cursor pagination.
    #[must_use]
    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor { .. })
    }
}

/// Defines listing types of a [`Listable`] node.
///
/// [`Listable`]: crate::listing::Listable
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty) => {
        #[doc = "A page of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Validated listing query of nodes."]
        pub type Descriptor = $crate::listing::Descriptor<
            <$node as $crate::listing::Listable>::Field,
        >;

        #[doc = "Filter of nodes."]
        pub type Filter = $crate::listing::Filter<
            <$node as $crate::listing::Listable>::Field,
        >;

        #[doc = "Sorting of nodes."]
        pub type Sorting = $crate::listing::Sorting<
            <$node as $crate::listing::Listable>::Field,
        >;
    };
}

#[cfg(test)]
mod spec {
    use crate::listing::{
        fixture::{Field, Item},
        Anchor, Filter, Order, Sorting, Value,
    };

    use super::{Arguments, Page};

    const BY_CREATION: Sorting<Field> = Sorting {
        field: Field::CreatedAt,
        order: Order::Ascending,
    };

    fn ids(page: &Page<Item>) -> Vec<&str> {
        page.items.iter().map(|i| i.id.as_str()).collect()
    }

    fn sorted(mut items: Vec<Item>, sorting: &Sorting<Field>) -> Vec<Item> {
        sorting.sort(&mut items);
        items
    }

    fn population() -> Vec<Item> {
        (0..23)
            .map(|n| {
                Item::new(&format!("id-{:02}", 22 - n), "x", n % 3, n % 5)
            })
            .collect()
    }

    #[test]
    fn offset_pages_partition_the_sequence() {
        for sorting in [
            BY_CREATION,
            Sorting {
                field: Field::Status,
                order: Order::Descending,
            },
        ] {
            let all = sorted(population(), &sorting);

            for limit in [1, 4, 5, 23, 30] {
                let mut seen = Vec::new();
                for page in 1..=all.len().div_ceil(limit) {
                    let p = Page::paginate(
                        &Arguments::Offset { page, limit },
                        &sorting,
                        &all,
                    );
                    assert!(p.items.len() <= limit);
                    assert_eq!(p.next_cursor, None);
                    seen.extend(p.items);
                }
                assert_eq!(seen, all, "limit: {limit}");
            }
        }
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let all = sorted(population(), &BY_CREATION);

        for page in [6, 1000, usize::MAX] {
            let p = Page::paginate(
                &Arguments::Offset { page, limit: 5 },
                &BY_CREATION,
                &all,
            );
            assert!(p.items.is_empty(), "page: {page}");
        }
    }

    #[test]
    fn cursor_pages_concatenate_to_the_full_sequence() {
        for sorting in [
            BY_CREATION,
            Sorting {
                field: Field::CreatedAt,
                order: Order::Descending,
            },
        ] {
            let all = sorted(population(), &sorting);

            for limit in [1, 2, 7, 23, 50] {
                let mut seen = Vec::new();
                let mut after = None;
                loop {
                    let p = Page::paginate(
                        &Arguments::Cursor { after, limit },
                        &sorting,
                        &all,
                    );
                    assert!(p.items.len() <= limit);
                    seen.extend(p.items);
                    let Some(cursor) = p.next_cursor else {
                        break;
                    };
                    after = Some(cursor.decode(&sorting).unwrap());
                }
                assert_eq!(seen, all, "limit: {limit}");
            }
        }
    }

    #[test]
    fn next_cursor_anchors_last_item() {
        let all = sorted(
            vec![
                Item::new("c", "x", 1, 2),
                Item::new("b", "x", 1, 1),
                Item::new("a", "x", 1, 1),
            ],
            &BY_CREATION,
        );

        let first = Page::paginate(
            &Arguments::Cursor {
                after: None,
                limit: 2,
            },
            &BY_CREATION,
            &all,
        );
        assert_eq!(ids(&first), ["a", "b"]);
        let anchor = first
            .next_cursor
            .as_ref()
            .unwrap()
            .decode(&BY_CREATION)
            .unwrap();
        assert_eq!(anchor, Anchor::of(&BY_CREATION, &all[1]));
        assert_eq!(anchor.id, "b");
        assert_eq!(anchor.value, Value::from(all[0].created_at));

        let second = Page::paginate(
            &Arguments::Cursor {
                after: Some(anchor),
                limit: 2,
            },
            &BY_CREATION,
            &all,
        );
        assert_eq!(ids(&second), ["c"]);
        assert_eq!(second.next_cursor, None);
    }

    #[test]
    fn exact_fit_has_no_next_cursor() {
        let all = sorted(population(), &BY_CREATION);

        let p = Page::paginate(
            &Arguments::Cursor {
                after: None,
                limit: all.len(),
            },
            &BY_CREATION,
            &all,
        );

        assert_eq!(p.items.len(), all.len());
        assert_eq!(p.next_cursor, None);
    }

    #[test]
    fn anchor_of_removed_item_still_resumes() {
        let all = sorted(population(), &BY_CREATION);
        let anchor = Anchor {
            value: all[4].created_at.into(),
            id: format!("{}-gone", all[4].id),
        };

        let p = Page::paginate(
            &Arguments::Cursor {
                after: Some(anchor),
                limit: 3,
            },
            &BY_CREATION,
            &all,
        );

        assert_eq!(p.items, all[5..8]);
    }

    #[test]
    fn count_matches_filtered_length() {
        let all = population();
        let filter = Filter {
            search: None,
            criteria: vec![crate::listing::Criterion {
                field: Field::Status,
                matches: crate::listing::Match::Equals(Value::Integer(1)),
            }],
        };

        let matching =
            all.iter().filter(|i| filter.matches(*i)).cloned().collect();
        let matching = sorted(matching, &BY_CREATION);
        let p = Page::paginate(
            &Arguments::Cursor {
                after: None,
                limit: 100,
            },
            &BY_CREATION,
            &matching,
        );

        assert_eq!(filter.count(&all), p.items.len());
        assert_eq!(p.items.len(), 8);
    }

    #[test]
    fn serializes_as_camel_case_envelope() {
        let page = Page {
            items: vec![1, 2],
            next_cursor: None,
            total_count: Some(2),
        };

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({"items": [1, 2], "totalCount": 2}),
        );
    }
}
