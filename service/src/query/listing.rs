//! Generic listing [`Query`]s.

use std::marker::PhantomData;

use common::{
    listing::{self, Filter, Listable, Mode, RawQuery},
    operations::{By, Select},
    Descriptor, Page,
};
use derive_more::{Debug, Display, Error, From};
use futures::future;
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] for a [`Page`] of `N`odes described by raw query parameters.
#[derive(Debug)]
pub struct List<N> {
    /// Raw query parameters.
    pub params: RawQuery,

    /// Pagination [`Mode`] used unless a cursor is provided.
    pub mode: Mode,

    /// Type of the listed nodes.
    #[debug(skip)]
    _node: PhantomData<fn() -> N>,
}

impl<N> List<N> {
    /// Creates a new [`List`] paginated by page numbers.
    #[must_use]
    pub fn offset(params: RawQuery) -> Self {
        Self {
            params,
            mode: Mode::Offset,
            _node: PhantomData,
        }
    }

    /// Creates a new [`List`] paginated by cursors.
    #[must_use]
    pub fn cursor(params: RawQuery) -> Self {
        Self {
            params,
            mode: Mode::Cursor,
            _node: PhantomData,
        }
    }
}

impl<Db, N> Query<List<N>> for Service<Db>
where
    N: Listable,
    Db: Database<
            Select<By<Page<N>, Descriptor<N::Field>>>,
            Ok = Page<N>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<u64, Filter<N::Field>>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Sync,
{
    type Ok = Page<N>;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(mode = ?query.mode))]
    async fn execute(&self, query: List<N>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let descriptor = Descriptor::<N::Field>::normalize(
            &query.params,
            self.config().listing,
            query.mode,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        if descriptor.arguments.is_cursor() {
            return self
                .database()
                .execute(Select(By::<Page<N>, _>::new(descriptor)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E));
        }

        let filter = descriptor.filter.clone();
        let (page, total) = future::try_join(
            self.database()
                .execute(Select(By::<Page<N>, _>::new(descriptor))),
            self.database().execute(Select(By::<u64, _>::new(filter))),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(page.with_total_count(total))
    }
}

/// [`Query`] for a number of `N`odes matching the search term and the
/// filters of raw query parameters.
#[derive(Debug)]
pub struct Count<N> {
    /// Raw query parameters.
    pub params: RawQuery,

    /// Type of the counted nodes.
    #[debug(skip)]
    _node: PhantomData<fn() -> N>,
}

impl<N> Count<N> {
    /// Creates a new [`Count`] out of the provided raw query parameters.
    #[must_use]
    pub fn new(params: RawQuery) -> Self {
        Self {
            params,
            _node: PhantomData,
        }
    }
}

impl<Db, N> Query<Count<N>> for Service<Db>
where
    N: Listable,
    Db: Database<
            Select<By<u64, Filter<N::Field>>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Sync,
{
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all)]
    async fn execute(&self, query: Count<N>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let filter = Filter::<N::Field>::normalize(&query.params)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Select(By::<u64, _>::new(filter)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`List`] or [`Count`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Raw query parameters are invalid.
    #[display("Invalid listing query: {_0}")]
    Invalid(listing::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{
        listing::{Error, Limits, RawQuery},
        DateTime,
    };

    use crate::{
        domain::{user, User},
        infra::Memory,
        query, Config, Query as _, Service,
    };

    use super::ExecutionError;

    fn user(id: &str, name: &str, status: user::Status, at: i64) -> User {
        User {
            id: id.into(),
            name: user::Name::new(name).unwrap(),
            email: user::Email::new(format!("{id}@lisan.app")).unwrap(),
            status,
            created_at: DateTime::from_unix_timestamp(at).unwrap().coerce(),
        }
    }

    fn service(users: Vec<User>) -> Service<Memory> {
        Service::new(
            Config {
                listing: Limits {
                    default: 20,
                    max: 100,
                },
            },
            Memory::new(users, []),
        )
    }

    fn params<const N: usize>(pairs: [(&str, &str); N]) -> RawQuery {
        pairs.into_iter().collect()
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_ref()).collect()
    }

    fn population() -> Vec<User> {
        (0..8)
            .map(|n| {
                let status = if n % 3 == 0 {
                    user::Status::Blocked
                } else {
                    user::Status::Active
                };
                user(&format!("u{n}"), &format!("Learner {n}"), status, n)
            })
            .collect()
    }

    #[tokio::test]
    async fn offset_page_carries_total_count() {
        let svc = service(population());

        let page = svc
            .execute(query::users::List::offset(params([
                ("limit", "3"),
                ("page", "2"),
                ("order", "desc"),
            ])))
            .await
            .unwrap();

        assert_eq!(ids(&page.items), ["u4", "u3", "u2"]);
        assert_eq!(page.total_count, Some(8));
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn cursor_page_has_no_total_count() {
        let svc = service(population());

        let page = svc
            .execute(query::users::List::cursor(params([("limit", "5")])))
            .await
            .unwrap();

        assert_eq!(ids(&page.items), ["u0", "u1", "u2", "u3", "u4"]);
        assert_eq!(page.total_count, None);
        assert!(page.next_cursor.is_some());
    }

    #[tokio::test]
    async fn blocked_users_are_counted_and_listed_alike() {
        let svc = service(population());

        let count = svc
            .execute(query::users::Count::new(params([("status", "BLOCKED")])))
            .await
            .unwrap();
        let page = svc
            .execute(query::users::List::cursor(params([
                ("status", "BLOCKED"),
                ("limit", "10"),
            ])))
            .await
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(ids(&page.items), ["u0", "u3", "u6"]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn invalid_parameters_are_reported() {
        let svc = service(population());

        let err = svc
            .execute(query::users::List::offset(params([("sortBy", "role")])))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(Error::InvalidSortField(f)) if f == "role",
        ));
    }

    #[tokio::test]
    async fn count_ignores_paging_parameters() {
        let svc = service(population());

        let count = svc
            .execute(query::users::Count::new(params([
                ("q", "learner 1"),
                ("limit", "0"),
            ])))
            .await
            .unwrap();

        assert_eq!(count, 1);
    }
}
