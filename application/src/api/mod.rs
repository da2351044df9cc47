//! HTTP API definitions.

pub mod lessons;
pub mod users;

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json, Router,
};
use common::{listing::Listable, Page, RawQuery};
use futures::TryFutureExt as _;
use serde::Serialize;
use service::{query, Query as _, Service, Storage};
use tracerr::Traced;

use crate::{AsError, Error};

/// Builds the [`Router`] of the HTTP API over the provided [`Service`].
pub fn router<Db: Storage>(service: Service<Db>) -> Router {
    Router::new()
        .nest("/admin/users", users::routes::<Db>())
        .nest("/admin/lessons", lessons::routes::<Db>())
        .layer(Extension(service))
}

/// Number of entities matching a listing query.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Count {
    /// Number of the matching entities.
    pub count: u64,
}

/// Extracts [`RawQuery`] parameters of the provided query string.
fn params(
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Result<RawQuery, Error> {
    query.map(|Query(p)| p).map_err(AsError::into_error)
}

/// Lists `N`odes as `V`iews page by page.
///
/// Used by search, filter and paginate endpoints which differ in purpose
/// only.
async fn list<Db, N, V>(
    Extension(service): Extension<Service<Db>>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Result<Json<Page<V>>, Error>
where
    Db: Storage,
    N: Listable,
    V: From<N> + Serialize + Send + 'static,
    Service<Db>: service::Query<
        query::List<N>,
        Ok = Page<N>,
        Err = Traced<query::listing::ExecutionError>,
    >,
{
    service
        .execute(query::List::<N>::offset(params(query)?))
        .map_ok(|page| Json(page.map(V::from)))
        .map_err(AsError::into_error)
        .await
}

/// Lists `N`odes as `V`iews sorted. Without an explicit `limit` returns the
/// sorted sequence up to the configured maximum page size.
async fn sort<Db, N, V>(
    Extension(service): Extension<Service<Db>>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Result<Json<Page<V>>, Error>
where
    Db: Storage,
    N: Listable,
    V: From<N> + Serialize + Send + 'static,
    Service<Db>: service::Query<
        query::List<N>,
        Ok = Page<N>,
        Err = Traced<query::listing::ExecutionError>,
    >,
{
    let mut params = params(query)?;
    params.set_default("limit", service.config().listing.max);

    service
        .execute(query::List::<N>::offset(params))
        .map_ok(|page| Json(page.map(V::from)))
        .map_err(AsError::into_error)
        .await
}

/// Lists `N`odes as `V`iews by continuation cursors.
async fn cursor<Db, N, V>(
    Extension(service): Extension<Service<Db>>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Result<Json<Page<V>>, Error>
where
    Db: Storage,
    N: Listable,
    V: From<N> + Serialize + Send + 'static,
    Service<Db>: service::Query<
        query::List<N>,
        Ok = Page<N>,
        Err = Traced<query::listing::ExecutionError>,
    >,
{
    service
        .execute(query::List::<N>::cursor(params(query)?))
        .map_ok(|page| Json(page.map(V::from)))
        .map_err(AsError::into_error)
        .await
}

/// Counts `N`odes matching the search term and the filters.
async fn count<Db, N>(
    Extension(service): Extension<Service<Db>>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Result<Json<Count>, Error>
where
    Db: Storage,
    N: Listable,
    Service<Db>: service::Query<
        query::Count<N>,
        Ok = u64,
        Err = Traced<query::listing::ExecutionError>,
    >,
{
    service
        .execute(query::Count::<N>::new(params(query)?))
        .map_ok(|count| Json(Count { count }))
        .map_err(AsError::into_error)
        .await
}

#[cfg(test)]
mod spec {
    use axum::{
        body::{self, Body},
        Router,
    };
    use common::{listing::Limits, DateTime};
    use http::{Request, StatusCode};
    use serde_json::Value;
    use service::{
        domain::{lesson, user, Lesson, User},
        infra::Memory,
        Config, Service,
    };
    use tower::ServiceExt as _;

    fn user(id: &str, name: &str, status: user::Status, at: i64) -> User {
        User {
            id: id.into(),
            name: user::Name::new(name).unwrap(),
            email: user::Email::new(format!("{id}@lisan.app")).unwrap(),
            status,
            created_at: DateTime::from_unix_timestamp(at).unwrap().coerce(),
        }
    }

    fn lesson(id: &str, title: &str, at: i64) -> Lesson {
        Lesson {
            id: id.into(),
            title: lesson::Title::new(title).unwrap(),
            description: format!("How to sign {title}").into(),
            category: lesson::Category::new("basics").unwrap(),
            status: lesson::Status::Published,
            created_at: DateTime::from_unix_timestamp(at).unwrap().coerce(),
        }
    }

    fn app() -> Router {
        let users = (0..8).map(|i| {
            let status = if i < 3 {
                user::Status::Blocked
            } else {
                user::Status::Active
            };
            user(&format!("u{i}"), &format!("Learner {i}"), status, i)
        });
        let lessons = [
            lesson("c", "Numbers", 2),
            lesson("b", "Family", 1),
            lesson("a", "Alphabet", 1),
        ];
        super::router(Service::new(
            Config {
                listing: Limits { default: 2, max: 5 },
            },
            Memory::new(users, lessons),
        ))
    }

    async fn request(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn ids(page: &Value) -> Vec<&str> {
        page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn paginates_with_total_count() {
        let (status, page) =
            request(app(), "GET", "/admin/users/paginate?page=2&limit=3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&page), ["u3", "u4", "u5"]);
        assert_eq!(page["totalCount"], 8);
        assert!(page.get("nextCursor").is_none());
    }

    #[tokio::test]
    async fn follows_cursors_to_the_end() {
        let app = app();
        let mut uri = "/admin/lessons/cursor?sortBy=createdAt&order=ASC".to_owned();
        let mut seen = Vec::new();
        loop {
            let (status, page) = request(app.clone(), "GET", &uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(page.get("totalCount").is_none());
            seen.extend(ids(&page).into_iter().map(ToOwned::to_owned));

            let Some(cursor) = page["nextCursor"].as_str() else {
                break;
            };
            uri = format!(
                "/admin/lessons/cursor?sortBy=createdAt&order=ASC&cursor={cursor}",
            );
        }

        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn counts_and_filters_by_status() {
        let (_, count) =
            request(app(), "GET", "/admin/users/count?status=BLOCKED").await;
        assert_eq!(count["count"], 3);

        let (_, page) = request(
            app(),
            "GET",
            "/admin/users/cursor?status=blocked&limit=5",
        )
        .await;
        assert_eq!(ids(&page), ["u0", "u1", "u2"]);
        assert!(page.get("nextCursor").is_none());
        assert_eq!(page["items"][0]["status"], "BLOCKED");
    }

    #[tokio::test]
    async fn sorts_by_requested_field_and_order() {
        let (status, page) =
            request(app(), "GET", "/admin/lessons/sort?by=title&order=desc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&page), ["c", "b", "a"]);
        assert_eq!(page["totalCount"], 3);
    }

    #[tokio::test]
    async fn caps_unlimited_sort_at_max_page_size() {
        let (status, page) = request(app(), "GET", "/admin/users/sort").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&page), ["u0", "u1", "u2", "u3", "u4"]);
        assert_eq!(page["totalCount"], 8);
    }

    #[tokio::test]
    async fn searches_case_insensitively() {
        let (_, page) =
            request(app(), "GET", "/admin/lessons/search?q=ALPHA").await;

        assert_eq!(ids(&page), ["a"]);
        assert_eq!(page["items"][0]["createdAt"], "1970-01-01T00:00:01Z");
    }

    #[tokio::test]
    async fn rejects_invalid_parameters() {
        for (uri, code) in [
            ("/admin/users/paginate?limit=6", "INVALID_LIMIT"),
            ("/admin/users/paginate?page=0", "INVALID_PAGE"),
            ("/admin/users/sort?by=password", "INVALID_SORT_FIELD"),
            ("/admin/users/sort?order=up", "INVALID_SORT_ORDER"),
            ("/admin/users/cursor?cursor=garbage", "INVALID_CURSOR"),
            ("/admin/users/filter?createdAt=yesterday", "INVALID_FILTER_VALUE"),
            ("/admin/lessons/sort?by=description", "INVALID_SORT_FIELD"),
        ] {
            let (status, body) = request(app(), "GET", uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(body["code"], code, "uri: {uri}");
            assert!(body["error"].is_string(), "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn returns_empty_page_beyond_the_end() {
        let (status, page) =
            request(app(), "GET", "/admin/users/paginate?page=100").await;

        assert_eq!(status, StatusCode::OK);
        assert!(ids(&page).is_empty());
        assert_eq!(page["totalCount"], 8);
    }

    #[tokio::test]
    async fn gets_single_entities() {
        let (status, lesson) = request(app(), "GET", "/admin/lessons/b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lesson["title"], "Family");

        let (status, body) = request(app(), "GET", "/admin/users/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "USER_NOT_EXISTS");
    }

    #[tokio::test]
    async fn blocks_and_unblocks_users() {
        let app = app();

        let (status, user) =
            request(app.clone(), "POST", "/admin/users/u5/block").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["status"], "BLOCKED");

        let (_, count) =
            request(app.clone(), "GET", "/admin/users/count?status=blocked").await;
        assert_eq!(count["count"], 4);

        let (_, user) =
            request(app.clone(), "POST", "/admin/users/u5/unblock").await;
        assert_eq!(user["status"], "ACTIVE");

        let (status, _) =
            request(app, "POST", "/admin/users/ghost/block").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
