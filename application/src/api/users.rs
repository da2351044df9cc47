//! [`User`]-related endpoints.

use axum::{
    extract::{rejection::PathRejection, Path},
    routing::{get, post},
    Extension, Json, Router,
};
use common::DateTime;
use futures::TryFutureExt as _;
use serde::Serialize;
use service::{
    command::UpdateUserStatus,
    domain::{self, user},
    query, Command as _, Service, Storage,
};

use crate::{define_error, AsError, Error};

/// A [`domain::User`] of the platform.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier of this [`User`].
    pub id: String,

    /// Name of this [`User`].
    pub name: String,

    /// Email address of this [`User`].
    pub email: String,

    /// Administrative status of this [`User`].
    pub status: user::Status,

    /// [`DateTime`] when this [`User`] joined the platform.
    pub created_at: DateTime,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        let domain::User {
            id,
            name,
            email,
            status,
            created_at,
        } = user;
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            status,
            created_at: created_at.coerce(),
        }
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

/// Builds the [`Router`] of [`User`] endpoints.
pub(crate) fn routes<Db: Storage>() -> Router {
    Router::new()
        .route("/search", get(super::list::<Db, domain::User, User>))
        .route("/sort", get(super::sort::<Db, domain::User, User>))
        .route("/filter", get(super::list::<Db, domain::User, User>))
        .route("/paginate", get(super::list::<Db, domain::User, User>))
        .route("/cursor", get(super::cursor::<Db, domain::User, User>))
        .route("/count", get(super::count::<Db, domain::User>))
        .route("/:id", get(by_id::<Db>))
        .route("/:id/block", post(block::<Db>))
        .route("/:id/unblock", post(unblock::<Db>))
}

/// Returns the [`User`] with the requested ID.
async fn by_id<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(query::user::ById::by(id.into()))
        .map_err(AsError::into_error)
        .await?
        .map(|u| Json(u.into()))
        .ok_or_else(|| UserError::NotExists.into())
}

/// Blocks the [`User`] with the requested ID.
async fn block<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, Error> {
    update_status(&service, id, user::Status::Blocked).await
}

/// Unblocks the [`User`] with the requested ID.
async fn unblock<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, Error> {
    update_status(&service, id, user::Status::Active).await
}

/// Sets the provided [`user::Status`] to the [`User`] with the requested ID.
async fn update_status<Db: Storage>(
    service: &Service<Db>,
    id: Result<Path<String>, PathRejection>,
    status: user::Status,
) -> Result<Json<User>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(UpdateUserStatus {
            user_id: id.into(),
            status,
        })
        .map_ok(|u| Json(u.into()))
        .map_err(AsError::into_error)
        .await
}
