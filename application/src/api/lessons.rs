//! [`Lesson`]-related endpoints.

use axum::{
    extract::{rejection::PathRejection, Path},
    routing::get,
    Extension, Json, Router,
};
use common::DateTime;
use futures::TryFutureExt as _;
use serde::Serialize;
use service::{
    domain::{self, lesson},
    query, Query as _, Service, Storage,
};

use crate::{define_error, AsError, Error};

/// A sign language [`domain::Lesson`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Unique identifier of this [`Lesson`].
    pub id: String,

    /// Title of this [`Lesson`].
    pub title: String,

    /// Description of this [`Lesson`].
    pub description: String,

    /// Category this [`Lesson`] belongs to.
    pub category: String,

    /// Publication status of this [`Lesson`].
    pub status: lesson::Status,

    /// [`DateTime`] when this [`Lesson`] was created.
    pub created_at: DateTime,
}

impl From<domain::Lesson> for Lesson {
    fn from(lesson: domain::Lesson) -> Self {
        let domain::Lesson {
            id,
            title,
            description,
            category,
            status,
            created_at,
        } = lesson;
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            status,
            created_at: created_at.coerce(),
        }
    }
}

define_error! {
    enum LessonError {
        #[code = "LESSON_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Lesson` with the specified ID does not exist"]
        NotExists,
    }
}

/// Builds the [`Router`] of [`Lesson`] endpoints.
pub(crate) fn routes<Db: Storage>() -> Router {
    Router::new()
        .route("/search", get(super::list::<Db, domain::Lesson, Lesson>))
        .route("/sort", get(super::sort::<Db, domain::Lesson, Lesson>))
        .route("/filter", get(super::list::<Db, domain::Lesson, Lesson>))
        .route("/paginate", get(super::list::<Db, domain::Lesson, Lesson>))
        .route("/cursor", get(super::cursor::<Db, domain::Lesson, Lesson>))
        .route("/count", get(super::count::<Db, domain::Lesson>))
        .route("/:id", get(by_id::<Db>))
}

/// Returns the [`Lesson`] with the requested ID.
async fn by_id<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Lesson>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(query::lesson::ById::by(id.into()))
        .map_err(AsError::into_error)
        .await?
        .map(|l| Json(l.into()))
        .ok_or_else(|| LessonError::NotExists.into())
}
