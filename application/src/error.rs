//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use common::listing;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::{command::update_user_status, infra::database, query};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] representing a malformed request.
    #[must_use]
    pub fn bad_request(code: Code, msg: &impl ToString) -> Self {
        Self {
            code,
            status_code: http::StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        /// JSON body of an [`Error`] response.
        #[derive(Serialize)]
        struct Body<'a> {
            error: &'a str,
            code: Code,
        }

        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }

        (
            self.status_code,
            Json(Body {
                error: if self.status_code.is_server_error() {
                    "Internal server error"
                } else {
                    self.message.as_str()
                },
                code: self.code,
            }),
        )
            .into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request("INVALID_QUERY", &self.body_text()))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request("INVALID_PATH", &self.body_text()))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DATA_SOURCE_UNAVAILABLE"]
                #[status = INTERNAL_SERVER_ERROR]
                #[message = "Data source is unavailable"]
                Unavailable,
            }
        }

        Some(Error::Unavailable.into())
    }
}

impl AsError for listing::Error {
    fn try_as_error(&self) -> Option<Error> {
        let code = match self {
            Self::InvalidSortField(_) => "INVALID_SORT_FIELD",
            Self::InvalidSortOrder(_) => "INVALID_SORT_ORDER",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::InvalidPage(_) => "INVALID_PAGE",
            Self::InvalidCursor => "INVALID_CURSOR",
            Self::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
        };
        Some(Error::bad_request(code, self))
    }
}

impl AsError for query::listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Invalid(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for update_user_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => {
                Some(crate::api::users::UserError::NotExists.into())
            }
        }
    }
}
