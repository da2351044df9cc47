//! [`Connection`] definitions.

use std::future::Future;

use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Generic database connection.
pub trait Connection {
    /// Queries the provided statement with the given parameters and returns the
    /// resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to query the statement.
    fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>> + Send
    where
        T: ToStatement + Sync + ?Sized;

    /// Queries the provided statement with the given parameters and returns the
    /// optional resulting row.
    ///
    /// # Errors
    ///
    /// If failed to query the statement.
    fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>> + Send
    where
        T: ToStatement + Sync + ?Sized;

    /// Executes the provided statement with the given parameters and returns
    /// the number of affected rows.
    ///
    /// # Errors
    ///
    /// If failed to execute the statement.
    fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>> + Send
    where
        T: ToStatement + Sync + ?Sized;
}

impl Connection for Client {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + Sync + ?Sized,
    {
        (**self)
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + Sync + ?Sized,
    {
        (**self)
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + Sync + ?Sized,
    {
        (**self)
            .execute(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}
