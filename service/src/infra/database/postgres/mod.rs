//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;
mod like_pattern;
pub mod listing;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::NonTx,
    connection::Connection,
    like_pattern::LikePattern,
    listing::{Schema, Table},
};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`] client.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}
