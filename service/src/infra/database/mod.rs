//! [`Database`]-related implementations.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use common::operations::{By, Select, Update};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{
    domain::{lesson, user, Lesson, User},
    read,
};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;
pub use self::memory::Memory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

/// [`Database`] providing every operation of the [`Service`].
///
/// [`Service`]: crate::Service
pub trait Storage:
    Database<
        Select<By<read::user::list::Page, read::user::list::Descriptor>>,
        Ok = read::user::list::Page,
        Err = Traced<Error>,
    > + Database<
        Select<By<u64, read::user::list::Filter>>,
        Ok = u64,
        Err = Traced<Error>,
    > + Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<Error>,
    > + Database<Update<User>, Ok = (), Err = Traced<Error>>
    + Database<
        Select<By<read::lesson::list::Page, read::lesson::list::Descriptor>>,
        Ok = read::lesson::list::Page,
        Err = Traced<Error>,
    > + Database<
        Select<By<u64, read::lesson::list::Filter>>,
        Ok = u64,
        Err = Traced<Error>,
    > + Database<
        Select<By<Option<Lesson>, lesson::Id>>,
        Ok = Option<Lesson>,
        Err = Traced<Error>,
    > + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Storage for T where
    T: Database<
            Select<By<read::user::list::Page, read::user::list::Descriptor>>,
            Ok = read::user::list::Page,
            Err = Traced<Error>,
        > + Database<
            Select<By<u64, read::user::list::Filter>>,
            Ok = u64,
            Err = Traced<Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<Error>>
        + Database<
            Select<
                By<read::lesson::list::Page, read::lesson::list::Descriptor>,
            >,
            Ok = read::lesson::list::Page,
            Err = Traced<Error>,
        > + Database<
            Select<By<u64, read::lesson::list::Filter>>,
            Ok = u64,
            Err = Traced<Error>,
        > + Database<
            Select<By<Option<Lesson>, lesson::Id>>,
            Ok = Option<Lesson>,
            Err = Traced<Error>,
        > + Clone
        + Send
        + Sync
        + 'static
{
}
