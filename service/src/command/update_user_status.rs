//! [`Command`] for updating a [`user::Status`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for blocking or unblocking a [`User`].
#[derive(Clone, Debug, From)]
pub struct UpdateUserStatus {
    /// ID of the [`User`] which [`user::Status`] should be updated.
    pub user_id: user::Id,

    /// New [`user::Status`] of the [`User`].
    pub status: user::Status,
}

impl<Db> Command<UpdateUserStatus> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<database::Error>>
        + Sync,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(user_id = %cmd.user_id, status = %cmd.status),
    )]
    async fn execute(
        &self,
        cmd: UpdateUserStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUserStatus { user_id, status } = cmd;

        let mut user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if user.status == status {
            return Ok(user);
        }

        user.status = status;
        self.database()
            .execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!("`User` status changed");

        Ok(user)
    }
}

/// Error of [`UpdateUserStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}
