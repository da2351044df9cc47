//! [`Command`] definition.

pub mod update_user_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::update_user_status::UpdateUserStatus;
