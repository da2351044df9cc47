//! Domain definitions.

pub mod lesson;
pub mod user;

pub use self::{lesson::Lesson, user::User};
