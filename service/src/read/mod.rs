//! Read entities definitions.

pub mod lesson;
pub mod user;
