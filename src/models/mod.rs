//! Data models for the gitnote document.
//!
//! These models match the JSON document persisted to the GitHub repository,
//! so a file written by the browser editor deserializes unchanged, including
//! its string-valued `categoryId` fields.

mod category;
mod document;
mod post;

pub use category::*;
pub use document::*;
pub use post::*;
