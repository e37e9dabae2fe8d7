pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod class_members;
pub mod classes;
pub mod common;
pub mod grades;
pub mod users;

pub use common::{ErrorResponse, MessageResponse};
