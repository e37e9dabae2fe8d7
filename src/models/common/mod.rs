pub mod response;

pub use response::{ErrorResponse, MessageResponse};
