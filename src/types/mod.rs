//! Shared request and response types.

mod numeric;
mod response;

pub use numeric::Numeric;
pub use response::{ApiResponse, Created, NoPayload};
