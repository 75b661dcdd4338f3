//! Dispatch backend API client.

mod http;
mod types;

pub use http::*;
pub use types::*;
