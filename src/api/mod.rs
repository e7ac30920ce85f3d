pub mod client;
pub mod error;
pub mod types;

pub use client::IncidexClient;
pub use error::{ApiError, ApiResult};
pub use types::*;
