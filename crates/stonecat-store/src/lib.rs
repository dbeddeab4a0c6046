pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{StoreClient, StoreClientOptions};
pub use error::StoreError;
pub use types::{MatchMode, Record};
