pub mod client;
pub mod error;
pub mod traits;

pub use client::ReelpickClient;
pub use error::ApiError;
pub use traits::MovieBackend;
