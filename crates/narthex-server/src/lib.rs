//! HTTP front end for Narthex.
//!
//! Accepts `PUT /register/0x<hex>` with a small body of key material and
//! answers with an empty-bodied status: `201`, `400`, `409` or `500`.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, DEFAULT_MAX_BODY_SIZE};
pub use error::{ServerError, ServerResult};
pub use handler::OutcomeResponse;
pub use server::NarthexServer;
