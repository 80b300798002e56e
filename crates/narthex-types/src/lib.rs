//! Foundation types for the Narthex key-registration service.
//!
//! # Key Types
//!
//! - [`KeyId`] — 32-bit key identifier parsed from `/register/0x<hex>` paths
//! - [`RegistrationRequest`] — a single inbound registration attempt
//! - [`RegistrationOutcome`] — the verdict handed back to the front end

pub mod error;
pub mod key_id;
pub mod request;

pub use error::TypeError;
pub use key_id::{KeyId, MAX_HEX_DIGITS, MIN_HEX_DIGITS};
pub use request::{Method, RegistrationOutcome, RegistrationRequest};
