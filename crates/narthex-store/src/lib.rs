//! Key record storage for Narthex.
//!
//! A Key Record is a file named `0x<hex>.key` holding the exact bytes a
//! caller registered under that identifier. Records are created once and
//! never rewritten.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyStore`] trait:
//!
//! - [`FsKeyStore`] -- flat directory of record files, one per identifier
//! - [`InMemoryKeyStore`] -- `HashMap`-based store for tests and embedding
//!
//! [`Registrar`] sits in front of a store and turns a
//! [`RegistrationRequest`](narthex_types::RegistrationRequest) into a
//! [`RegistrationOutcome`](narthex_types::RegistrationOutcome).
//!
//! # Design Rules
//!
//! 1. A record is created by a single exclusive-create call; there is no
//!    separate existence check and no in-process lock.
//! 2. A record is either complete or absent. Failed writes remove the file.
//! 3. Failure detail is logged, never returned to the caller.

pub mod error;
pub mod fs;
pub mod memory;
pub mod registrar;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{FsKeyStore, FsStoreConfig, MAX_RECORD_NAME_LEN};
pub use memory::InMemoryKeyStore;
pub use registrar::{Registrar, REGISTER_PREFIX};
pub use traits::KeyStore;
