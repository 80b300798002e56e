use std::sync::Arc;

use narthex_types::{KeyId, Method, RegistrationOutcome, RegistrationRequest};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::traits::KeyStore;

/// Path prefix of the registration route.
pub const REGISTER_PREFIX: &str = "/register/";

/// Registration core: validates a request, derives the identifier, and
/// maps the store result onto a [`RegistrationOutcome`].
///
/// Holds no mutable state of its own; all coordination between concurrent
/// registrations happens inside the store.
#[derive(Clone)]
pub struct Registrar {
    store: Arc<dyn KeyStore>,
}

impl Registrar {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    /// Run one registration attempt to completion.
    pub fn handle(&self, request: &RegistrationRequest) -> RegistrationOutcome {
        if request.method != Method::Put {
            debug!(method = %request.method, path = %request.path, "rejected non-PUT registration");
            return RegistrationOutcome::BadRequest;
        }

        if !has_register_shape(&request.path) {
            debug!(path = %request.path, "rejected registration outside the register route");
            return RegistrationOutcome::BadRequest;
        }

        let id = match KeyId::from_path(&request.path) {
            Ok(id) => id,
            Err(e) => {
                debug!(path = %request.path, error = %e, "rejected malformed key identifier");
                return RegistrationOutcome::BadRequest;
            }
        };

        match self.store.register(id, &request.body, request.body_length) {
            Ok(()) => {
                info!(key = %id, bytes = request.body_length, "key registered");
                RegistrationOutcome::Created
            }
            Err(StoreError::AlreadyRegistered(_)) => {
                info!(key = %id, "key already registered");
                RegistrationOutcome::Conflict
            }
            Err(e) => {
                warn!(key = %id, error = %e, "failed to store key record");
                e.outcome()
            }
        }
    }
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar").finish_non_exhaustive()
    }
}

/// `/register/<segment>` with no further separators in the segment.
fn has_register_shape(path: &str) -> bool {
    path.strip_prefix(REGISTER_PREFIX)
        .is_some_and(|rest| !rest.contains('/'))
}
