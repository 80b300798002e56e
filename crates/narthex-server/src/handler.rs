use axum::body::Bytes;
use axum::extract::State;
use axum::http::{self, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use narthex_store::Registrar;
use narthex_types::{Method, RegistrationOutcome, RegistrationRequest};

/// Response carrying only the status code mapped from an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutcomeResponse(pub RegistrationOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RegistrationOutcome::Created => StatusCode::CREATED,
            RegistrationOutcome::Conflict => StatusCode::CONFLICT,
            RegistrationOutcome::BadRequest => StatusCode::BAD_REQUEST,
            RegistrationOutcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        status.into_response()
    }
}

/// `PUT /register/0x<hex>` handler.
///
/// Store I/O is blocking, so the registration runs on the blocking pool and
/// always completes once started.
pub async fn register_handler(
    State(registrar): State<Registrar>,
    method: http::Method,
    uri: Uri,
    body: Bytes,
) -> OutcomeResponse {
    let request = RegistrationRequest::new(
        Method::from_http_name(method.as_str()),
        uri.path(),
        body.to_vec(),
    );

    let outcome = tokio::task::spawn_blocking(move || registrar.handle(&request))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "registration task failed");
            RegistrationOutcome::InternalError
        });

    OutcomeResponse(outcome)
}
