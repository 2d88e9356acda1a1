use axum::extract::State;
use shared::{SendEmailRequest, SendEmailResponse};

use crate::{
    error::{ApiError, ApiResult},
    metrics,
    response::ApiSuccess,
    state::AppState,
    validation::ValidatedJson,
};

/// POST /api/email
pub async fn send_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SendEmailRequest>,
) -> ApiResult<ApiSuccess<SendEmailResponse>> {
    const ROUTE: &str = "email-send";

    let message_id = state
        .mailer
        .send(&payload.to, &payload.subject, &payload.message)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    metrics::EMAILS_SENT.inc();
    tracing::info!(message_id = %message_id, "email dispatched");

    Ok(ApiSuccess::new(
        SendEmailResponse { message_id },
        "Email sent successfully",
    ))
}
