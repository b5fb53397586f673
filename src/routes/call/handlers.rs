use super::errors::WebhookError;
use super::schemas::{CallTurn, TurnQuery, WebhookForm};
use super::utils::CallFlow;
use crate::voice_response::VoiceResponse;

use actix_web::web;

#[utoipa::path(
    post,
    path = "/incoming_call",
    tag = "Call Flow",
    description = "Entry point for a new call. Looks up the caller's voiceprint profile and either offers enrollment or starts it.",
    summary = "Incoming Call",
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Incoming call", skip(turn, flow), fields(caller = tracing::field::Empty))]
pub async fn incoming_call(
    turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    let caller = turn.caller()?;
    tracing::Span::current().record("caller", caller);
    Ok(flow.incoming_call(caller).await)
}

#[utoipa::path(
    post,
    path = "/enroll_or_authenticate",
    tag = "Call Flow",
    description = "Routes the caller to enrollment when they pressed 1, otherwise to authentication.",
    summary = "Route Intent",
    params(TurnQuery),
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Route intent", skip(turn, flow), fields(digits = ?turn.digits))]
pub async fn enroll_or_authenticate(
    turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    Ok(flow.route_intent(&turn.digits))
}

#[utoipa::path(
    post,
    path = "/enroll",
    tag = "Call Flow",
    description = "Prompts for the passphrase and records one enrollment sample.",
    summary = "Enroll",
    params(TurnQuery),
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Enroll", skip(turn, flow), fields(enroll_count = turn.enrollment_count.value()))]
pub async fn enroll(turn: CallTurn, flow: web::Data<CallFlow>) -> Result<VoiceResponse, WebhookError> {
    Ok(flow.enroll(turn.enrollment_count))
}

#[utoipa::path(
    post,
    path = "/process_enrollment",
    tag = "Call Flow",
    description = "Submits the recorded sample for enrollment and decides whether another sample is needed.",
    summary = "Process Enrollment",
    params(TurnQuery),
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(
    name = "Process enrollment",
    skip(turn, flow),
    fields(caller = tracing::field::Empty, enroll_count = turn.enrollment_count.value())
)]
pub async fn process_enrollment(
    turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    let caller = turn.caller()?;
    tracing::Span::current().record("caller", caller);
    Ok(flow
        .process_enrollment(caller, turn.recording_url.as_deref(), turn.enrollment_count)
        .await)
}

#[utoipa::path(
    post,
    path = "/authenticate",
    tag = "Call Flow",
    description = "Prompts for the passphrase and records an authentication sample.",
    summary = "Authenticate",
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Authenticate", skip(_turn, flow))]
pub async fn authenticate(
    _turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    Ok(flow.authenticate())
}

#[utoipa::path(
    post,
    path = "/process_authentication",
    tag = "Call Flow",
    description = "Verifies the recorded sample against the caller's voiceprint.",
    summary = "Process Authentication",
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Process authentication", skip(turn, flow), fields(caller = tracing::field::Empty))]
pub async fn process_authentication(
    turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    let caller = turn.caller()?;
    tracing::Span::current().record("caller", caller);
    Ok(flow
        .process_authentication(caller, turn.recording_url.as_deref())
        .await)
}

#[utoipa::path(
    post,
    path = "/options",
    tag = "Call Flow",
    description = "Menu offered after a successful login.",
    summary = "Post Login Menu",
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Post login menu", skip(_turn, flow))]
pub async fn options(_turn: CallTurn, flow: web::Data<CallFlow>) -> Result<VoiceResponse, WebhookError> {
    Ok(flow.post_login_menu())
}

#[utoipa::path(
    post,
    path = "/subOptions",
    tag = "Call Flow",
    description = "Acknowledges the menu choice and places the caller on hold for an agent.",
    summary = "Sub Menu",
    params(TurnQuery),
    request_body(content = WebhookForm, description = "Telephony webhook form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML instructions", body = String, content_type = "text/xml"),
    )
)]
#[tracing::instrument(name = "Sub menu", skip(turn, flow), fields(digits = ?turn.digits))]
pub async fn sub_options(
    turn: CallTurn,
    flow: web::Data<CallFlow>,
) -> Result<VoiceResponse, WebhookError> {
    Ok(flow.sub_menu(&turn.digits))
}
