use crate::routes::call::handlers;
use crate::routes::call::schemas::WebhookForm;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::incoming_call,
        handlers::enroll_or_authenticate,
        handlers::enroll,
        handlers::process_enrollment,
        handlers::authenticate,
        handlers::process_authentication,
        handlers::options,
        handlers::sub_options,
    ),
    components(schemas(WebhookForm)),
    tags(
        (name = "Call Flow", description = "Telephony webhook endpoints for voiceprint enrollment and login")
    ),
)]
pub struct ApiDoc;
