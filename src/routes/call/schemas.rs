use actix_http::Payload;
use actix_web::web::{Form, Query};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::errors::WebhookError;
use crate::constants::{DIGITS_PARAM, ENROLL_COUNT_PARAM, TIMEOUT_SENTINEL};

/// One webhook endpoint of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStep {
    IncomingCall,
    RouteIntent,
    Enroll,
    ProcessEnrollment,
    Authenticate,
    ProcessAuthentication,
    PostLoginMenu,
    SubMenu,
}

impl CallStep {
    pub const ALL: [CallStep; 8] = [
        CallStep::IncomingCall,
        CallStep::RouteIntent,
        CallStep::Enroll,
        CallStep::ProcessEnrollment,
        CallStep::Authenticate,
        CallStep::ProcessAuthentication,
        CallStep::PostLoginMenu,
        CallStep::SubMenu,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            CallStep::IncomingCall => "/incoming_call",
            CallStep::RouteIntent => "/enroll_or_authenticate",
            CallStep::Enroll => "/enroll",
            CallStep::ProcessEnrollment => "/process_enrollment",
            CallStep::Authenticate => "/authenticate",
            CallStep::ProcessAuthentication => "/process_authentication",
            CallStep::PostLoginMenu => "/options",
            CallStep::SubMenu => "/subOptions",
        }
    }

    /// Matches on the last path segment so the routes can be mounted under a scope.
    pub fn from_path(path: &str) -> Option<Self> {
        let segment = path.trim_end_matches('/').rsplit('/').next()?;
        CallStep::ALL
            .into_iter()
            .find(|step| step.path().trim_start_matches('/') == segment)
    }

    /// Where a caller is sent back to when this step cannot be completed.
    pub fn retry_step(&self) -> CallStep {
        match self {
            CallStep::IncomingCall => CallStep::IncomingCall,
            CallStep::RouteIntent => CallStep::Authenticate,
            CallStep::Enroll | CallStep::ProcessEnrollment => CallStep::Enroll,
            CallStep::Authenticate | CallStep::ProcessAuthentication => CallStep::Authenticate,
            CallStep::PostLoginMenu | CallStep::SubMenu => CallStep::PostLoginMenu,
        }
    }

    pub fn url(&self) -> String {
        self.path().to_string()
    }

    pub fn url_with_count(&self, count: EnrollmentCount) -> String {
        format!("{}?{}={}", self.path(), ENROLL_COUNT_PARAM, count.value())
    }

    pub fn url_with_timeout(&self) -> String {
        format!("{}?{}={}", self.path(), DIGITS_PARAM, TIMEOUT_SENTINEL)
    }

    pub fn retry_url(&self, count: EnrollmentCount) -> String {
        match self.retry_step() {
            CallStep::Enroll => CallStep::Enroll.url_with_count(count),
            step => step.url(),
        }
    }
}

/// Successful enrollment samples so far.
///
/// Carried between turns in the `enrollCount` query parameter, the only state
/// that survives from one webhook to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EnrollmentCount(u32);

impl EnrollmentCount {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Absent, empty, negative or non-numeric values all read as zero.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<u32>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn is_complete(&self, required: u32) -> bool {
        self.0 >= required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitInput {
    Pressed(String),
    Timeout,
}

impl DigitInput {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(digits) if !digits.is_empty() && digits != TIMEOUT_SENTINEL => {
                DigitInput::Pressed(digits.to_string())
            }
            _ => DigitInput::Timeout,
        }
    }

    pub fn is(&self, expected: &str) -> bool {
        matches!(self, DigitInput::Pressed(digits) if digits == expected)
    }
}

/// Fields the telephony platform posts on every webhook. Everything else in the
/// body is ignored.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct WebhookForm {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Digits")]
    pub digits: Option<String>,
    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct TurnQuery {
    /// Continuation token for the enrollment loop.
    pub enroll_count: Option<String>,
    /// Set to `TIMEOUT` when a gather expired without input.
    pub digits: Option<String>,
}

/// State inferred from a single webhook request.
#[derive(Debug, Clone)]
pub struct CallTurn {
    pub step: CallStep,
    pub phone_number: Option<String>,
    pub digits: DigitInput,
    pub recording_url: Option<String>,
    pub enrollment_count: EnrollmentCount,
}

impl CallTurn {
    pub fn new(step: CallStep, form: WebhookForm, query: TurnQuery) -> Self {
        let digits = form.digits.or(query.digits);
        Self {
            step,
            phone_number: form.from.filter(|from| !from.trim().is_empty()),
            digits: DigitInput::parse(digits.as_deref()),
            recording_url: form.recording_url.filter(|url| !url.trim().is_empty()),
            enrollment_count: EnrollmentCount::parse(query.enroll_count.as_deref()),
        }
    }

    pub fn caller(&self) -> Result<&str, WebhookError> {
        self.phone_number.as_deref().ok_or_else(|| {
            WebhookError::validation(
                "Missing caller phone number",
                self.step.retry_url(self.enrollment_count),
            )
        })
    }
}

impl FromRequest for CallTurn {
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let step = CallStep::from_path(req.path()).unwrap_or(CallStep::IncomingCall);
        let query = Query::<TurnQuery>::from_query(req.query_string())
            .map(Query::into_inner)
            .unwrap_or_default();
        let retry_url = step.retry_url(EnrollmentCount::parse(query.enroll_count.as_deref()));
        let fut = Form::<WebhookForm>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(form) => Ok(CallTurn::new(step, form.into_inner(), query)),
                Err(e) => Err(WebhookError::validation(e.to_string(), retry_url)),
            }
        })
    }
}
