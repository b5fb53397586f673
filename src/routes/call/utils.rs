use std::sync::Arc;

use super::schemas::{CallStep, DigitInput, EnrollmentCount};
use crate::biometric_client::{
    AuthResponseCode, AuthenticationResult, BiometricService, ProfileStatus,
};
use crate::configuration::CallFlowSettings;
use crate::constants::{
    AUTHENTICATION_FINISH_KEY, ENROLL_DIGIT, GATHER_NUM_DIGITS, GATHER_TIMEOUT_SECONDS,
    RECORDING_MAX_LENGTH_SECONDS,
};
use crate::domain::CallerIdentity;
use crate::voice_response::{Gather, Record, Trim, VoiceResponse};

pub const ENROLLMENT_RETRY_MESSAGE: &str =
    "Sorry, your recording did not go through. Please try again.";
pub const AUTHENTICATION_FAILED_MESSAGE: &str =
    "Your authentication did not pass. Please try again.";
pub const AUTHENTICATION_ERROR_MESSAGE: &str =
    "OOPS! Your authentication did not pass. Please try again.";
pub const AUTHENTICATION_SUCCESS_MESSAGE: &str = "Great you are in now";
pub const PHRASE_NOT_DETECTED_MESSAGE: &str =
    "Voiceprint Phrase not detected. Please make sure Voiceprint Phrase is at least 1.2 seconds long.";

/// Outcome of one enrollment submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentTransition {
    /// Enough samples recorded, move on to authentication.
    Completed(EnrollmentCount),
    /// Sample accepted, another one is needed.
    Continue(EnrollmentCount),
    /// Sample rejected, count untouched.
    Retry(EnrollmentCount),
}

pub fn enrollment_transition(
    count: EnrollmentCount,
    sample_accepted: bool,
    required: u32,
) -> EnrollmentTransition {
    if !sample_accepted {
        return EnrollmentTransition::Retry(count);
    }
    let count = count.increment();
    if count.is_complete(required) {
        EnrollmentTransition::Completed(count)
    } else {
        EnrollmentTransition::Continue(count)
    }
}

pub fn intent_step(digits: &DigitInput) -> CallStep {
    if digits.is(ENROLL_DIGIT) {
        CallStep::Enroll
    } else {
        CallStep::Authenticate
    }
}

pub struct CallFlow {
    settings: CallFlowSettings,
    biometric: Arc<dyn BiometricService>,
}

impl CallFlow {
    pub fn new(settings: CallFlowSettings, biometric: Arc<dyn BiometricService>) -> Self {
        Self {
            settings,
            biometric,
        }
    }

    fn identity(&self, phone_number: &str) -> CallerIdentity {
        CallerIdentity::derive(phone_number, &self.settings.email_domain)
    }

    pub async fn incoming_call(&self, phone_number: &str) -> VoiceResponse {
        let identity = self.identity(phone_number);
        match self.biometric.lookup_or_create_profile(&identity).await {
            ProfileStatus::Exists => VoiceResponse::new()
                .say(format!(
                    "You have reached {}. Your phone number has been recognized in our system.",
                    self.settings.company_name
                ))
                .gather(Gather {
                    action: CallStep::RouteIntent.url(),
                    num_digits: GATHER_NUM_DIGITS,
                    timeout: GATHER_TIMEOUT_SECONDS,
                    prompt: format!(
                        "You can now log in, or press {} now to enroll for the first time.",
                        ENROLL_DIGIT
                    ),
                })
                .redirect(CallStep::RouteIntent.url_with_timeout()),
            ProfileStatus::NotFound => VoiceResponse::new()
                .say(format!(
                    "Welcome to {}. Our system identifies you as a new user, \
                     you will now be taken through the enrollment process.",
                    self.settings.company_name
                ))
                .redirect(CallStep::Enroll.url()),
        }
    }

    pub fn route_intent(&self, digits: &DigitInput) -> VoiceResponse {
        match intent_step(digits) {
            CallStep::Enroll => VoiceResponse::new()
                .say(format!(
                    "You have chosen to create a new account with our voice recognition system. \
                     You will be asked to say a phrase {} times, then you will be able to log in \
                     with that phrase.",
                    self.settings.required_enrollments
                ))
                .redirect(CallStep::Enroll.url()),
            step => VoiceResponse::new().redirect(step.url()),
        }
    }

    pub fn enroll(&self, count: EnrollmentCount) -> VoiceResponse {
        VoiceResponse::new()
            .say("Please say the following phrase to enroll.")
            .pause(1)
            .say(self.settings.passphrase.as_str())
            .record(Record {
                action: CallStep::ProcessEnrollment.url_with_count(count),
                max_length: RECORDING_MAX_LENGTH_SECONDS,
                trim: Trim::DoNotTrim,
                finish_on_key: None,
            })
    }

    pub async fn process_enrollment(
        &self,
        phone_number: &str,
        recording_url: Option<&str>,
        count: EnrollmentCount,
    ) -> VoiceResponse {
        let accepted = match recording_url {
            Some(recording_url) => {
                let identity = self.identity(phone_number);
                match self
                    .biometric
                    .submit_enrollment_sample(&identity, recording_url)
                    .await
                {
                    Ok(result) => result.succeeded,
                    Err(e) => {
                        tracing::error!("Enrollment sample submission failed: {:?}", e);
                        false
                    }
                }
            }
            None => {
                tracing::warn!("Enrollment turn arrived without a recording");
                false
            }
        };

        match enrollment_transition(count, accepted, self.settings.required_enrollments) {
            EnrollmentTransition::Completed(_) => VoiceResponse::new()
                .say(
                    "Thank you, recording is received. You are now enrolled and would be \
                     redirected to log in.",
                )
                .redirect(CallStep::Authenticate.url()),
            EnrollmentTransition::Continue(count) => VoiceResponse::new()
                .say(
                    "Thank you, recording is received. You will now be asked to record your \
                     phrase again.",
                )
                .redirect(CallStep::Enroll.url_with_count(count)),
            EnrollmentTransition::Retry(count) => VoiceResponse::new()
                .say(ENROLLMENT_RETRY_MESSAGE)
                .redirect(CallStep::Enroll.url_with_count(count)),
        }
    }

    pub fn authenticate(&self) -> VoiceResponse {
        VoiceResponse::new()
            .say(
                "Please say the following phrase to authenticate. \
                 Once complete press the pound key.",
            )
            .pause(1)
            .say(self.settings.passphrase.as_str())
            .record(Record {
                action: CallStep::ProcessAuthentication.url(),
                max_length: RECORDING_MAX_LENGTH_SECONDS,
                trim: Trim::DoNotTrim,
                finish_on_key: Some(AUTHENTICATION_FINISH_KEY.to_string()),
            })
    }

    pub async fn process_authentication(
        &self,
        phone_number: &str,
        recording_url: Option<&str>,
    ) -> VoiceResponse {
        let Some(recording_url) = recording_url else {
            tracing::warn!("Authentication turn arrived without a recording");
            return authentication_error();
        };
        let identity = self.identity(phone_number);
        match self
            .biometric
            .submit_authentication_sample(&identity, recording_url)
            .await
        {
            Ok(result) => authentication_outcome(result),
            Err(e) => {
                tracing::error!("Authentication sample submission failed: {:?}", e);
                authentication_error()
            }
        }
    }

    pub fn post_login_menu(&self) -> VoiceResponse {
        VoiceResponse::new()
            .say("Select one of the option to proceed")
            .pause(2)
            .gather(Gather {
                action: CallStep::SubMenu.url(),
                num_digits: GATHER_NUM_DIGITS,
                timeout: GATHER_TIMEOUT_SECONDS,
                prompt: self.menu_prompt(),
            })
            .redirect(CallStep::SubMenu.url_with_timeout())
    }

    fn menu_prompt(&self) -> String {
        self.settings
            .menu_options
            .iter()
            .enumerate()
            .map(|(index, option)| format!("Press {} for {}.", index + 1, option))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn sub_menu(&self, digits: &DigitInput) -> VoiceResponse {
        let selected = match digits {
            DigitInput::Pressed(digits) => digits
                .parse::<usize>()
                .ok()
                .and_then(|choice| choice.checked_sub(1))
                .and_then(|index| self.settings.menu_options.get(index)),
            DigitInput::Timeout => None,
        };
        let response = match selected {
            Some(option) => VoiceResponse::new().say(format!("You selected {}.", option)),
            None => VoiceResponse::new(),
        };
        response
            .say(
                "A customer care executive will assist you shortly, please wait while we \
                 transfer your call. This call will be recorded and monitored for quality and \
                 training purposes.",
            )
            .play(self.settings.hold_music_url.as_str())
    }
}

fn authentication_error() -> VoiceResponse {
    VoiceResponse::new()
        .say(AUTHENTICATION_ERROR_MESSAGE)
        .redirect(CallStep::Authenticate.url())
}

fn authentication_outcome(result: AuthenticationResult) -> VoiceResponse {
    match result.response_code {
        AuthResponseCode::AuthFailed => VoiceResponse::new()
            .say(AUTHENTICATION_FAILED_MESSAGE)
            .redirect(CallStep::Authenticate.url()),
        AuthResponseCode::Success => VoiceResponse::new()
            .say(AUTHENTICATION_SUCCESS_MESSAGE)
            .redirect(CallStep::PostLoginMenu.url()),
        AuthResponseCode::PhraseNotDetected => {
            phrase_not_detected_then_result(VoiceResponse::new(), &result.raw_message)
        }
        AuthResponseCode::Other(_) => speak_raw_result(VoiceResponse::new(), &result.raw_message),
    }
}

/// A phrase-not-detected result speaks the length hint and then the service's
/// own message, with no redirect: the caller hears both and the turn ends.
fn phrase_not_detected_then_result(response: VoiceResponse, raw_message: &str) -> VoiceResponse {
    speak_raw_result(response.say(PHRASE_NOT_DETECTED_MESSAGE), raw_message)
}

fn speak_raw_result(response: VoiceResponse, raw_message: &str) -> VoiceResponse {
    response.say(raw_message)
}
