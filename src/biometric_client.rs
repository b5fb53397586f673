use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::configuration::BiometricSettings;
use crate::constants::{ENROLLMENT_SUCCESS_RESULT, WAV_EXTENSION};
use crate::domain::CallerIdentity;
use crate::errors::BiometricError;
use crate::utils::spawn_with_tracing;

const USERS_PATH: &str = "/users";
const ENROLLMENT_PATH: &str = "/enrollments/bywavurl";
const AUTHENTICATION_PATH: &str = "/authentications/bywavurl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    Exists,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentResult {
    pub succeeded: bool,
    pub raw_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResponseCode {
    Success,
    AuthFailed,
    PhraseNotDetected,
    Other(String),
}

impl From<String> for AuthResponseCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "SUC" => AuthResponseCode::Success,
            "ATF" => AuthResponseCode::AuthFailed,
            "VPND" => AuthResponseCode::PhraseNotDetected,
            _ => AuthResponseCode::Other(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub response_code: AuthResponseCode,
    pub raw_message: String,
}

impl AuthenticationResult {
    pub fn succeeded(&self) -> bool {
        self.response_code == AuthResponseCode::Success
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SivEnrollmentResponse {
    #[serde(default)]
    result: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SivAuthenticationResponse {
    #[serde(default)]
    response_code: String,
    #[serde(default)]
    result: String,
}

/// Voice biometric operations the call flow depends on.
#[async_trait]
pub trait BiometricService: Send + Sync {
    /// Never fails: anything other than a confirmed profile reads as `NotFound`.
    async fn lookup_or_create_profile(&self, identity: &CallerIdentity) -> ProfileStatus;

    async fn submit_enrollment_sample(
        &self,
        identity: &CallerIdentity,
        recording_url: &str,
    ) -> Result<EnrollmentResult, BiometricError>;

    async fn submit_authentication_sample(
        &self,
        identity: &CallerIdentity,
        recording_url: &str,
    ) -> Result<AuthenticationResult, BiometricError>;
}

#[derive(Debug)]
pub struct BiometricClient {
    http_client: Client,
    base_url: String,
    developer_id: SecretString,
    platform_id: String,
    confidence: u8,
}

impl BiometricClient {
    #[tracing::instrument(skip(settings), fields(base_url = %settings.base_url))]
    pub fn new(settings: &BiometricSettings) -> Result<Self, reqwest::Error> {
        tracing::info!("Establishing connection to the biometric server.");
        let http_client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            developer_id: settings.developer_id.clone(),
            platform_id: settings.platform_id.clone(),
            confidence: settings.confidence,
        })
    }

    fn request(&self, method: Method, path: &str, identity: &CallerIdentity) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header("VsitEmail", identity.surrogate_email())
            .header("VsitPassword", identity.derived_secret())
            .header("VsitDeveloperId", self.developer_id.expose_secret())
            .header("PlatformID", self.platform_id.as_str())
    }

    fn spawn_profile_creation(&self, identity: &CallerIdentity) {
        let request = self
            .request(Method::POST, USERS_PATH, identity)
            .header("VsitFirstName", identity.first_name())
            .header("VsitLastName", identity.last_name())
            .header("VsitPhone1", identity.phone_number());

        spawn_with_tracing(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!("Created biometric profile.");
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(%status, %body, "Failed to create biometric profile.");
                }
                Err(e) => {
                    tracing::error!("Failed to create biometric profile: {:?}", e);
                }
            }
        });
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, BiometricError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BiometricError::UnexpectedStatus { status, body });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| BiometricError::ParseError(err.to_string()))
    }
}

/// Recordings are referenced by URL; the service only accepts the `.wav` rendition.
pub fn wav_url(recording_url: &str) -> String {
    if recording_url.ends_with(WAV_EXTENSION) {
        recording_url.to_string()
    } else {
        format!("{}{}", recording_url, WAV_EXTENSION)
    }
}

#[async_trait]
impl BiometricService for BiometricClient {
    #[tracing::instrument(name = "Lookup biometric profile", skip(self, identity), fields(caller = %identity))]
    async fn lookup_or_create_profile(&self, identity: &CallerIdentity) -> ProfileStatus {
        let response = self.request(Method::GET, USERS_PATH, identity).send().await;
        match response {
            Ok(response) if response.status() == StatusCode::OK => ProfileStatus::Exists,
            Ok(response) if response.status() == StatusCode::PRECONDITION_FAILED => {
                tracing::info!("No biometric profile found, creating one.");
                self.spawn_profile_creation(identity);
                ProfileStatus::NotFound
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(%status, %body, "Unexpected response while looking up biometric profile.");
                ProfileStatus::NotFound
            }
            Err(e) => {
                tracing::error!("Biometric profile lookup failed: {:?}", e);
                ProfileStatus::NotFound
            }
        }
    }

    #[tracing::instrument(name = "Submit enrollment sample", skip(self, identity), fields(caller = %identity))]
    async fn submit_enrollment_sample(
        &self,
        identity: &CallerIdentity,
        recording_url: &str,
    ) -> Result<EnrollmentResult, BiometricError> {
        let response = self
            .request(Method::POST, ENROLLMENT_PATH, identity)
            .header("VsitwavURL", wav_url(recording_url))
            .send()
            .await?;
        let body: SivEnrollmentResponse = Self::parse_response(response).await?;
        tracing::info!(result = %body.result, "Enrollment sample processed.");
        Ok(EnrollmentResult {
            succeeded: body.result == ENROLLMENT_SUCCESS_RESULT,
            raw_message: body.result,
        })
    }

    #[tracing::instrument(name = "Submit authentication sample", skip(self, identity), fields(caller = %identity))]
    async fn submit_authentication_sample(
        &self,
        identity: &CallerIdentity,
        recording_url: &str,
    ) -> Result<AuthenticationResult, BiometricError> {
        let response = self
            .request(Method::POST, AUTHENTICATION_PATH, identity)
            .header("VsitConfidence", self.confidence.to_string())
            .header("VsitwavURL", wav_url(recording_url))
            .send()
            .await?;
        let body: SivAuthenticationResponse = Self::parse_response(response).await?;
        tracing::info!(
            response_code = %body.response_code,
            result = %body.result,
            "Authentication sample processed."
        );
        Ok(AuthenticationResult {
            response_code: AuthResponseCode::from(body.response_code),
            raw_message: body.result,
        })
    }
}
