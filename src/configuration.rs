use config::{self, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub biometric: BiometricSettings,
    pub call_flow: CallFlowSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BiometricSettings {
    pub base_url: String,
    pub developer_id: SecretString,
    pub platform_id: String,
    pub confidence: u8,
    pub timeout_milliseconds: u64,
}

impl BiometricSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CallFlowSettings {
    /// Successful samples needed before a voiceprint is usable.
    pub required_enrollments: u32,
    pub email_domain: String,
    pub company_name: String,
    pub passphrase: String,
    pub hold_music_url: String,
    #[serde(default)]
    pub menu_options: Vec<String>,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");
    let builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("configuration.yaml"),
        ))
        // e.g. `APP__BIOMETRIC__DEVELOPER_ID=...` overrides `biometric.developer_id`
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    builder.try_deserialize::<Settings>()
}
