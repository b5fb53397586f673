pub mod biometric_client;
pub mod configuration;
pub mod constants;
pub mod domain;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
pub mod voice_response;
