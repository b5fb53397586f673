use once_cell::sync::Lazy;
use voiceprint_ivr::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    #[allow(dead_code)]
    pub port: u16,
    pub biometric_server: MockServer,
    pub api_client: reqwest::Client,
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    let test_log = std::env::var("TEST_LOG")
        .map(|value| value == "true")
        .unwrap_or(false);
    if test_log {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

impl TestApp {
    pub async fn post_webhook(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_webhook_text(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.post_webhook(path, form).await;
        assert_eq!(response.status().as_u16(), 200);
        response.text().await.expect("Failed to read body.")
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let biometric_server = MockServer::start().await;
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.host = "127.0.0.1".to_string();
        c.application.port = 0;
        c.application.workers = 1;
        c.biometric.base_url = biometric_server.uri();
        c.biometric.timeout_milliseconds = 1000;
        c
    };
    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let application_port = application.port();

    let address = format!("http://127.0.0.1:{}", application_port);
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        port: application_port,
        biometric_server,
        api_client: reqwest::Client::new(),
    }
}
