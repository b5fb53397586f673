use crate::helpers::spawn_app;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

const CALLER: &str = "+15551230000";

#[tokio::test]
async fn new_caller_is_greeted_and_sent_to_enrollment() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("VsitEmail", "+15551230000@twiliobioauth.example.com"))
        .respond_with(ResponseTemplate::new(412))
        .expect(1)
        .mount(&app.biometric_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&app.biometric_server)
        .await;

    let response = app.post_webhook("/incoming_call", &[("From", CALLER)]).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/xml")
    );
    let body = response.text().await.expect("Failed to read body.");
    assert!(body.contains("identifies you as a new user"));
    assert!(body.contains(r#"<Redirect method="POST">/enroll</Redirect>"#));

    let body = app.post_webhook_text("/enroll", &[("From", CALLER)]).await;
    assert!(body.contains(r#"<Record action="/process_enrollment?enrollCount=0""#));
}

#[tokio::test]
async fn existing_caller_without_input_is_sent_to_authentication() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&app.biometric_server)
        .await;

    let body = app.post_webhook_text("/incoming_call", &[("From", CALLER)]).await;
    assert!(body.contains("has been recognized"));
    assert!(body.contains(r#"<Gather action="/enroll_or_authenticate" numDigits="1" timeout="3">"#));
    assert!(body.contains("/enroll_or_authenticate?digits=TIMEOUT"));

    // the gather expired, so the platform follows the trailing redirect
    let body = app
        .post_webhook_text("/enroll_or_authenticate?digits=TIMEOUT", &[("From", CALLER)])
        .await;
    assert!(body.contains(r#"<Redirect method="POST">/authenticate</Redirect>"#));

    let body = app
        .post_webhook_text("/enroll_or_authenticate", &[("From", CALLER), ("Digits", "7")])
        .await;
    assert!(body.contains(r#"<Redirect method="POST">/authenticate</Redirect>"#));

    let body = app
        .post_webhook_text("/enroll_or_authenticate", &[("From", CALLER), ("Digits", "1")])
        .await;
    assert!(body.contains(r#"<Redirect method="POST">/enroll</Redirect>"#));
}

#[tokio::test]
async fn three_successful_samples_lead_to_authentication() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/enrollments/bywavurl"))
        .and(header("VsitwavURL", "https://api.twilio.com/recordings/RE1.wav"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"Result": "Success"})),
        )
        .expect(3)
        .mount(&app.biometric_server)
        .await;

    let form = [
        ("From", CALLER),
        ("RecordingUrl", "https://api.twilio.com/recordings/RE1"),
    ];
    let body = app.post_webhook_text("/process_enrollment?enrollCount=0", &form).await;
    assert!(body.contains("/enroll?enrollCount=1"));
    let body = app.post_webhook_text("/process_enrollment?enrollCount=1", &form).await;
    assert!(body.contains("/enroll?enrollCount=2"));
    let body = app.post_webhook_text("/process_enrollment?enrollCount=2", &form).await;
    assert!(body.contains("You are now enrolled"));
    assert!(body.contains(r#"<Redirect method="POST">/authenticate</Redirect>"#));
}

#[tokio::test]
async fn rejected_sample_keeps_the_enrollment_count() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/enrollments/bywavurl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"Result": "Voiceprint too short"})),
        )
        .mount(&app.biometric_server)
        .await;

    let body = app
        .post_webhook_text(
            "/process_enrollment?enrollCount=2",
            &[("From", CALLER), ("RecordingUrl", "https://api.twilio.com/r")],
        )
        .await;
    assert!(body.contains("did not go through"));
    assert!(body.contains("/enroll?enrollCount=2"));
}

#[tokio::test]
async fn phrase_not_detected_speaks_both_messages_without_redirect() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/authentications/bywavurl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ResponseCode": "VPND",
            "Result": "Voiceprint phrase not detected"
        })))
        .mount(&app.biometric_server)
        .await;

    let body = app
        .post_webhook_text(
            "/process_authentication",
            &[("From", CALLER), ("RecordingUrl", "https://api.twilio.com/r")],
        )
        .await;
    let hint = body
        .find("at least 1.2 seconds long")
        .expect("phrase length hint should be spoken");
    let raw = body
        .find("<Say>Voiceprint phrase not detected</Say>")
        .expect("raw result should be spoken");
    assert!(hint < raw);
    assert!(!body.contains("<Redirect"));
}

#[tokio::test]
async fn successful_authentication_reaches_the_menu() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/authentications/bywavurl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ResponseCode": "SUC",
            "Result": "Authentication successful"
        })))
        .mount(&app.biometric_server)
        .await;

    let body = app
        .post_webhook_text(
            "/process_authentication",
            &[("From", CALLER), ("RecordingUrl", "https://api.twilio.com/r")],
        )
        .await;
    assert!(body.contains(r#"<Redirect method="POST">/options</Redirect>"#));

    let body = app.post_webhook_text("/options", &[("From", CALLER)]).await;
    assert!(body.contains(r#"<Gather action="/subOptions""#));

    let body = app
        .post_webhook_text("/subOptions", &[("From", CALLER), ("Digits", "1")])
        .await;
    assert!(body.contains("<Play>"));
    assert!(!body.contains("<Redirect"));
}

#[tokio::test]
async fn biometric_outage_is_spoken_as_a_retry() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/authentications/bywavurl"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.biometric_server)
        .await;

    let body = app
        .post_webhook_text(
            "/process_authentication",
            &[("From", CALLER), ("RecordingUrl", "https://api.twilio.com/r")],
        )
        .await;
    assert!(body.contains("OOPS!"));
    assert!(body.contains(r#"<Redirect method="POST">/authenticate</Redirect>"#));
}

#[tokio::test]
async fn malformed_webhook_still_returns_twiml() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/process_enrollment?enrollCount=1", &app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"From": "+15551230000"}"#)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("Failed to read body.");
    assert!(body.contains("Sorry, something went wrong"));
    assert!(body.contains(r#"<Redirect method="POST">/enroll?enrollCount=1</Redirect>"#));

    let body = app.post_webhook_text("/incoming_call", &[("Digits", "1")]).await;
    assert!(body.contains(r#"<Redirect method="POST">/incoming_call</Redirect>"#));
}
