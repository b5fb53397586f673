use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .get(&format!("{}/util/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    // Assert
    assert!(response.status().is_success());
    assert_eq!(Some(14), response.content_length());
}

#[tokio::test]
async fn openapi_document_lists_webhooks() {
    let app = spawn_app().await;

    let body: serde_json::Value = app
        .api_client
        .get(&format!("{}/api-docs/openapi.json", &app.address))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("OpenAPI document should be JSON");
    assert!(body["paths"]["/process_enrollment"]["post"].is_object());
    assert!(body["paths"]["/subOptions"]["post"].is_object());
}
