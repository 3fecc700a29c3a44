use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};
use contact_relay::routes::{CONTACT_BODY_LIMIT, TRY_AGAIN_LATER};
use crate::helpers::{spawn_app, spawn_app_with, valid_submission, RECIPIENT, RESEND_API_KEY};

#[tokio::test]
async fn test_contact_returns_200_for_valid_json() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Mensagem enviada com sucesso!");
}

#[tokio::test]
async fn test_contact_returns_200_for_valid_form_data() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let body = "nome=Ana%20Souza&gmail=ana%40gmail.com&numero=11987654321&descricao=Ol%C3%A1";
    let response = app.post_contact_form(body.into()).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn test_contact_sends_the_submission_to_the_recipient() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {}", RESEND_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_contact_json(&valid_submission()).await;

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();

    assert_eq!(body["from"], "Salita'a <onboarding@resend.dev>");
    assert_eq!(body["to"], serde_json::json!([RECIPIENT]));
    assert_eq!(body["reply_to"], "ana@example.com");
    assert_eq!(body["subject"], "Nova mensagem de contato - Ana Souza");
    let html = body["html"].as_str().unwrap();
    assert!(html.contains("11 98765-4321"));
    assert!(html.contains("Gostaria de um orçamento."));
}

#[tokio::test]
async fn test_contact_prefers_current_field_names_over_legacy_ones() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let submission = serde_json::json!({
        "nome": "Ana",
        "email": "current@example.com",
        "gmail": "legacy@gmail.com",
        "telefone": "111",
        "numero": "222",
        "mensagem": "current message",
        "descricao": "legacy message"
    });
    app.post_contact_json(&submission).await;

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    let html = body["html"].as_str().unwrap();

    assert_eq!(body["reply_to"], "current@example.com");
    assert!(html.contains("111"));
    assert!(!html.contains("222"));
    assert!(html.contains("current message"));
    assert!(!html.contains("legacy message"));
}

#[tokio::test]
async fn test_contact_returns_400_when_fields_are_missing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        // no email may be sent for an incomplete submission
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        (serde_json::json!({ "email": "a@b.com", "telefone": "1", "mensagem": "m" }), "missing name"),
        (serde_json::json!({ "nome": "Ana", "telefone": "1", "mensagem": "m" }), "missing email"),
        (serde_json::json!({ "nome": "Ana", "gmail": "a@b.com", "mensagem": "m" }), "missing phone"),
        (serde_json::json!({ "nome": "Ana", "gmail": "a@b.com", "numero": "1" }), "missing message"),
        (serde_json::json!({ "nome": "", "email": "a@b.com", "telefone": "1", "mensagem": "m" }), "empty name"),
        (serde_json::json!({}), "missing everything"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_contact_json(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "API did not fail with 400 error code: {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Todos os campos são obrigatórios");
    }
}

#[tokio::test]
async fn test_contact_returns_400_for_an_empty_form() {
    let app = spawn_app().await;

    let response = app.post_contact_form(String::new()).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn test_contact_returns_500_for_malformed_json() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .api_client
        .post(&format!("{}/contato", &app.address))
        .header("Content-Type", "application/json")
        .body("{\"nome\": \"Ana\",")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Erro interno do servidor. Tente novamente mais tarde.");
}

#[tokio::test]
async fn test_contact_returns_500_when_resend_fails_outside_demo_mode() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        // a single attempt, no retries
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
    let body = response.text().await.unwrap();
    // provider details stay server-side
    assert!(!body.contains("provider exploded"));
    assert!(body.contains("Erro interno do servidor"));
}

#[tokio::test]
async fn test_contact_returns_200_when_resend_fails_in_demo_mode() {
    let app = spawn_app_with(|c| c.application.demo_mode = true).await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_resend_is_used_even_when_smtp_credentials_are_configured() {
    let app = spawn_app_with(|c| {
        c.email_client.smtp.username = "owner@gmail.com".into();
        c.email_client.smtp.password = secrecy::Secret::new("app-password".into());
    })
    .await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    for _ in 0..2 {
        let response = app.post_contact_json(&valid_submission()).await;
        assert_eq!(200, response.status().as_u16());
    }
}

#[tokio::test]
async fn test_contact_returns_500_json_for_an_oversized_body() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let mut submission = valid_submission();
    submission["mensagem"] = serde_json::Value::String("a".repeat(CONTACT_BODY_LIMIT + 1024));

    let response = app.post_contact_json(&submission).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], TRY_AGAIN_LATER);
}
