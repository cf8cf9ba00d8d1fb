// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error mapping of the Telegram channel against a mocked Bot API.

use photel_config::model::TelegramConfig;
use photel_core::types::Artifact;
use photel_core::{DeliveryChannel, HealthStatus, PhotelError};
use photel_telegram::{TelegramChannel, TelegramSettings};
use serde_json::json;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:TEST-TOKEN";

fn channel_for(server: &MockServer) -> TelegramChannel {
    let config = TelegramConfig {
        api_url: Some(server.uri()),
    };
    TelegramChannel::new(&TelegramSettings::new(TOKEN, "@photel_test", &config)).unwrap()
}

fn api_error(code: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "ok": false,
        "error_code": code,
        "description": description,
    }))
}

#[tokio::test]
async fn unauthorized_token_fails_identify() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(api_error(401, "Unauthorized"))
        .mount(&server)
        .await;

    let channel = channel_for(&server);
    let err = channel.identify().await.unwrap_err();
    assert!(matches!(err, PhotelError::Protocol { .. }), "{err:?}");

    match channel.health_check().await {
        HealthStatus::Unhealthy(reason) => assert!(reason.contains("getMe")),
        HealthStatus::Healthy => panic!("expected unhealthy"),
    }
}

#[tokio::test]
async fn rejected_photo_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(api_error(400, "Bad Request: chat not found"))
        .mount(&server)
        .await;

    let channel = channel_for(&server);
    let artifact = Artifact {
        file_name: "shot.png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
        caption: Some("hello".into()),
    };
    let err = channel.deliver(&artifact).await.unwrap_err();
    assert!(matches!(err, PhotelError::Protocol { .. }), "{err:?}");
    assert!(err.to_string().contains("sendPhoto"));
    assert!(!server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn rejected_message_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(api_error(403, "Forbidden: bot is not a member of the channel chat"))
        .mount(&server)
        .await;

    let channel = channel_for(&server);
    let err = channel.send_text("hi").await.unwrap_err();
    assert!(matches!(err, PhotelError::Protocol { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_api_is_protocol_error() {
    let server = MockServer::start().await;
    let config = TelegramConfig {
        api_url: Some(server.uri()),
    };
    drop(server);

    let channel =
        TelegramChannel::new(&TelegramSettings::new(TOKEN, "-100123", &config)).unwrap();
    let err = channel.identify().await.unwrap_err();
    assert!(matches!(err, PhotelError::Protocol { .. }), "{err:?}");
}
