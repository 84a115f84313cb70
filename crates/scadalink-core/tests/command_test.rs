#![allow(clippy::unwrap_used)]
// CommandDispatcher tests against a wiremock WebAccess node.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scadalink_core::{
    CommandDispatcher, ConnectionRecord, CoreError, Credentials, GroupState, SharedConfig,
    SwitchState, TrainerKitState, TransportConfig, WaterPumpState,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn dispatcher<S: GroupState>(host: &str) -> CommandDispatcher {
    let config: Arc<SharedConfig> =
        SharedConfig::shared(ConnectionRecord::new(host, Credentials::default()));
    CommandDispatcher::new(S::default_profile(), config, &TransportConfig::default()).unwrap()
}

fn accepted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "Result": { "Ret": 0 } }))
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_disallowed_tag_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(accepted())
        .expect(0)
        .mount(&server)
        .await;

    let pump = dispatcher::<WaterPumpState>(&server.uri());
    let err = pump.turn_on("Status1_1").await.unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }), "got: {err:?}");
    assert!(err.to_string().contains("Status1_1"));
}

#[tokio::test]
async fn test_empty_tag_is_rejected() {
    let kit = dispatcher::<TrainerKitState>("192.0.2.1");
    let err = kit.turn_on("").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_dot_segment_tag_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(accepted())
        .expect(0)
        .mount(&server)
        .await;

    let kit = dispatcher::<TrainerKitState>(&server.uri());
    for tag in [".", ".."] {
        let err = kit.turn_on(tag).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }), "got: {err:?}");
    }
}

#[tokio::test]
async fn test_missing_host_is_configuration_error() {
    let kit = dispatcher::<TrainerKitState>("");
    let err = kit.send_command("greenLamp", SwitchState::On).await.unwrap_err();

    match err {
        CoreError::ConfigurationMissing { group } => assert_eq!(group, "trainer-kit"),
        other => panic!("expected ConfigurationMissing, got: {other:?}"),
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_trainer_kit_accepts_any_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/WaWebService/Json/SetTagValue/TrainerKit/greenLamp/1"))
        .and(header("authorization", "Basic YWRtaW46"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    dispatcher::<TrainerKitState>(&server.uri())
        .send_command("greenLamp", SwitchState::On)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reserved_characters_stay_in_the_tag_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/WaWebService/Json/SetTagValue/TrainerKit/..%2FGetTagValue%2Fexpress%3Fx=1/1"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    dispatcher::<TrainerKitState>(&server.uri())
        .turn_on("../GetTagValue/express?x=1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pump_turn_off_uses_project_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/WaWebService/Json/SetTagValue/WaterPump/Pump2_1/0"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    dispatcher::<WaterPumpState>(&server.uri())
        .turn_off("Pump2_1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_credentials_follow_the_config_provider() {
    let server = MockServer::start().await;
    // base64("operator:pw")
    Mock::given(method("GET"))
        .and(header("authorization", "Basic b3BlcmF0b3I6cHc="))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let config = SharedConfig::shared(ConnectionRecord::new(server.uri(), Credentials::default()));
    let kit = CommandDispatcher::new(
        TrainerKitState::default_profile(),
        config.clone(),
        &TransportConfig::default(),
    )
    .unwrap();
    config.set_credentials(Credentials {
        username: "operator".into(),
        password: SecretString::from("pw".to_owned()),
    });

    kit.turn_on("Fan").await.unwrap();
}

#[tokio::test]
async fn test_failure_is_reported_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("tag locked"))
        .expect(1)
        .mount(&server)
        .await;

    let err = dispatcher::<WaterPumpState>(&server.uri())
        .turn_on("Pump1_1")
        .await
        .unwrap_err();

    match err {
        CoreError::Protocol { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "tag locked");
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_spawned_command_completes_in_background() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/WaWebService/Json/SetTagValue/TrainerKit/Fan/1"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let handle = dispatcher::<TrainerKitState>(&server.uri()).spawn_command("Fan", SwitchState::On);

    handle.await.unwrap().unwrap();
}
