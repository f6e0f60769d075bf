use std::time::Duration;

use image2text_core::{
    GenerationResult, ModelName, Msg, OperationKind, OperationRequest, RetryPolicy,
    TransportFailure, UploadCandidate, WorkflowState, WorkflowType,
};
use image2text_engine::{
    CredentialsMode, RawResponse, ReqwestTransport, RetryingTransport, Transport,
    TransportSettings, WorkflowController,
};
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> TransportSettings {
    TransportSettings {
        base_url: format!("{}/api", server.uri()),
        ..TransportSettings::default()
    }
}

fn photo() -> UploadCandidate {
    UploadCandidate::new("cat.png", "image/png", b"fake png bytes".to_vec())
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn process_image_sends_multipart_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-image"))
        .and(body_string_contains("name=\"workflow_type\""))
        .and(body_string_contains("sarcastic"))
        .and(body_string_contains("name=\"model\""))
        .and(body_string_contains("coze"))
        .and(body_string_contains("filename=\"cat.png\""))
        .and(body_string_contains("image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"postcard_image":"u"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let request = OperationRequest::ImageGenerate {
        file: photo(),
        workflow_type: WorkflowType::Sarcastic,
        model: ModelName::new("coze"),
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(
        response,
        RawResponse::new(200, br#"{"postcard_image":"u"}"#.to_vec())
    );
}

#[tokio::test]
async fn resize_sends_dimensions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/resize-image"))
        .and(body_string_contains("name=\"width\""))
        .and(body_string_contains("640"))
        .and(body_string_contains("name=\"height\""))
        .and(body_string_contains("480"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"width":640}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let request = OperationRequest::ImageResize {
        file: photo(),
        width: 640,
        height: 480,
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn poetry_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .and(body_json(serde_json::json!({"text": "spring wind", "model": "deepseek"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"comment":"c"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let request = OperationRequest::PoetryGenerate {
        text: "spring wind".to_string(),
        model: ModelName::default(),
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(response.body, br#"{"comment":"c"}"#.to_vec());
}

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"detail":"down"}"#))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let request = OperationRequest::PoetryGenerate {
        text: "x".to_string(),
        model: ModelName::default(),
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let request = OperationRequest::PoetryGenerate {
        text: "x".to_string(),
        model: ModelName::default(),
    };

    let err = transport
        .send(&request, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportFailure::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/resize-image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789abcdef"))
        .mount(&server)
        .await;

    let settings = TransportSettings {
        max_response_bytes: 10,
        ..settings_for(&server)
    };
    let transport = ReqwestTransport::new(settings).unwrap();
    let request = OperationRequest::ImageResize {
        file: photo(),
        width: 1,
        height: 1,
    };

    let err = transport.send(&request, TIMEOUT).await.unwrap_err();
    assert_eq!(err.kind, TransportFailure::BodyTooLarge);
}

#[tokio::test]
async fn credentials_are_omitted_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"svg":"<svg/>"}"#))
        .mount(&server)
        .await;

    let settings = TransportSettings {
        auth_token: Some("secret".to_string()),
        ..settings_for(&server)
    };
    let transport = ReqwestTransport::new(settings).unwrap();
    let request = OperationRequest::PoetryGenerate {
        text: "x".to_string(),
        model: ModelName::default(),
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn included_credentials_carry_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"svg":"<svg/>"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let settings = TransportSettings {
        credentials: CredentialsMode::Include,
        auth_token: Some("secret".to_string()),
        ..settings_for(&server)
    };
    let transport = ReqwestTransport::new(settings).unwrap();
    let request = OperationRequest::PoetryGenerate {
        text: "x".to_string(),
        model: ModelName::default(),
    };

    let response = transport.send(&request, TIMEOUT).await.expect("send ok");
    assert_eq!(response.status, 200);
}

#[test]
fn endpoints_join_onto_base_with_or_without_trailing_slash() {
    for base in ["https://svc.example/api", "https://svc.example/api/"] {
        let transport = ReqwestTransport::new(TransportSettings {
            base_url: base.to_string(),
            ..TransportSettings::default()
        })
        .unwrap();
        let url = transport
            .endpoint(OperationKind::ImageResize {
                width: 1,
                height: 1,
            })
            .unwrap();
        assert_eq!(url.as_str(), "https://svc.example/api/resize-image");
    }
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestTransport::new(TransportSettings {
        base_url: "not a url".to_string(),
        ..TransportSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, TransportFailure::InvalidRequest);
}

#[tokio::test]
async fn controller_recovers_from_a_server_error_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/process-poetry"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"comment":"gentle","svg":"<svg/>"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(settings_for(&server)).unwrap();
    let policy = RetryPolicy {
        backoff_step: Duration::from_millis(5),
        ..RetryPolicy::default()
    };
    let controller = WorkflowController::new(RetryingTransport::new(transport), policy);

    controller
        .dispatch(Msg::TextChanged("spring wind".to_string()))
        .await;
    let state = controller
        .dispatch(Msg::SubmitClicked {
            kind: OperationKind::PoetryGenerate,
            model: ModelName::default(),
        })
        .await;

    assert_eq!(
        state,
        WorkflowState::Succeeded(GenerationResult::Poetry {
            comment: Some("gentle".to_string()),
            svg: Some("<svg/>".to_string()),
        })
    );
}
