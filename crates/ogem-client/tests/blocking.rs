#![cfg(feature = "blocking")]

use ogem_client::blocking::Client;
use ogem_client::{ChatCompletionRequest, ClientConfig, ErrorKind, Message, OgemError};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server driven from a runtime the blocking client never enters
fn start(mocks: Vec<Mock>) -> (Runtime, MockServer) {
    let runtime = Runtime::new().unwrap();

    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        for mock in mocks {
            mock.mount(&server).await;
        }
        server
    });

    (runtime, server)
}

fn client(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(&server.uri(), "sk-test").unwrap()).unwrap()
}

fn chat_request() -> ChatCompletionRequest {
    ChatCompletionRequest::new("gpt-4o", vec![Message::system("Be brief."), Message::user("Hello")])
}

#[test]
fn completion() {
    let (_runtime, server) = start(vec![
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c1",
                "object": "chat.completion",
                "created": 1,
                "model": "gpt-4o",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}]
            }))),
    ]);

    let completion = client(&server).chat().completions().create(&chat_request()).unwrap();
    assert_eq!(completion.content().as_deref(), Some("Hi"));
}

#[test]
fn stream_stops_at_done() {
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"a\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"b\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    let (_runtime, server) = start(vec![
        Mock::given(method("POST"))
            .and(header("accept", "text/event-stream"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")),
    ]);

    let chunks: Vec<_> = client(&server)
        .chat()
        .completions()
        .create_stream(&chat_request())
        .unwrap()
        .map(Result::unwrap)
        .collect();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].content(), Some("b"));
}

#[test]
fn errors_are_classified() {
    let (_runtime, server) = start(vec![
        Mock::given(any()).respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": {"message": "n must be positive", "field_errors": {"n": "min 1"}}})),
        ),
    ]);

    let err = client(&server).models().list().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, OgemError::Validation { ref field_errors, .. } if field_errors["n"] == "min 1"));
}

#[test]
fn tenant_fallback_and_validation() {
    let (_runtime, server) = start(vec![
        Mock::given(method("POST"))
            .and(path("/cache/clear/tenant/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Tenant cache cleared successfully",
                "tenant_id": "acme"
            })))
            .expect(1),
    ]);

    let mut client = client(&server);

    let err = client.clear_tenant_cache(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    client.set_tenant_id("acme");
    let cleared = client.clear_tenant_cache(None).unwrap();
    assert_eq!(cleared.tenant_id.as_deref(), Some("acme"));
}

#[test]
fn metrics_text_returns_raw_body() {
    let (_runtime, server) = start(vec![
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("ogem_up 1\n", "text/plain")),
    ]);

    assert_eq!(client(&server).monitoring().metrics_text().unwrap(), "ogem_up 1\n");
}
