//! The HTTP-backed responder wired through the router.

use crate::helpers::Harness;
use serde_json::json;
use std::sync::Arc;
use voxshell::config::CompletionConfig;
use voxshell::external::{ChatCompletionResponder, ResponderFlavor};
use voxshell::{Directive, Role, RouteOutcome};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn responder(server: &MockServer, flavor: ResponderFlavor) -> ChatCompletionResponder {
    let config = CompletionConfig {
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_owned(),
        ..CompletionConfig::default()
    };
    ChatCompletionResponder::new(
        &config,
        "key".to_owned(),
        &voxshell::config::IdentityConfig::default(),
        flavor,
    )
}

#[tokio::test]
async fn answer_includes_recorded_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "hi there"},
                {"role": "user", "content": "Hi there."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello!\n\nHow can I help?"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new();
    let mut handlers = h.handlers();
    handlers.chat = Arc::new(responder(&server, ResponderFlavor::Chat));
    let router = h.router_with(handlers);

    h.conversation.record(Role::User, "hi there").unwrap();
    let outcome = router
        .route(&[Directive::from("general hi there")])
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RouteOutcome::Answered {
            answer: "Hello!\nHow can I help?".to_owned()
        }
    );
}

#[tokio::test]
async fn endpoint_failure_becomes_error_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let h = Harness::new();
    let mut handlers = h.handlers();
    handlers.search = Arc::new(responder(&server, ResponderFlavor::Realtime));
    let router = h.router_with(handlers);

    let outcome = router
        .route(&[Directive::from("realtime bitcoin price")])
        .await
        .unwrap();

    let RouteOutcome::Answered { answer } = outcome else {
        panic!("expected an answer");
    };
    assert!(answer.starts_with("[Error from realtime search: "));
    let log = h.conversation.log().load();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].content, answer);
    assert_eq!(h.spoken(), vec![answer]);
}
