// ABOUTME: Integration tests for notification sinks.
// ABOUTME: Checks Slack webhook payload shapes against a mock server and fan-out order.

mod support;

use serde_json::json;
use shipctl::notify::{Notifier, Notifiers, NotifyKind, SlackNotifier};
use support::RecordingNotifier;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn slack(server: &MockServer) -> SlackNotifier {
    SlackNotifier::new(format!("{}/hook", server.uri()), "prod", "api").unwrap()
}

#[tokio::test]
async fn plain_message_posts_prefixed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "username": "deploy-bot",
            "text": "cluster: prod, serviceName: api\nservice updating",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    slack(&server).await.log("service updating").await;
}

#[tokio::test]
async fn success_posts_good_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "username": "deploy-bot",
            "attachments": [{
                "color": "good",
                "text": "cluster: prod, serviceName: api\nservice updated successfully",
            }],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    slack(&server)
        .await
        .notify(NotifyKind::Success, "service updated successfully")
        .await;
}

#[tokio::test]
async fn failure_posts_danger_attachment_without_trailing_newline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "username": "deploy-bot",
            "attachments": [{
                "color": "danger",
                "text": "cluster: prod, serviceName: api\nfailed to deploy. cluster: prod, serviceName: api",
            }],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    slack(&server)
        .await
        .notify(
            NotifyKind::Failure,
            "failed to deploy. cluster: prod, serviceName: api\n",
        )
        .await;
}

#[tokio::test]
async fn webhook_errors_do_not_propagate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    // Completes without panicking; the failure is only logged.
    slack(&server).await.log("service updating").await;
}

#[tokio::test]
async fn fan_out_reaches_every_sink() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let notifiers = Notifiers::new()
        .with(RecordingNotifier::new())
        .with(slack(&server).await);
    assert_eq!(notifiers.len(), 2);

    notifiers.log("service updating").await;
    notifiers
        .notify(NotifyKind::Success, "service updated successfully")
        .await;
}

#[tokio::test]
async fn empty_fan_out_is_a_no_op() {
    let notifiers = Notifiers::new();
    assert!(notifiers.is_empty());
    notifiers.log("nobody listens").await;
}
