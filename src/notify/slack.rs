// ABOUTME: Slack incoming-webhook notification sink.
// ABOUTME: Plain messages post as text, leveled ones as a good/danger attachment.

use super::{Notifier, NotifyKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const USERNAME: &str = "deploy-bot";

/// Posts notifications to a Slack incoming webhook.
///
/// Every message is prefixed with the cluster and service it concerns.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    http: Client,
    webhook_url: String,
    context: String,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    color: &'static str,
    text: String,
}

impl SlackNotifier {
    /// Create a notifier for one cluster/service pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        webhook_url: impl Into<String>,
        cluster: &str,
        service: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            webhook_url: webhook_url.into(),
            context: format!("cluster: {}, serviceName: {}", cluster, service),
        })
    }

    fn text(&self, message: &str) -> String {
        format!("{}\n{}", self.context, message.trim_end())
    }

    async fn post(&self, payload: &Payload<'_>) {
        let result = self
            .http
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        if let Err(e) = result {
            tracing::warn!("Slack notification failed: {}", e);
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, kind: NotifyKind, message: &str) {
        let color = match kind {
            NotifyKind::Plain => {
                return self
                    .post(&Payload {
                        username: USERNAME,
                        text: Some(self.text(message)),
                        attachments: Vec::new(),
                    })
                    .await;
            }
            NotifyKind::Success => "good",
            NotifyKind::Failure => "danger",
        };
        self.post(&Payload {
            username: USERNAME,
            text: None,
            attachments: vec![Attachment {
                color,
                text: self.text(message),
            }],
        })
        .await;
    }
}
