// ABOUTME: Shared setup for commands: settings, region, AWS clients, notifiers.
// ABOUTME: Everything that can fail locally fails before the first API call.

use shipctl::config::{Config, Flags, Settings, resolve_region};
use shipctl::diagnostics::{Diagnostics, Warning};
use shipctl::error::{Error, Result};
use shipctl::history::{Backend, FileParameterStore, HistoryStore, ParameterStore, SsmParameterStore};
use shipctl::notify::{ConsoleNotifier, Notifier, NotifyKind, Notifiers, SlackNotifier};
use shipctl::orchestrator::{RemoteError, load_sdk_config};
use shipctl::output::Output;
use shipctl::types::ServiceName;
use std::env;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Resolved settings plus the AWS configuration every client shares.
pub struct Context {
    pub settings: Settings,
    pub sdk: aws_config::SdkConfig,
    pub output: Output,
    pub diag: Diagnostics,
}

impl Context {
    pub async fn load(flags: &Flags, output: Output) -> Result<Self> {
        let cwd = env::current_dir()?;
        let settings = Config::discover(&cwd)?.settings(flags)?;
        let region = resolve_region()?;
        tracing::debug!(region, cluster = %settings.cluster, "loading AWS configuration");
        let sdk = load_sdk_config(&region).await;

        Ok(Self {
            settings,
            sdk,
            output,
            diag: Diagnostics::default(),
        })
    }

    /// History store on the configured backend.
    pub fn history(&self) -> Result<HistoryStore> {
        let backend: Arc<dyn ParameterStore> = match self.settings.backend {
            Backend::Ssm => Arc::new(SsmParameterStore::new(&self.sdk)),
            Backend::File => {
                let dir = env::current_dir()?.join(&self.settings.history.dir);
                Arc::new(FileParameterStore::new(dir))
            }
        };

        Ok(HistoryStore::new(backend)
            .with_prefix(self.settings.history.prefix.clone())
            .with_limit(self.settings.history.limit))
    }

    /// Console output plus Slack when a webhook is configured.
    pub fn notifiers(&mut self, subject: &str) -> Notifiers {
        let mut notifiers = Notifiers::new().with(ConsoleNotifier::new(self.output.clone()));

        if let Some(url) = self.settings.slack_webhook_url.as_deref() {
            match SlackNotifier::new(url, self.settings.cluster.as_str(), subject) {
                Ok(slack) => notifiers = notifiers.with(slack),
                Err(e) => self.diag.warn(Warning::SlackDisabled {
                    reason: e.to_string(),
                }),
            }
        }

        notifiers
    }

    /// Print every warning collected so far.
    pub fn flush_warnings(&self) {
        for warning in self.diag.warnings() {
            self.output.warning(&warning.to_string());
        }
    }
}

pub fn parse_service(name: &str) -> Result<ServiceName> {
    ServiceName::new(name).map_err(|source| Error::InvalidName {
        field: "--service-name",
        source,
    })
}

/// Report a failed workflow to every sink before the error propagates.
pub async fn notify_failure<T, E>(
    result: std::result::Result<T, E>,
    notifier: &Notifiers,
    verb: &str,
    cluster: &str,
    service: &str,
) -> std::result::Result<T, E> {
    if result.is_err() {
        notifier
            .notify(
                NotifyKind::Failure,
                &format!(
                    "failed to {}. cluster: {}, serviceName: {}",
                    verb, cluster, service
                ),
            )
            .await;
    }
    result
}

/// Run `fut`, failing with `RemoteError::Timeout` once `limit` passes.
pub async fn with_timeout<T, E, F>(limit: Option<Duration>, fut: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: From<RemoteError>,
{
    match limit {
        None => fut.await,
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout { elapsed: limit }.into()),
        },
    }
}
