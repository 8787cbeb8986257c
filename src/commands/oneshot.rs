// ABOUTME: Oneshot command implementation.
// ABOUTME: Runs one task, relays SIGINT/SIGTERM as a stop request, returns its exit code.

use super::context::{Context, parse_service};
use crate::cli::OneshotArgs;
use shipctl::error::Result;
use shipctl::notify::Notifier;
use shipctl::oneshot::{self, TaskSource};
use shipctl::orchestrator::EcsOrchestrator;
use shipctl::output::Output;
use tokio::signal;

/// Run the task and return the exit code the process should end with.
pub async fn oneshot(args: OneshotArgs, output: Output) -> Result<i32> {
    let source = match (args.taskdef_name, args.service_name) {
        (Some(name), _) => TaskSource::TaskDefinition(name),
        (None, name) => TaskSource::Service(parse_service(name.as_deref().unwrap_or_default())?),
    };
    let subject = match &source {
        TaskSource::TaskDefinition(name) => name.clone(),
        TaskSource::Service(service) => service.to_string(),
    };

    let mut ctx = Context::load(&args.common.flags(), output).await?;
    let notifier = ctx.notifiers(&subject);
    let orchestrator = EcsOrchestrator::new(&ctx.sdk);
    let cluster = ctx.settings.cluster.clone();

    let definition =
        oneshot::resolve_task_definition(&orchestrator, &cluster, &source, args.revision).await?;
    let run = oneshot::launch(
        &orchestrator,
        &cluster,
        &definition,
        &args.command,
        &ctx.settings.started_by,
    )
    .await?;
    notifier.log("task started").await;

    // Signal handlers exist only while the task is being watched
    let result = oneshot::await_completion(
        &orchestrator,
        &run,
        shutdown_signal(),
        ctx.settings.poll_interval,
        &notifier,
        &mut ctx.diag,
    )
    .await;

    ctx.flush_warnings();
    let status = result?;
    if !status.stopped_reason.is_empty() {
        ctx.output
            .progress(&format!("stopped reason: {}", status.stopped_reason));
    }

    Ok(status.exit_code)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C");
        }
        () = terminate => {
            tracing::info!("received SIGTERM");
        }
    }
}
