// ABOUTME: Rollback command implementation.
// ABOUTME: Restores the previous revision recorded in deployment history.

use super::context::{Context, notify_failure, parse_service, with_timeout};
use crate::cli::RollbackArgs;
use shipctl::deploy;
use shipctl::error::Result;
use shipctl::history::HistoryKey;
use shipctl::orchestrator::EcsOrchestrator;
use shipctl::output::Output;

pub async fn rollback(args: RollbackArgs, output: Output) -> Result<()> {
    let service = parse_service(&args.service_name)?;

    let mut ctx = Context::load(&args.common.flags(), output).await?;
    let history = ctx.history()?;
    let notifier = ctx.notifiers(service.as_str());
    let orchestrator = EcsOrchestrator::new(&ctx.sdk);
    let key = HistoryKey::new(ctx.settings.cluster.clone(), service.clone());

    let result = with_timeout(
        args.timeout,
        deploy::rollback(
            &orchestrator,
            &history,
            &notifier,
            &key,
            ctx.settings.poll_interval,
        ),
    )
    .await;
    let result = notify_failure(
        result,
        &notifier,
        "rollback",
        ctx.settings.cluster.as_str(),
        service.as_str(),
    )
    .await;

    ctx.flush_warnings();
    result?;
    Ok(())
}
