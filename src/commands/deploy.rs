// ABOUTME: Deploy command implementation.
// ABOUTME: Builds the deploy request from flags and settings and runs the workflow.

use super::context::{Context, notify_failure, parse_service, with_timeout};
use crate::cli::DeployArgs;
use shipctl::deploy::{self, DeployError, DeployRequest, PromotionPlan, SourceTag};
use shipctl::error::Result;
use shipctl::history::HistoryKey;
use shipctl::orchestrator::{EcrRegistry, EcsOrchestrator};
use shipctl::output::Output;

pub async fn deploy(args: DeployArgs, output: Output) -> Result<()> {
    let service = parse_service(&args.service_name)?;
    let sources = args
        .images
        .iter()
        .map(|image| image.parse::<SourceTag>())
        .collect::<std::result::Result<Vec<_>, DeployError>>()?;

    let mut ctx = Context::load(&args.common.flags(), output).await?;
    let history = ctx.history()?;
    let notifier = ctx.notifiers(service.as_str());
    let orchestrator = EcsOrchestrator::new(&ctx.sdk);
    let registry = EcrRegistry::new(&ctx.sdk);

    let request = DeployRequest {
        revision: args.revision,
        promotion: PromotionPlan {
            mode: ctx.settings.promotion,
            sources,
        },
        poll_interval: ctx.settings.poll_interval,
        ..DeployRequest::new(HistoryKey::new(ctx.settings.cluster.clone(), service.clone()))
    };

    let result = with_timeout(
        args.timeout,
        deploy::deploy(&orchestrator, &registry, &history, &notifier, &request),
    )
    .await;
    let result = notify_failure(
        result,
        &notifier,
        "deploy",
        ctx.settings.cluster.as_str(),
        service.as_str(),
    )
    .await;

    ctx.flush_warnings();
    let outcome = result?;
    tracing::info!(
        revision = outcome.revision,
        tag = %outcome.tag,
        "deployed {}",
        outcome.task_definition
    );

    Ok(())
}
