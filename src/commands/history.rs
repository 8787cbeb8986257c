// ABOUTME: History command implementation.
// ABOUTME: Prints one service's deployment records or every recorded service.

use super::context::{Context, parse_service};
use crate::cli::HistoryArgs;
use shipctl::error::Result;
use shipctl::history::HistoryKey;
use shipctl::output::{Output, OutputMode};

pub async fn history(args: HistoryArgs, output: Output) -> Result<()> {
    let service = args
        .service_name
        .as_deref()
        .map(parse_service)
        .transpose()?;

    let ctx = Context::load(&args.common.flags(), output).await?;
    let store = ctx.history()?;
    let json = ctx.output.mode() == OutputMode::Json;

    let Some(service) = service else {
        let keys = store.list_keys().await?;
        if json {
            let names: Vec<String> = keys.iter().map(ToString::to_string).collect();
            println!("{}", serde_json::to_string(&names).unwrap_or_default());
        } else if keys.is_empty() {
            ctx.output.progress("no deployment history recorded");
        } else {
            for key in &keys {
                println!("{}", key);
            }
        }
        return Ok(());
    };

    let key = HistoryKey::new(ctx.settings.cluster.clone(), service);
    let records = store.pull(&key).await?;

    if json {
        println!("{}", serde_json::to_string(&records).unwrap_or_default());
        return Ok(());
    }

    if records.is_empty() {
        ctx.output
            .progress(&format!("no deployment history for {}", key));
        return Ok(());
    }

    println!("{:<10} {:<10} CAUSE", "REVISION", "STATUS");
    // Newest first
    for record in records.iter().rev() {
        println!(
            "{:<10} {:<10} {}",
            record.revision,
            record.status.to_string(),
            record.cause
        );
    }

    Ok(())
}
