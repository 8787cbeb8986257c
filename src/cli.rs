// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{ArgGroup, Args, Parser, Subcommand};
use shipctl::config::Flags;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "shipctl")]
#[command(about = "Rolling deploys, rollbacks, and one-off tasks for ECS services")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every subcommand; each falls back to shipctl.yml.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// ECS cluster name
    #[arg(long)]
    pub cluster: Option<String>,

    /// History backend: ssm or file
    #[arg(long)]
    pub backend: Option<String>,

    /// Slack incoming webhook URL for notifications
    #[arg(long, alias = "slack-notify", value_name = "URL")]
    pub slack_webhook_url: Option<String>,
}

impl CommonArgs {
    pub fn flags(&self) -> Flags {
        Flags {
            cluster: self.cluster.clone(),
            backend: self.backend.clone(),
            slack_webhook_url: self.slack_webhook_url.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Promote images, register a new task definition, and roll the service
    Deploy(DeployArgs),

    /// Roll the service back to the previous revision in its history
    Rollback(RollbackArgs),

    /// Run a command once as a standalone task and wait for it
    Oneshot(OneshotArgs),

    /// Show recorded deployment history
    History(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ECS service name
    #[arg(long)]
    pub service_name: String,

    /// Task definition revision to ship (default: the service's current one)
    #[arg(long, default_value_t = 0)]
    pub revision: i64,

    /// Source tag for one repository's image; repeatable
    #[arg(long = "image", value_name = "REPOSITORY:TAG")]
    pub images: Vec<String>,

    /// Give up waiting for the rollout after this long (e.g. 15m)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct RollbackArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ECS service name
    #[arg(long)]
    pub service_name: String,

    /// Give up waiting for the rollout after this long (e.g. 15m)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("task_source")
        .required(true)
        .args(["taskdef_name", "service_name"]),
))]
pub struct OneshotArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Task definition family, family:revision, or ARN
    #[arg(long)]
    pub taskdef_name: Option<String>,

    /// Run the task definition this service currently uses
    #[arg(long)]
    pub service_name: Option<String>,

    /// Task definition revision to run
    #[arg(long, default_value_t = 0)]
    pub revision: i64,

    /// Command to run in the first container
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ECS service name; lists every recorded service when omitted
    #[arg(long)]
    pub service_name: Option<String>,
}
