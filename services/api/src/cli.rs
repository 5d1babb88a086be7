use crate::console::{
    run_actions, run_list, run_mapping, run_update, ActionsArgs, ListArgs, MappingArgs, UpdateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staffing_pipeline::config::AppConfig;
use staffing_pipeline::error::AppError;
use staffing_pipeline::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Staffing Pipeline",
    about = "Serve the reference marketplace backend or inspect application statuses from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the reference backend HTTP service (default command)
    Serve(ServeArgs),
    /// Show the active/inactive status mapping served by the backend
    Mapping(MappingArgs),
    /// List the status transitions a role may take from a status
    Actions(ActionsArgs),
    /// Work with applications on the backend
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// List applications filtered by category, statuses, and search term
    List(ListArgs),
    /// Move an application to a new status
    Update(UpdateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with an empty store instead of the sample applications
    #[arg(long)]
    pub(crate) empty: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    execute(Cli::parse()).await
}

/// Every command logs through the same subscriber, installed before dispatch.
async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, config).await,
        Command::Mapping(args) => run_mapping(args, &config.backend).await,
        Command::Actions(args) => run_actions(args),
        Command::Applications {
            command: ApplicationsCommand::List(args),
        } => run_list(args, &config.backend).await,
        Command::Applications {
            command: ApplicationsCommand::Update(args),
        } => run_update(args, &config.backend).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_commands_install_the_subscriber() {
        let cli = Cli::try_parse_from([
            "staffing-pipeline-api",
            "actions",
            "--status",
            "offer_created",
            "--role",
            "vendor",
        ])
        .expect("arguments parse");

        execute(cli).await.expect("actions command runs");

        assert!(tracing::dispatcher::has_been_set());
    }
}
