use azure_provision::args::Cli;
use azure_provision::azure::AzCli;
use azure_provision::logging;
use azure_provision::output::{print_summary, RunReport};
use clap::Parser;
use colored::Colorize;
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "ERROR".on_red());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_config)?;
    dotenv::dotenv().ok();
    //
    log::info!("#Start main() {}", cli.command.name());

    let config = cli.resolve_config()?;
    let plane = AzCli::new(config.az_binary.as_str(), cli.dry_run);
    let dry_run = plane.is_dry_run();
    let started_at = chrono::Utc::now();

    let resources = azure_provision::run(&cli.command, &config, &plane).await?;
    print_summary(&resources, dry_run);

    if let Some(path) = &cli.report {
        let report = RunReport::new(cli.command.name(), dry_run, started_at, resources);
        report.write(path)?;
    }

    log::info!("#End main()");
    Ok(())
}
