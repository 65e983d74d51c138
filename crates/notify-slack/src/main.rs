use std::path::Path;

use clap::Parser;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

use notify_slack::cli::Cli;
use notify_slack::config::{Config, Environment, RunContext};
use notify_slack::orchestrator::run;
use notify_slack::output::{append_github_output, output_line, persist_timestamp};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // stdout carries either the output line or the error, nothing else
    if let Err(err) = notify(&cli) {
        println!("{err}");
        std::process::exit(1);
    }
}

fn notify(cli: &Cli) -> anyhow::Result<()> {
    let env = Environment::from_process();
    let context = RunContext::from_env(&env)?;
    let config = Config::resolve(&env, &cli.fields)?;

    let rt = Builder::new_current_thread().enable_all().build()?;
    let ts = rt.block_on(run(&config, &context, &config.client))?;

    // The message is already out at this point; a failed write still fails the step.
    if let Some(path) = &config.timestamp_file {
        persist_timestamp(path, &ts)?;
    }
    if let Some(path) = env.get("GITHUB_OUTPUT") {
        append_github_output(Path::new(path), &ts)?;
    }

    println!("{}", output_line(&ts));
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
