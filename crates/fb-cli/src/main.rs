use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fb_cli::commands::{Context, dashboard, goals, heatmap, hours, report, streak, util};
use fb_cli::{Cli, Commands, Config, input};

/// Load config, read the session export and resolve the reference date.
fn load_context(cli: &Cli) -> Result<(Context, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path = cli.input.as_deref().or(config.records_path.as_deref());
    let input = input::load(path).context("failed to load session records")?;

    let today = cli
        .today
        .as_deref()
        .map(|s| util::parse_date(s, Local::now().date_naive()))
        .transpose()?;

    let ctx = Context::new(input, &config, today);
    tracing::debug!(records = ctx.records.len(), today = %ctx.today, "loaded sessions");
    Ok((ctx, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries command output; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Dashboard { json }) => {
            let (ctx, _config) = load_context(&cli)?;
            dashboard::run(&ctx, *json)?;
        }
        Some(Commands::Report { period, last, json }) => {
            let (ctx, _config) = load_context(&cli)?;
            report::run(&ctx, (*period).into(), *last, *json)?;
        }
        Some(Commands::Streak { json }) => {
            let (ctx, _config) = load_context(&cli)?;
            streak::run(&ctx, *json)?;
        }
        Some(Commands::Goals { json }) => {
            let (ctx, _config) = load_context(&cli)?;
            goals::run(&ctx, *json)?;
        }
        Some(Commands::Heatmap { weeks, json }) => {
            let (ctx, config) = load_context(&cli)?;
            heatmap::run(&ctx, weeks.unwrap_or(config.heatmap_weeks), *json)?;
        }
        Some(Commands::Hours { json }) => {
            let (ctx, _config) = load_context(&cli)?;
            hours::run(&ctx, *json)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
