use anyhow::Context;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use parsedcmd::config::ShellConfig;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod args;
mod demo;
use args::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = init_config(&cli);
    let mut shell = demo::build(config, io::stdout()).context("invalid command declarations")?;

    if cli.commands.is_empty() {
        shell.cmdloop(io::stdin().lock())?;
        return Ok(());
    }

    let mut failed = 0;
    for line in &cli.commands {
        let outcome = shell.onecmd(line)?;
        if !outcome.is_success() {
            failed += 1;
        }
        if outcome.is_stop() {
            break;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} commands failed", failed, cli.commands.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn config_dir(cli: &Cli) -> Option<PathBuf> {
    cli.config_dir.clone().or_else(|| {
        ProjectDirs::from("com", "parsedcmd", "parsedcmd")
            .map(|dirs| dirs.config_dir().to_path_buf())
    })
}

fn init_config(cli: &Cli) -> ShellConfig {
    let mut config = match config_dir(cli) {
        Some(dir) => ShellConfig::load(&dir).unwrap_or_else(|e| {
            warn!(error = %e, dir = %dir.display(), "ignoring unreadable config");
            ShellConfig::default()
        }),
        None => ShellConfig::default(),
    };

    if let Some(marker) = &cli.marker {
        config.option_marker = marker.clone();
    }
    if cli.no_usage {
        config.show_usage = false;
    }
    // No prompt or banner when driven by a pipe or a script.
    if !console::user_attended() {
        config.prompt = String::new();
        config.intro = None;
    } else if config.intro.is_none() {
        config.intro = Some(format!(
            "{} Type {} for a list of commands.",
            "parsedcmd demo shell.".bold(),
            "help".cyan()
        ));
    }
    config
}
