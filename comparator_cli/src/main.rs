//! Terminal front end for the comparator trainer engine.

mod cli;
mod error_fmt;
mod sim;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use clap::Parser;
use eyre::WrapErr;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("warning: failed to install error hooks: {e}");
    }

    let cfg = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => fail(&e),
    };
    init_tracing(&args, &cfg.logging);
    if !args.config.exists() {
        tracing::warn!(path = %args.config.display(), "config file not found; stock defaults in effect");
    }

    let profile = match &args.profile {
        Some(path) => match comparator_config::load_profile_csv(path) {
            Ok(rows) => Some(rows),
            Err(e) => fail(&e),
        },
        None => None,
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            tracing::warn!(error = %e, "failed to install ctrl-c handler");
        }
    }

    let result = match args.cmd {
        Commands::Simulate { script, tutorial } => sim::run_simulate(
            &cfg,
            profile.as_deref(),
            script,
            tutorial,
            args.json,
            shutdown,
        ),
        Commands::SelfCheck => sim::run_self_check(args.json),
        Commands::Health => {
            // Config already loaded and validated above; say so and leave.
            if args.json {
                println!("{}", json!({ "health": "ok" }));
            } else {
                println!("health: ok");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        fail(&e);
    }
}

fn load_config(path: &Path) -> eyre::Result<comparator_config::Config> {
    let cfg = if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read config {}", path.display()))?;
        comparator_config::load_toml(&text)
            .map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?
    } else {
        comparator_config::Config::default()
    };
    cfg.validate()
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;
    Ok(cfg)
}

fn init_tracing(args: &Cli, logging: &comparator_config::Logging) {
    let level = logging
        .level
        .clone()
        .unwrap_or_else(|| args.log_level.clone());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Console layer goes to stderr so stdout stays clean for frames.
    let console: Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync> = if args.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let mut layers = vec![console];

    if let Some(file) = &logging.file {
        let path = Path::new(file);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("comparator.log"));
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();
}

fn fail(err: &eyre::Report) -> ! {
    if JSON_MODE.get().copied().unwrap_or(false) {
        println!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
    std::process::exit(error_fmt::exit_code_for_error(err));
}
