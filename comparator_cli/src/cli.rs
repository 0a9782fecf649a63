//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "comparator", version, about = "Electrical comparator trainer CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/comparator.toml")]
    pub config: PathBuf,

    /// Optional workpiece profile CSV (strict header); replaces the WP 2
    /// response curve
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Emit JSON lines instead of pretty output
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive a measurement session from an event script
    Simulate {
        /// Event script, one command per line; stdin when omitted.
        /// Commands: left, right, up, down, drag-stage <mm>, drag-head <mm>,
        /// lock, unlock, select <std|wp2|wp3>, capture, clear, reset,
        /// next-step, prev-step, next-page, prev-page, page <n>
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
        /// Run the start-of-session tutorial notifications alongside
        #[arg(long, action = ArgAction::SetTrue)]
        tutorial: bool,
    },
    /// Exercise the engine against its stock scenarios and report pass/fail
    SelfCheck,
    /// Health check for operational monitoring (config load + validate)
    Health,
}
