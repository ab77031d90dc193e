//! CLI for verdant — your grow room, one glance.

mod commands;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "verdant")]
#[command(about = "verdant — grow-room dashboard in your terminal")]
#[command(version = verdant_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: rolling charts, instant readouts, cultivation advice
    Watch {
        /// Sensor endpoint URL (e.g. http://192.168.4.1/sensor).
        /// Setting one switches to live mode.
        #[arg(long)]
        endpoint: Option<String>,

        /// Force mock data even when an endpoint is set
        #[arg(long)]
        mock: bool,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "5000")]
        interval_ms: u64,

        /// Chart width: points of history kept per metric
        #[arg(long, default_value_t = verdant_core::DEFAULT_SERIES_CAPACITY)]
        capacity: usize,

        /// Custom advice rule table (JSON array of rules; see `verdant rules --json`)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Fetch one reading, print it with its advice, and exit
    Sample {
        /// Sensor endpoint URL. Setting one switches to live mode.
        #[arg(long)]
        endpoint: Option<String>,

        /// Force mock data even when an endpoint is set
        #[arg(long)]
        mock: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,

        /// Custom advice rule table
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Print the active advice rule table
    Rules {
        /// Custom advice rule table to print instead of the stock one
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Emit the table as JSON (a valid `--rules` file)
        #[arg(long)]
        json: bool,
    },

    /// Run the synthetic sensor endpoint
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, default_value = "8642")]
        port: u16,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Watch {
            endpoint,
            mock,
            interval_ms,
            capacity,
            rules,
        } => commands::watch::run(endpoint, mock, interval_ms, capacity, rules.as_deref()),
        Commands::Sample {
            endpoint,
            mock,
            json,
            rules,
        } => commands::sample::run(endpoint, mock, json, rules.as_deref()),
        Commands::Rules { rules, json } => commands::rules::run(rules.as_deref(), json),
        Commands::Serve { host, port } => commands::serve::run(&host, port),
    }
}
