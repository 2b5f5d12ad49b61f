//! UNF CLI - compute and verify Universal Numeric Fingerprints of JSON data.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unf_canonical::Digits;

mod commands;
mod input;
mod output;

use commands::{digest, fingerprint, normalize, verify};

#[derive(Parser)]
#[command(name = "unf")]
#[command(about = "Universal Numeric Fingerprint (UNF v6) CLI")]
struct Cli {
    /// Log normalization decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fingerprint of JSON input (objects are treated as tables)
    Fingerprint {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Significant digits kept for numbers
        #[arg(long, default_value_t = Digits::DEFAULT)]
        digits: Digits,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the bare base64 digest of JSON input
    Digest {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Significant digits kept for numbers
        #[arg(long, default_value_t = Digits::DEFAULT)]
        digits: Digits,
    },
    /// Show the normalized bytes that get hashed
    Normalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Significant digits kept for numbers
        #[arg(long, default_value_t = Digits::DEFAULT)]
        digits: Digits,
        /// Write the bytes unescaped
        #[arg(long)]
        raw: bool,
    },
    /// Check JSON input against a fingerprint
    Verify {
        /// Expected fingerprint, e.g. UNF:6:Do5dfAoOOFt4FSj0JcByEw==
        fingerprint: String,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("UNF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Fingerprint {
            input,
            digits,
            json,
        } => fingerprint::run(input, digits, json),
        Commands::Digest { input, digits } => digest::run(input, digits),
        Commands::Normalize { input, digits, raw } => normalize::run(input, digits, raw),
        Commands::Verify {
            fingerprint,
            input,
            json,
        } => verify::run(fingerprint, input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
