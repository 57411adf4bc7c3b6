//! CLI command definitions for the `bundler` binary.

pub mod bundle;
pub mod cart_transform;
pub mod wizard;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Build product bundles and run the bundle cart transform.
#[derive(Parser)]
#[command(name = "bundler", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Signed verbosity: negative when `--quiet`.
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(i8::MAX as u8) as i8
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a bundle with the interactive wizard.
    #[command(alias = "new")]
    Create {
        /// Resume a saved wizard session.
        #[arg(long)]
        resume: bool,

        /// Admin API access token (defaults to BUNDLER_ADMIN_TOKEN).
        #[arg(long)]
        token: Option<String>,
    },

    /// List saved wizard sessions.
    Drafts,

    /// List bundles created through the wizard.
    #[command(alias = "ls")]
    List {
        /// Maximum number of bundles to show.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show a bundle and its components.
    Show {
        /// Bundle id (UUID).
        id: String,
    },

    /// Run the cart transform: cart JSON in, operations JSON out.
    #[command(name = "cart-transform")]
    CartTransform {
        /// Read input from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
