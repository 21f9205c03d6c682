// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Two subcommands:
// - check: analyze one URL and print the report
// - serve: run the HTTP API
//
// Flags override the matching AD_READINESS_* environment variables.
// =============================================================================

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ad-readiness",
    version,
    about = "Checks whether a website meets the technical requirements of ad networks",
    long_about = "ad-readiness fetches a page, runs a fixed list of weighted checks \
                  (HTTPS, privacy policy, content volume, robots.txt, ads.txt, ...) \
                  and turns the results into a 0-100 readiness score. \
                  Use it from the terminal or run it as an HTTP service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a single website
    ///
    /// Example: ad-readiness check example.com
    Check {
        /// Website URL; https:// is assumed when no scheme is given
        url: String,

        /// Output the full report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Fail when a page is still redirecting after the redirect limit
        #[arg(long)]
        strict_redirects: bool,
    },

    /// Run the HTTP API (POST /api/analyze, GET /health)
    ///
    /// Example: ad-readiness serve --port 8080
    Serve {
        /// Address to bind (default: AD_READINESS_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: AD_READINESS_PORT or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}
