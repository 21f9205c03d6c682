// src/main.rs
// =============================================================================
// Entry point of the ad-readiness CLI.
//
// What happens here:
// 1. Set up logging (tracing, written to stderr so --json output stays clean)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the subcommand handler
// 4. Exit with a proper code:
//      0 = score of 80 or more
//      1 = score below 80
//      2 = the analysis could not be completed
//
// Log verbosity follows RUST_LOG, e.g. RUST_LOG=ad_readiness=debug
// =============================================================================

mod analyze;  // src/analyze.rs - one analysis, end to end
mod checks;   // src/checks/ - check registry and rules
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - timeouts, redirects, server settings
mod document; // src/document.rs - parsed HTML wrapper
mod error;    // src/error.rs - terminal analysis errors
mod fetch;    // src/fetch/ - URL resolution and retrieval
mod score;    // src/score.rs - readiness score
mod server;   // src/server.rs - HTTP API

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use analyze::{AnalysisReport, Analyzer};
use checks::Status;
use cli::{Cli, Commands};
use config::{RedirectOverflow, RetrieverConfig, ServerConfig};

const READY_SCORE: u8 = 80;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("ad_readiness=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            url,
            json,
            strict_redirects,
        } => handle_check(&url, json, strict_redirects).await,
        Commands::Serve { host, port } => handle_serve(host, port).await,
    }
}

// Handles the 'check' subcommand
// Parameters:
//   url: website to analyze (scheme optional)
//   json: whether to output JSON format
//   strict_redirects: treat a redirect chain longer than the limit as an error
async fn handle_check(url: &str, json: bool, strict_redirects: bool) -> Result<i32> {
    let mut config = RetrieverConfig::from_env()?;
    if strict_redirects {
        config.redirect_overflow = RedirectOverflow::Fail;
    }

    let analyzer = Analyzer::new(config)?;

    if !json {
        println!("🔍 Analyzing: {}", url);
    }

    let report = match analyzer.analyze(url).await {
        Ok(report) => report,
        Err(e) => {
            if json {
                let body = serde_json::json!({
                    "error": e.label(),
                    "details": e.details(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("❌ {}", e.label());
                println!("   {}", e.details());
            }
            return Ok(2);
        }
    };

    print_report(&report, json)?;

    Ok(exit_code_for(report.score))
}

// Handles the 'serve' subcommand
// Command-line values win over the environment.
async fn handle_serve(host: Option<String>, port: Option<u16>) -> Result<i32> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    server::serve(config).await?;
    Ok(0)
}

fn exit_code_for(score: u8) -> i32 {
    if score >= READY_SCORE {
        0
    } else {
        1
    }
}

// Prints the report either as a table or JSON
fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &AnalysisReport) {
    println!("🌐 Resolved to: {}", report.final_resolved_url);
    if report.metadata.used_http_fallback {
        println!("⚠️  HTTPS failed, analyzed over plain HTTP");
    }
    println!();

    println!("{:<28} {:<12} {:<8} {}", "CHECK", "STATUS", "WEIGHT", "MESSAGE");
    println!("{}", "=".repeat(110));

    for check in &report.checks {
        let name = if check.critical {
            format!("{} *", check.name)
        } else {
            check.name.clone()
        };
        println!(
            "{:<28} {:<12} {:<8} {}",
            name,
            format_status(check.status),
            check.weight,
            check.message
        );
    }

    println!();
    println!("   * critical check");
    println!();

    let count = |status: Status| report.checks.iter().filter(|c| c.status == status).count();

    println!("📊 Summary:");
    println!("   ✅ Pass: {}", count(Status::Pass));
    println!("   ⚠️  Warn: {}", count(Status::Warn));
    println!("   ❌ Fail: {}", count(Status::Fail));
    println!("   👀 Manual: {}", count(Status::Manual));
    println!(
        "   📈 Raw score: {} / {}",
        report.metadata.raw_score, report.metadata.total_possible_weight
    );
    println!();

    for penalty in &report.penalties {
        println!("   ➖ {}", penalty);
    }
    println!("🏁 Score: {}/100", report.score);
    println!("   {}", report.score_interpretation);
    println!();

    println!("💡 Recommendations:");
    for recommendation in &report.recommendations {
        println!("   - {}", recommendation);
    }
}

fn format_status(status: Status) -> &'static str {
    match status {
        Status::Pass => "✅ PASS",
        Status::Warn => "⚠️  WARN",
        Status::Fail => "❌ FAIL",
        Status::Manual => "👀 MANUAL",
    }
}
