//! hand_pointer - command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hand_pointer::app::run;
use hand_pointer::config::{Cli, SourceKind};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match cli.into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Hand Pointer - gesture mouse controller             ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.source {
        SourceKind::Simulated                => println!("  Source: simulated hand (mouse over the window)"),
        SourceKind::Detector { program, .. } => println!("  Source: detector {}", program),
        SourceKind::Replay(path)             => println!("  Source: replay {}", path.display()),
    }
    #[cfg(feature = "os-input")]
    println!("  Output: OS pointer{}", if cfg.dry_run { " (dry run)" } else { "" });
    #[cfg(not(feature = "os-input"))]
    println!("  Output: log only  (use --features os-input for the real pointer)");
    println!();

    match run(cfg) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                actions = summary.actions,
                reason = ?summary.reason,
                "stopped"
            );
            if summary.reason.is_failure() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `-v`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
