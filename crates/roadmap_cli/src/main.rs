//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roadmap_core` linkage.
//! - Print per-phase progress for the roadmap stored at the given path, or
//!   for the built-in roadmap when no path is given.
//! - Write core logs under `ROADMAP_LOG_DIR` when it is set.

use roadmap_core::{
    builtin_roadmap, default_log_level, init_logging, overall_progress, summarize_phase, today,
    LogLevel, LoggingError, RoadmapStore, SqliteGateway, StoreConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = start_logging() {
        eprintln!("roadmap_cli: logging disabled: {err}");
    }

    let gateway = match std::env::args().nth(1) {
        Some(path) => SqliteGateway::open(path),
        None => SqliteGateway::open_in_memory(),
    };
    let gateway = match gateway {
        Ok(gateway) => gateway,
        Err(err) => {
            eprintln!("roadmap_cli: cannot open storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = RoadmapStore::open(gateway, &StoreConfig::default(), builtin_roadmap);
    let roadmap = store.snapshot();
    let today = today();

    println!("roadmap_core version={}", roadmap_core::core_version());
    let overall = overall_progress(&roadmap);
    println!(
        "overall {}/{} ({}%)",
        overall.completed, overall.total, overall.percent
    );
    for phase in &roadmap.phases {
        let summary = summarize_phase(phase, today);
        println!(
            "[{}] {} {}/{} ({}%) median={} overdue={}",
            phase.ordinal,
            phase.title,
            summary.progress.completed,
            summary.progress.total,
            summary.progress.percent,
            summary.median_priority,
            summary.overdue
        );
    }
    ExitCode::SUCCESS
}

fn start_logging() -> Result<(), LoggingError> {
    let Some(dir) = std::env::var_os("ROADMAP_LOG_DIR") else {
        return Ok(());
    };
    let level = match std::env::var("ROADMAP_LOG_LEVEL") {
        Ok(value) => LogLevel::parse(&value)?,
        Err(_) => default_log_level(),
    };
    init_logging(level, std::path::PathBuf::from(dir))
}
