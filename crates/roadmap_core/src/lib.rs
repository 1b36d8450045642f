//! Core state and metrics for the roadmap progress tracker.
//! This crate is the single source of truth for tree invariants; rendering
//! layers read snapshots and call `RoadmapStore` operations.

pub mod config;
pub mod db;
pub mod deadline;
pub mod defaults;
pub mod draft;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod progress;
pub mod selection;
pub mod store;
pub mod theme;
pub mod undo;

pub use config::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY, DEFAULT_THEME_KEY};
pub use deadline::{
    classify, classify_on, days_left, days_left_on, deadline_badge, format_deadline,
    parse_deadline, today, DeadlineBadge, DeadlineStatus,
};
pub use defaults::{builtin_roadmap, DefaultRoadmap};
pub use draft::{DraftError, NoteDraft, TaskDraft};
pub use gateway::{GatewayError, MemoryGateway, PersistenceGateway, SqliteGateway};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::roadmap::{
    Phase, PhaseId, Priority, Roadmap, Section, SectionId, SectionPath, Task, TaskId, TaskPath,
};
pub use progress::{
    median_priority, median_task_priority, overall_progress, overdue_count, phase_overdue_count,
    phase_progress, priority_tally, section_overdue_count, section_progress, summarize_phase,
    PhaseSummary, PriorityTally, Progress,
};
pub use selection::{SelectionController, SelectionState};
pub use store::{load_initial, RoadmapStore};
pub use theme::{Theme, ThemeStore};
pub use undo::{UndoController, UndoState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
