//! Single-step undo for unchecking a task.
//!
//! # Invariants
//! - At most one uncheck is undoable; a newer uncheck replaces the pending one.
//! - A pending undo expires once `now >= expires_at`. A window too long to
//!   represent as an `Instant` has no expiry and stays open until taken.
//! - Undo addresses the task by id, so it survives index drift.

use crate::config::StoreConfig;
use crate::gateway::PersistenceGateway;
use crate::model::roadmap::{Roadmap, TaskId, TaskPath};
use crate::store::RoadmapStore;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoState {
    Idle,
    PendingUndo {
        task_id: TaskId,
        /// `None` when `now + timeout` does not fit in an `Instant`.
        expires_at: Option<Instant>,
    },
}

#[derive(Debug, Clone)]
pub struct UndoController {
    timeout: Duration,
    state: UndoState,
}

impl UndoController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: UndoState::Idle,
        }
    }

    /// Uses the configured undo window.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.undo_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self) -> UndoState {
        self.state
    }

    /// Starts (or restarts) the undo window for `task_id`.
    pub fn record_uncheck(&mut self, task_id: TaskId, now: Instant) {
        if let UndoState::PendingUndo { task_id: replaced, .. } = self.state {
            debug!("event=undo_replace module=undo status=ok replaced={replaced}");
        }
        self.state = UndoState::PendingUndo {
            task_id,
            expires_at: now.checked_add(self.timeout),
        };
    }

    /// Task awaiting undo, if the window is still open at `now`.
    pub fn pending(&self, now: Instant) -> Option<TaskId> {
        match self.state {
            UndoState::PendingUndo {
                task_id,
                expires_at,
            } if is_open(expires_at, now) => Some(task_id),
            _ => None,
        }
    }

    /// Returns to `Idle` when the window has closed. Returns whether it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = matches!(
            self.state,
            UndoState::PendingUndo { expires_at, .. } if !is_open(expires_at, now)
        );
        if expired {
            self.state = UndoState::Idle;
        }
        expired
    }

    /// Consumes the pending undo target. Always leaves the controller `Idle`.
    pub fn take(&mut self, now: Instant) -> Option<TaskId> {
        let pending = self.pending(now);
        self.state = UndoState::Idle;
        pending
    }

    /// Toggles a task through `store`, opening an undo window when the toggle
    /// unchecked it.
    pub fn toggle<G: PersistenceGateway>(
        &mut self,
        store: &mut RoadmapStore<G>,
        path: TaskPath,
        now: Instant,
    ) -> Arc<Roadmap> {
        let was_checked = store.snapshot().task(path).map(|task| task.checked);
        let next = store.toggle_task_checked(path);
        if was_checked == Some(true) {
            if let Some(task) = next.task(path).filter(|task| !task.checked) {
                self.record_uncheck(task.id, now);
            }
        }
        next
    }

    /// Re-checks the pending task. Returns `None` when nothing is undoable.
    pub fn undo<G: PersistenceGateway>(
        &mut self,
        store: &mut RoadmapStore<G>,
        now: Instant,
    ) -> Option<Arc<Roadmap>> {
        let task_id = self.take(now)?;
        Some(store.set_task_checked_by_id(task_id, true))
    }
}

fn is_open(expires_at: Option<Instant>, now: Instant) -> bool {
    expires_at.map_or(true, |deadline| now < deadline)
}

impl Default for UndoController {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}
