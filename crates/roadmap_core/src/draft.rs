//! Transient edit state for the add-task and edit-note flows.
//!
//! # Invariants
//! - Drafts are never persisted; `cancel` and a successful `commit` both
//!   return the draft to its empty state.
//! - A failed commit leaves the draft untouched so the user can retry.

use crate::gateway::PersistenceGateway;
use crate::model::roadmap::{Roadmap, SectionPath, TaskPath};
use crate::store::RoadmapStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Why a draft could not be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    /// No target was chosen with `begin`.
    NoTarget,
    /// Task text is empty after trim.
    BlankText,
    /// Target no longer exists in the current snapshot.
    TargetMissing,
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTarget => write!(f, "draft has no target"),
            Self::BlankText => write!(f, "task text must not be blank"),
            Self::TargetMissing => write!(f, "draft target no longer exists"),
        }
    }
}

impl Error for DraftError {}

/// In-progress "add task" form for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    target: Option<SectionPath>,
    text: String,
    deadline: String,
}

impl TaskDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the form for `target`, discarding any earlier input.
    pub fn begin(&mut self, target: SectionPath) {
        *self = Self {
            target: Some(target),
            ..Self::default()
        };
    }

    pub fn target(&self) -> Option<SectionPath> {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_deadline(&mut self, deadline: impl Into<String>) {
        self.deadline = deadline.into();
    }

    /// Whether the submit control should be enabled.
    pub fn can_commit(&self) -> bool {
        self.target.is_some() && !self.text.trim().is_empty()
    }

    pub fn commit<G: PersistenceGateway>(
        &mut self,
        store: &mut RoadmapStore<G>,
    ) -> Result<Arc<Roadmap>, DraftError> {
        let target = self.target.ok_or(DraftError::NoTarget)?;
        if self.text.trim().is_empty() {
            return Err(DraftError::BlankText);
        }
        if store.snapshot().section(target).is_none() {
            return Err(DraftError::TargetMissing);
        }
        let next = store.add_task(target, &self.text, Some(self.deadline.as_str()));
        self.cancel();
        Ok(next)
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

/// In-progress note edit for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    target: Option<TaskPath>,
    text: String,
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the editor for `target`, prefilled with its current note.
    pub fn begin(&mut self, roadmap: &Roadmap, target: TaskPath) {
        let text = roadmap
            .task(target)
            .and_then(|task| task.note.clone())
            .unwrap_or_default();
        *self = Self {
            target: Some(target),
            text,
        };
    }

    pub fn target(&self) -> Option<TaskPath> {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Writes the note; a blank draft clears it.
    pub fn commit<G: PersistenceGateway>(
        &mut self,
        store: &mut RoadmapStore<G>,
    ) -> Result<Arc<Roadmap>, DraftError> {
        let target = self.target.ok_or(DraftError::NoTarget)?;
        if store.snapshot().task(target).is_none() {
            return Err(DraftError::TargetMissing);
        }
        let next = store.set_task_note(target, Some(self.text.as_str()));
        self.cancel();
        Ok(next)
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}
