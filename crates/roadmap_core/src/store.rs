//! Authoritative roadmap state and its mutation operations.
//!
//! # Responsibility
//! - Own the live roadmap snapshot for one session.
//! - Apply invariant-preserving edits and persist every accepted edit.
//!
//! # Invariants
//! - Every operation returns a snapshot; a rejected edit (stale index, blank
//!   text, unchanged value) returns the current `Arc` itself, so callers can
//!   detect a no-op with `Arc::ptr_eq`.
//! - The in-memory snapshot is replaced before the persistence write is
//!   issued, so a read right after an edit never sees the old tree.
//! - Loading never fails: absent or unusable blobs fall back to the injected
//!   default roadmap.
//!
//! # See also
//! - `crate::model::roadmap` for the path-copying edit primitives.

use crate::config::StoreConfig;
use crate::defaults::DefaultRoadmap;
use crate::gateway::PersistenceGateway;
use crate::model::roadmap::{
    normalize_optional_text, Priority, Roadmap, SectionPath, Task, TaskId, TaskPath,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Reads the persisted roadmap under `storage_key`, falling back to
/// `defaults` when it is absent, corrupt or unreadable.
pub fn load_initial<G>(gateway: &G, storage_key: &str, defaults: &dyn DefaultRoadmap) -> Roadmap
where
    G: PersistenceGateway + ?Sized,
{
    let blob = match gateway.get(storage_key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!(
                "event=roadmap_load module=store status=fallback reason=absent key={storage_key}"
            );
            return defaults.default_roadmap();
        }
        Err(err) => {
            warn!(
                "event=roadmap_load module=store status=fallback reason=gateway_error key={storage_key} error={err}"
            );
            return defaults.default_roadmap();
        }
    };

    match Roadmap::from_blob(&blob) {
        Ok(roadmap) => {
            info!(
                "event=roadmap_load module=store status=ok key={storage_key} phases={} bytes={}",
                roadmap.phases.len(),
                blob.len()
            );
            roadmap
        }
        Err(err) => {
            warn!(
                "event=roadmap_load module=store status=fallback reason=corrupt_blob key={storage_key} line={} column={}",
                err.line(),
                err.column()
            );
            defaults.default_roadmap()
        }
    }
}

/// Single owner of the live roadmap tree.
pub struct RoadmapStore<G: PersistenceGateway> {
    gateway: G,
    storage_key: String,
    defaults: Box<dyn DefaultRoadmap>,
    snapshot: Arc<Roadmap>,
}

impl<G: PersistenceGateway> RoadmapStore<G> {
    /// Loads the persisted roadmap (or the default) and takes ownership of it.
    pub fn open(
        gateway: G,
        config: &StoreConfig,
        defaults: impl DefaultRoadmap + 'static,
    ) -> Self {
        let roadmap = load_initial(&gateway, config.storage_key(), &defaults);
        Self {
            gateway,
            storage_key: config.storage_key().to_string(),
            defaults: Box::new(defaults),
            snapshot: Arc::new(roadmap),
        }
    }

    /// Current read-only snapshot.
    pub fn snapshot(&self) -> Arc<Roadmap> {
        Arc::clone(&self.snapshot)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn toggle_task_checked(&mut self, path: TaskPath) -> Arc<Roadmap> {
        let next = self.snapshot.update_task(path, |task| {
            Some(Task {
                checked: !task.checked,
                ..task.clone()
            })
        });
        self.apply("toggle_task_checked", next)
    }

    /// Sets the checked flag of the task with `id`, wherever it currently is.
    pub fn set_task_checked_by_id(&mut self, id: TaskId, checked: bool) -> Arc<Roadmap> {
        let next = self.snapshot.find_task(id).and_then(|path| {
            self.snapshot.update_task(path, |task| {
                (task.checked != checked).then(|| Task {
                    checked,
                    ..task.clone()
                })
            })
        });
        self.apply("set_task_checked", next)
    }

    /// Sets or clears (`None` or blank) a deadline. Text is stored verbatim
    /// apart from trimming; it is not validated as a date.
    pub fn set_task_deadline(&mut self, path: TaskPath, deadline: Option<&str>) -> Arc<Roadmap> {
        let deadline = normalize_optional_text(deadline);
        let next = self.snapshot.update_task(path, |task| {
            (task.deadline != deadline).then(|| Task {
                deadline,
                ..task.clone()
            })
        });
        self.apply("set_task_deadline", next)
    }

    /// Sets or clears (`None` or blank) a note.
    pub fn set_task_note(&mut self, path: TaskPath, note: Option<&str>) -> Arc<Roadmap> {
        let note = normalize_optional_text(note);
        let next = self.snapshot.update_task(path, |task| {
            (task.note != note).then(|| Task {
                note,
                ..task.clone()
            })
        });
        self.apply("set_task_note", next)
    }

    pub fn set_task_priority(&mut self, path: TaskPath, priority: Priority) -> Arc<Roadmap> {
        let next = self.snapshot.update_task(path, |task| {
            (task.priority != Some(priority)).then(|| Task {
                priority: Some(priority),
                ..task.clone()
            })
        });
        self.apply("set_task_priority", next)
    }

    /// Appends an unchecked `MEDIUM` task to the end of a section.
    ///
    /// Blank `text` is rejected.
    pub fn add_task(
        &mut self,
        section: SectionPath,
        text: &str,
        deadline: Option<&str>,
    ) -> Arc<Roadmap> {
        let text = text.trim();
        if text.is_empty() {
            debug!("event=roadmap_mutation module=store status=noop op=add_task reason=blank_text");
            return self.snapshot();
        }
        let next = self.snapshot.update_section(section, |current| {
            let mut next = current.clone();
            next.tasks.push(Arc::new(Task::new(text, deadline)));
            Some(next)
        });
        self.apply("add_task", next)
    }

    pub fn remove_task(&mut self, path: TaskPath) -> Arc<Roadmap> {
        let next = self.snapshot.update_section(path.section_path(), |current| {
            if path.task >= current.tasks.len() {
                return None;
            }
            let mut next = current.clone();
            next.tasks.remove(path.task);
            Some(next)
        });
        self.apply("remove_task", next)
    }

    /// Renames a section. Blank titles and titles already used by a sibling
    /// section are rejected.
    pub fn rename_section(&mut self, section: SectionPath, title: &str) -> Arc<Roadmap> {
        let title = title.trim();
        if title.is_empty() {
            debug!(
                "event=roadmap_mutation module=store status=noop op=rename_section reason=blank_title"
            );
            return self.snapshot();
        }
        let next = self.snapshot.update_phase(section.phase, |phase| {
            let current = phase.children.get(section.section)?;
            if current.title == title {
                return None;
            }
            let taken = phase
                .children
                .iter()
                .enumerate()
                .any(|(index, sibling)| index != section.section && sibling.title == title);
            if taken {
                return None;
            }
            let mut renamed = current.as_ref().clone();
            renamed.title = title.to_string();
            let mut next = phase.clone();
            next.children[section.section] = Arc::new(renamed);
            Some(next)
        });
        self.apply("rename_section", next)
    }

    /// Flips the presentation-only collapsed flag of a phase.
    pub fn toggle_section_collapsed(&mut self, phase_index: usize) -> Arc<Roadmap> {
        let next = self.snapshot.update_phase(phase_index, |phase| {
            let mut next = phase.clone();
            next.collapsed = !phase.collapsed;
            Some(next)
        });
        self.apply("toggle_section_collapsed", next)
    }

    /// Replaces the whole tree with a fresh default roadmap.
    pub fn reset(&mut self) -> Arc<Roadmap> {
        let roadmap = self.defaults.default_roadmap();
        self.apply("reset", Some(roadmap))
    }

    fn apply(&mut self, operation: &'static str, next: Option<Roadmap>) -> Arc<Roadmap> {
        let Some(next) = next else {
            debug!("event=roadmap_mutation module=store status=noop op={operation}");
            return self.snapshot();
        };
        self.snapshot = Arc::new(next);
        self.persist(operation);
        self.snapshot()
    }

    fn persist(&self, operation: &'static str) {
        let started_at = Instant::now();
        let blob = match self.snapshot.to_blob() {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=roadmap_persist module=store status=error op={operation} error_code=encode_failed error={err}"
                );
                return;
            }
        };

        match self.gateway.set(&self.storage_key, &blob) {
            Ok(()) => info!(
                "event=roadmap_persist module=store status=ok op={operation} bytes={} duration_ms={}",
                blob.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=roadmap_persist module=store status=error op={operation} error_code=write_failed duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
    }
}
