//! Roadmap tree: phases, sections and tasks.
//!
//! # Responsibility
//! - Define the canonical tree records and their blob encoding.
//! - Provide path-copying edit primitives for `RoadmapStore`.
//!
//! # Invariants
//! - Children are held behind `Arc`. An edit copies only the nodes on the
//!   root-to-leaf path and shares every untouched subtree with the previous
//!   snapshot, so an old snapshot never changes underneath its holder.
//! - An edit addressed to a missing index yields `None`, never a partial tree.
//! - Blank `deadline`/`note` values are normalized to `None`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;
/// Stable identifier of a section.
pub type SectionId = Uuid;
/// Stable identifier of a phase.
pub type PhaseId = Uuid;

/// Task priority, declared from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities in declaration order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Stable string id used in the persisted blob.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Sort rank: `HIGH=1`, `MEDIUM=2`, `LOW=3`.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Parses a priority name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned on creation; legacy blobs without ids receive fresh ones.
    #[serde(default = "Uuid::new_v4")]
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    /// Calendar date text, stored verbatim. Unparseable values are kept and
    /// classify as no deadline.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
    /// `None` for early-schema tasks and unknown priority names.
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
}

impl Task {
    /// Creates an unchecked `MEDIUM` task with a generated id.
    pub fn new(text: impl Into<String>, deadline: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            checked: false,
            deadline: normalize_optional_text(deadline),
            note: None,
            priority: Some(Priority::Medium),
        }
    }

    /// Replaces the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Named group of tasks inside a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default = "Uuid::new_v4")]
    pub id: SectionId,
    /// Unique within the parent phase.
    #[serde(rename = "section")]
    pub title: String,
    /// Insertion order.
    #[serde(default)]
    pub tasks: Vec<Arc<Task>>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().map(Arc::as_ref)
    }
}

/// Coarse roadmap stage.
///
/// A per-phase `priority` literal found in older blobs is ignored on load:
/// phase priority is always derived from tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default = "Uuid::new_v4")]
    pub id: PhaseId,
    #[serde(rename = "section")]
    pub title: String,
    /// One-based position shown to the user.
    #[serde(rename = "phase", default)]
    pub ordinal: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "estimatedDuration", default)]
    pub estimated_duration: String,
    /// Presentation hint only.
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub children: Vec<Arc<Section>>,
}

impl Phase {
    pub fn new(ordinal: u32, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            ordinal,
            description: String::new(),
            estimated_duration: String::new(),
            collapsed: false,
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_estimated_duration(mut self, duration: impl Into<String>) -> Self {
        self.estimated_duration = duration.into();
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.children.push(Arc::new(section));
        self
    }

    /// All tasks of all sections, in display order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.children.iter().flat_map(|section| section.tasks())
    }
}

/// Index coordinates of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionPath {
    pub phase: usize,
    pub section: usize,
}

impl SectionPath {
    pub fn new(phase: usize, section: usize) -> Self {
        Self { phase, section }
    }

    pub fn task(self, task: usize) -> TaskPath {
        TaskPath::new(self.phase, self.section, task)
    }
}

/// Index coordinates of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskPath {
    pub phase: usize,
    pub section: usize,
    pub task: usize,
}

impl TaskPath {
    pub fn new(phase: usize, section: usize, task: usize) -> Self {
        Self {
            phase,
            section,
            task,
        }
    }

    pub fn section_path(self) -> SectionPath {
        SectionPath::new(self.phase, self.section)
    }
}

/// Root of the tree. Serialized as a bare array of phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roadmap {
    pub phases: Vec<Arc<Phase>>,
}

impl Roadmap {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self {
            phases: phases.into_iter().map(Arc::new).collect(),
        }
    }

    /// Decodes a persisted blob.
    pub fn from_blob(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Encodes the tree into its persisted blob form.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index).map(Arc::as_ref)
    }

    pub fn section(&self, path: SectionPath) -> Option<&Section> {
        self.phase(path.phase)?
            .children
            .get(path.section)
            .map(Arc::as_ref)
    }

    pub fn task(&self, path: TaskPath) -> Option<&Task> {
        self.section(path.section_path())?
            .tasks
            .get(path.task)
            .map(Arc::as_ref)
    }

    /// Every task in every section of every phase.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.phases.iter().flat_map(|phase| phase.tasks())
    }

    /// Resolves a stable task id to its current coordinates.
    pub fn find_task(&self, id: TaskId) -> Option<TaskPath> {
        self.phases
            .iter()
            .enumerate()
            .find_map(|(phase_index, phase)| {
                phase
                    .children
                    .iter()
                    .enumerate()
                    .find_map(|(section_index, section)| {
                        section
                            .tasks
                            .iter()
                            .position(|task| task.id == id)
                            .map(|task_index| {
                                TaskPath::new(phase_index, section_index, task_index)
                            })
                    })
            })
    }

    /// Rebuilds the tree with one phase replaced by `edit`'s output.
    ///
    /// Returns `None` when the index is out of range or `edit` declines.
    pub(crate) fn update_phase<F>(&self, index: usize, edit: F) -> Option<Roadmap>
    where
        F: FnOnce(&Phase) -> Option<Phase>,
    {
        let updated = edit(self.phases.get(index)?)?;
        let mut phases = self.phases.clone();
        phases[index] = Arc::new(updated);
        Some(Roadmap { phases })
    }

    pub(crate) fn update_section<F>(&self, path: SectionPath, edit: F) -> Option<Roadmap>
    where
        F: FnOnce(&Section) -> Option<Section>,
    {
        self.update_phase(path.phase, |phase| {
            let updated = edit(phase.children.get(path.section)?)?;
            let mut next = phase.clone();
            next.children[path.section] = Arc::new(updated);
            Some(next)
        })
    }

    pub(crate) fn update_task<F>(&self, path: TaskPath, edit: F) -> Option<Roadmap>
    where
        F: FnOnce(&Task) -> Option<Task>,
    {
        self.update_section(path.section_path(), |section| {
            let updated = edit(section.tasks.get(path.task)?)?;
            let mut next = section.clone();
            next.tasks[path.task] = Arc::new(updated);
            Some(next)
        })
    }
}

/// Trims `value` and maps blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Priority::parse))
}

#[cfg(test)]
mod tests {
    use super::{Phase, Priority, Roadmap, Section, SectionPath, Task, TaskPath};
    use std::sync::Arc;

    fn two_phase_roadmap() -> Roadmap {
        Roadmap::new(vec![
            Phase::new(1, "Basics").with_section(
                Section::new("Syntax")
                    .with_task(Task::new("loops", None))
                    .with_task(Task::new("closures", None)),
            ),
            Phase::new(2, "Advanced").with_section(Section::new("Async")),
        ])
    }

    #[test]
    fn update_task_copies_only_the_edited_path() {
        let roadmap = two_phase_roadmap();
        let path = TaskPath::new(0, 0, 1);

        let next = roadmap
            .update_task(path, |task| {
                let mut task = task.clone();
                task.checked = true;
                Some(task)
            })
            .expect("path should resolve");

        assert!(next.task(path).unwrap().checked);
        assert!(!roadmap.task(path).unwrap().checked);
        assert!(Arc::ptr_eq(&roadmap.phases[1], &next.phases[1]));
        assert!(Arc::ptr_eq(
            &roadmap.phases[0].children[0].tasks[0],
            &next.phases[0].children[0].tasks[0]
        ));
        assert!(!Arc::ptr_eq(&roadmap.phases[0], &next.phases[0]));
    }

    #[test]
    fn update_out_of_range_returns_none() {
        let roadmap = two_phase_roadmap();
        let keep = |task: &Task| Some(task.clone());

        assert!(roadmap.update_task(TaskPath::new(9, 0, 0), keep).is_none());
        assert!(roadmap.update_task(TaskPath::new(0, 3, 0), keep).is_none());
        assert!(roadmap.update_task(TaskPath::new(0, 0, 2), keep).is_none());
        assert!(roadmap
            .update_section(SectionPath::new(1, 1), |section| Some(section.clone()))
            .is_none());
    }

    #[test]
    fn find_task_resolves_ids_to_coordinates() {
        let roadmap = two_phase_roadmap();
        let id = roadmap.phases[0].children[0].tasks[1].id;

        assert_eq!(roadmap.find_task(id), Some(TaskPath::new(0, 0, 1)));
        assert_eq!(roadmap.find_task(uuid::Uuid::new_v4()), None);
    }

    #[test]
    fn legacy_blob_fields_are_tolerated() {
        let blob = r#"[{
            "section": "Phase 1",
            "priority": "HIGH",
            "phase": 1,
            "description": "d",
            "estimatedDuration": "2 weeks",
            "children": [{
                "section": "Java",
                "tasks": [
                    {"text": "a", "checked": true, "deadline": "", "priority": "HIGH"},
                    {"text": "b", "checked": false, "deadline": "2026-01-02", "priority": "URGENT"},
                    {"text": "c", "checked": false}
                ]
            }]
        }]"#;

        let roadmap = Roadmap::from_blob(blob).expect("legacy blob should decode");
        let section = roadmap.section(SectionPath::new(0, 0)).unwrap();

        assert_eq!(roadmap.phases[0].estimated_duration, "2 weeks");
        assert_eq!(section.tasks[0].deadline, None);
        assert_eq!(section.tasks[0].priority, Some(Priority::High));
        assert_eq!(section.tasks[1].deadline.as_deref(), Some("2026-01-02"));
        assert_eq!(section.tasks[1].priority, None);
        assert_eq!(section.tasks[2].priority, None);
        assert_ne!(section.tasks[0].id, section.tasks[1].id);
    }

    #[test]
    fn new_task_defaults_to_unchecked_medium() {
        let task = Task::new("read the book", Some("  "));
        assert!(!task.checked);
        assert_eq!(task.priority, Some(Priority::Medium));
        assert_eq!(task.deadline, None);
    }
}
