//! Derived progress and priority metrics.
//!
//! # Responsibility
//! - Compute completion counts, percentages and priority rollups over any
//!   subtree of a roadmap snapshot.
//!
//! # Invariants
//! - Every function is pure and never mutates its input.
//! - `percent` is always within `0..=100` and is `0` for an empty subtree.
//! - An empty subtree is never complete.

use crate::deadline::{classify_on, DeadlineStatus};
use crate::model::roadmap::{Phase, Priority, Roadmap, Section, Task};
use chrono::NaiveDate;

/// Rank assigned to tasks with no priority; sorts after every known rank.
const UNKNOWN_PRIORITY_RANK: u8 = 99;

/// Completion summary of a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    /// `round(100 * completed / total)`, half rounded up.
    pub percent: u8,
    /// `total > 0 && completed == total`.
    pub is_complete: bool,
}

impl Progress {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks
            .into_iter()
            .fold((0, 0), |(total, completed), task| {
                (total + 1, completed + usize::from(task.checked))
            });
        Self::from_counts(total, completed)
    }

    pub fn from_counts(total: usize, completed: usize) -> Self {
        let completed = completed.min(total);
        Self {
            total,
            completed,
            percent: rounded_percent(completed, total),
            is_complete: total > 0 && completed == total,
        }
    }
}

pub fn section_progress(section: &Section) -> Progress {
    Progress::from_tasks(section.tasks())
}

pub fn phase_progress(phase: &Phase) -> Progress {
    Progress::from_tasks(phase.tasks())
}

pub fn overall_progress(roadmap: &Roadmap) -> Progress {
    Progress::from_tasks(roadmap.tasks())
}

/// Task counts per priority. Tasks without a priority are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityTally {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityTally {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

pub fn priority_tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> PriorityTally {
    tasks
        .into_iter()
        .fold(PriorityTally::default(), |mut tally, task| {
            match task.priority {
                Some(Priority::High) => tally.high += 1,
                Some(Priority::Medium) => tally.medium += 1,
                Some(Priority::Low) => tally.low += 1,
                None => {}
            }
            tally
        })
}

/// Lower-median priority of `priorities`.
///
/// Missing priorities rank below `LOW`. An empty input, or a median that
/// lands on a missing priority, yields `LOW`.
pub fn median_priority(priorities: impl IntoIterator<Item = Option<Priority>>) -> Priority {
    let mut ranks: Vec<u8> = priorities
        .into_iter()
        .map(|priority| priority.map_or(UNKNOWN_PRIORITY_RANK, Priority::rank))
        .collect();
    if ranks.is_empty() {
        return Priority::Low;
    }
    ranks.sort_unstable();
    let median = ranks[(ranks.len() - 1) / 2];
    Priority::ALL
        .into_iter()
        .find(|priority| priority.rank() == median)
        .unwrap_or(Priority::Low)
}

pub fn median_task_priority<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Priority {
    median_priority(tasks.into_iter().map(|task| task.priority))
}

/// Unchecked tasks whose deadline falls before `today`.
pub fn overdue_count<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> usize {
    tasks
        .into_iter()
        .filter(|task| {
            !task.checked
                && classify_on(task.deadline.as_deref(), today) == DeadlineStatus::Overdue
        })
        .count()
}

pub fn section_overdue_count(section: &Section, today: NaiveDate) -> usize {
    overdue_count(section.tasks(), today)
}

pub fn phase_overdue_count(phase: &Phase, today: NaiveDate) -> usize {
    overdue_count(phase.tasks(), today)
}

/// All rollups a phase header shows, computed in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    pub progress: Progress,
    pub tally: PriorityTally,
    pub median_priority: Priority,
    pub overdue: usize,
}

pub fn summarize_phase(phase: &Phase, today: NaiveDate) -> PhaseSummary {
    PhaseSummary {
        progress: phase_progress(phase),
        tally: priority_tally(phase.tasks()),
        median_priority: median_task_priority(phase.tasks()),
        overdue: phase_overdue_count(phase, today),
    }
}

fn rounded_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * completed + total) / (2 * total);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::{
        median_priority, overdue_count, priority_tally, rounded_percent, section_progress,
        Progress,
    };
    use crate::model::roadmap::{Priority, Section, Task};
    use chrono::NaiveDate;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(5, 5), 100);
    }

    #[test]
    fn empty_section_is_never_complete() {
        let progress = section_progress(&Section::new("empty"));
        assert_eq!(progress, Progress::default());
        assert!(!progress.is_complete);
    }

    #[test]
    fn median_priority_uses_lower_median() {
        use Priority::{High, Low, Medium};
        assert_eq!(median_priority([]), Low);
        assert_eq!(median_priority([Some(High), Some(Low)]), High);
        assert_eq!(median_priority([Some(High), Some(Medium), Some(Low)]), Medium);
        assert_eq!(median_priority([Some(Low), Some(High), Some(High), Some(Low)]), High);
        assert_eq!(median_priority([None, None, Some(High)]), Low);
        assert_eq!(median_priority([None, Some(Medium), Some(High)]), Medium);
    }

    #[test]
    fn tally_skips_tasks_without_priority() {
        let mut bare = Task::new("bare", None);
        bare.priority = None;
        let tasks = [
            Task::new("a", None).with_priority(Priority::High),
            Task::new("b", None),
            bare,
        ];

        let tally = priority_tally(&tasks);
        assert_eq!((tally.high, tally.medium, tally.low), (1, 1, 0));
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn overdue_ignores_checked_and_unparseable() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut done = Task::new("done", Some("2026-10-01"));
        done.checked = true;
        let tasks = [
            Task::new("late", Some("2026-10-01")),
            done,
            Task::new("garbled", Some("not a date")),
            Task::new("today", Some("2026-10-18")),
        ];

        assert_eq!(overdue_count(&tasks, today), 1);
    }
}
