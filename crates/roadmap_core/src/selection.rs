//! Display focus: which phase and section are shown.
//!
//! Pure state. Not persisted with the roadmap.

use crate::model::roadmap::{Phase, Roadmap, Section};
use std::sync::Arc;

/// Focused phase and, optionally, one of its sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub phase_index: usize,
    /// `None` shows every section of the phase.
    pub section_index: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Focuses a phase and shows all of its sections.
    pub fn select_phase(&mut self, phase_index: usize) {
        self.state = SelectionState {
            phase_index,
            section_index: None,
        };
    }

    pub fn select_section(&mut self, section_index: Option<usize>) {
        self.state.section_index = section_index;
    }

    /// Sets both indices in one update, so no reader sees the new phase
    /// paired with the old section.
    pub fn select_phase_and_section(&mut self, phase_index: usize, section_index: Option<usize>) {
        self.state = SelectionState {
            phase_index,
            section_index,
        };
    }

    /// Pulls indices back into range after the tree changed shape.
    pub fn clamp_to(&mut self, roadmap: &Roadmap) {
        let phase_count = roadmap.phases.len();
        if phase_count == 0 {
            self.state = SelectionState::default();
            return;
        }
        if self.state.phase_index >= phase_count {
            self.state = SelectionState {
                phase_index: phase_count - 1,
                section_index: None,
            };
            return;
        }
        let section_count = roadmap.phases[self.state.phase_index].children.len();
        if self
            .state
            .section_index
            .is_some_and(|index| index >= section_count)
        {
            self.state.section_index = None;
        }
    }

    pub fn current_phase<'a>(&self, roadmap: &'a Roadmap) -> Option<&'a Phase> {
        roadmap.phase(self.state.phase_index)
    }

    /// Sections to render with their indices: the selected one, or all of
    /// the phase's sections when none is selected.
    pub fn visible_sections<'a>(&self, roadmap: &'a Roadmap) -> Vec<(usize, &'a Section)> {
        let Some(phase) = self.current_phase(roadmap) else {
            return Vec::new();
        };
        let sections = phase.children.iter().map(Arc::as_ref).enumerate();
        match self.state.section_index {
            Some(selected) => sections.filter(|(index, _)| *index == selected).collect(),
            None => sections.collect(),
        }
    }
}
