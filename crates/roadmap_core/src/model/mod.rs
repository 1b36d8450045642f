//! Roadmap domain model.
//!
//! # Responsibility
//! - Define the phase -> section -> task tree that every other module reads.
//! - Own the persisted JSON shape of the tree.
//!
//! # Invariants
//! - Every node is identified by a stable id assigned at creation.
//! - Progress and priority rollups are never stored on the tree; they are
//!   recomputed by `crate::progress` from task data.

pub mod roadmap;
