//! # kn-core
//!
//! Core types, state enums, and error types for keep2notion.
//!
//! This crate provides the foundational types shared across all keep2notion crates:
//! - Source-side entities (`SourceItem`, `LabelRef`, `AttachmentRef`)
//! - Target-side plan types (`Block`, `TargetPlan`) and identifiers
//! - Per-item state machine and write step enums
//! - The item filter applied by every source
//! - The `KeepSource` / `NotionTarget` seams the pipeline is generic over
//! - Run report types (`RunResult`, `ItemReport`)
//! - The error taxonomy

pub mod backend;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod filter;
pub mod ids;
pub mod report;

pub use backend::{KeepSource, NotionTarget};
pub use filter::ItemFilter;
pub use ids::{ContainerId, PageId};
