//! # kn-sync
//!
//! The Keep-to-Notion import pipeline.
//!
//! ```text
//! KeepSource::list_items → LabelResolver → EntityMapper → MediaTransfer → TargetWriter
//! ```
//!
//! [`Orchestrator`] drives items through these stages one at a time and
//! aggregates the outcome into a [`RunResult`](kn_core::report::RunResult).
//! Every stage is generic over the [`KeepSource`](kn_core::KeepSource) and
//! [`NotionTarget`](kn_core::NotionTarget) seams.

mod error;
pub mod labels;
pub mod ledger;
pub mod mapper;
pub mod media;
pub mod orchestrator;
pub mod writer;

pub use error::LedgerError;
pub use labels::LabelResolver;
pub use ledger::{ImportLedger, LedgerEntry};
pub use mapper::{EntityMapper, ItemContainers};
pub use media::MediaTransfer;
pub use orchestrator::{ImportOptions, NoProgress, Orchestrator, ProgressObserver};
pub use writer::TargetWriter;
