//! Structured work reports.
//!
//! Three report kinds (construction progress, employee load, team efficiency)
//! are composed from plain records and a loose parameter bag into a
//! backend-agnostic [`BlockTree`], then materialized by a [`RenderBackend`]
//! into a document on disk or in memory.
pub mod blocks;
pub mod classify;
pub mod error;
pub mod labels;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod params;
pub mod reports;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod util;

pub use blocks::{Block, BlockTree};
pub use error::{BackendError, ReportError};
pub use labels::Language;
pub use output::{JsonBackend, RenderBackend, TextBackend};
pub use params::{ParamBag, ReportParams};
pub use reports::{
    ConstructionProgressReport, EmployeeLoadReport, ReportComposer, ReportGenerator, ReportKind,
    TeamEfficiencyReport,
};
pub use types::{ConstructionTask, Counts, EmployeeLoad, TaskDetail, TeamEfficiency};
