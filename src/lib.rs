//! Interactive data-upload-and-reporting pipeline: load a tabular dataset,
//! filter rows by column membership, aggregate per chart spec, render charts
//! with auto-generated conclusions, and export Excel/PDF artifacts.
//!
//! The UI layer is an external collaborator: it drives a [`session::Session`]
//! and displays or downloads whatever the pipeline returns.

pub mod chart;
pub mod data;
pub mod error;
pub mod report;
pub mod session;

pub use chart::{ChartKind, ChartSpec};
pub use data::model::{Column, ColumnKind, Table, Value};
pub use error::{ChartError, ConfigError, ExportError, LoadError, RenderError};
pub use session::{ChartBuildReport, ChartOutput, ExportArtifact, Session};
