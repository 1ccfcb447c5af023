//! Report PDF generation for the PPE equipment administration system.
//!
//! Pipeline: shape domain data into a report payload, render it into a
//! fixed-width A4 document tree, capture that tree offscreen into a raster
//! bitmap, then slice the bitmap into A4-height bands and save a multi-page
//! PDF.

pub mod aggregator;
pub mod config;
pub mod document;
pub mod error;
pub mod layouts;
pub mod models;
pub mod offscreen;
pub mod pipeline;
pub mod renderers;

pub use config::Settings;
pub use error::{ReportError, Result};
pub use models::{ReportPayload, ReportRequest, ReportType};
pub use pipeline::ReportPipeline;
