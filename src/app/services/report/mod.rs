//! Report gating, chart data and export planning
//!
//! Rendering and packaging are external concerns reached through the
//! [`ReportRenderer`] and [`ExportPackager`] traits. This module decides what
//! may be rendered and hands each renderer a ready-made [`ChartSeries`]:
//!
//! - [`chart`] - [`ReportRequest`] gate and [`ChartSeries`] construction
//! - [`render`] - renderer contract, image validation and batch rendering
//! - [`export`] - artifact naming, archive naming and the packager contract

pub mod chart;
pub mod export;
pub mod render;

#[cfg(test)]
mod tests;

pub use chart::{ChartBar, ChartSeries, ReportRequest, VisualizationKind};
pub use export::{
    ExportArtifact, ExportFormat, ExportItem, ExportPackager, ExportPlan, PlannedMarket,
    ready_markets, safe_file_stem,
};
pub use render::{RenderedImage, ReportRenderer, render_batch};
