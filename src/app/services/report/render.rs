//! Renderer contract and rendered image validation

use super::chart::{ChartSeries, ReportRequest, VisualizationKind};
use crate::app::models::{MarketRecord, ShareType};
use crate::app::services::assembler::pipeline::panic_message;
use crate::constants::{DO_NOT_DISTRIBUTE_MESSAGE, MIN_RENDERED_IMAGE_BYTES, PNG_SIGNATURE};
use crate::error::{Error, Result};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

/// Produces a page image for one gated request
pub trait ReportRenderer: Send + Sync {
    fn render(&self, request: &ReportRequest, series: &ChartSeries) -> Result<RenderedImage>;
}

/// PNG bytes produced by a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub market: String,
    pub share_type: ShareType,
    pub kind: VisualizationKind,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn new(request: &ReportRequest, bytes: Vec<u8>) -> Self {
        Self {
            market: request.market().to_string(),
            share_type: request.share_type(),
            kind: request.kind(),
            bytes,
        }
    }

    /// A blank or truncated capture must never be distributed
    pub fn validate(&self) -> Result<()> {
        if !self.bytes.starts_with(PNG_SIGNATURE) {
            return Err(Error::image_validation(
                &self.market,
                format!("not a PNG image. {}", DO_NOT_DISTRIBUTE_MESSAGE),
            ));
        }
        if self.bytes.len() < MIN_RENDERED_IMAGE_BYTES {
            return Err(Error::image_validation(
                &self.market,
                format!(
                    "image too small ({} bytes). {}",
                    self.bytes.len(),
                    DO_NOT_DISTRIBUTE_MESSAGE
                ),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Gate, render and validate each record independently
///
/// Each market is drawn in `share_type` when it supports that view and in
/// its first available view otherwise, so every reportable market renders.
/// Results line up with `records`. A refused gate, renderer error, renderer
/// panic or rejected image fails only that record.
pub fn render_batch(
    records: &[MarketRecord],
    share_type: ShareType,
    kind: VisualizationKind,
    max_brokerages: usize,
    renderer: &dyn ReportRenderer,
) -> Vec<Result<RenderedImage>> {
    records
        .iter()
        .map(|record| render_one(record, share_type, kind, max_brokerages, renderer))
        .collect()
}

fn render_one(
    record: &MarketRecord,
    share_type: ShareType,
    kind: VisualizationKind,
    max_brokerages: usize,
    renderer: &dyn ReportRenderer,
) -> Result<RenderedImage> {
    let view = match record.effective_view(share_type) {
        Some(view) if view != share_type => {
            debug!(
                "{} does not support the {} view, rendering {} instead",
                record.display_title(),
                share_type,
                view
            );
            view
        }
        Some(view) => view,
        None => share_type,
    };

    let request = ReportRequest::new(record, view, kind)?;
    let series = ChartSeries::build(record, view, max_brokerages);

    let image = catch_unwind(AssertUnwindSafe(|| renderer.render(&request, &series)))
        .map_err(|payload| {
            Error::image_validation(
                request.market(),
                format!("renderer panicked: {}", panic_message(payload.as_ref())),
            )
        })??;

    if let Err(e) = image.validate() {
        warn!("Rejected rendered image for {}: {}", request.market(), e);
        return Err(e);
    }

    debug!(
        "Rendered {} {} chart for {} ({} bytes)",
        kind,
        view,
        request.market(),
        image.len()
    );
    Ok(image)
}
