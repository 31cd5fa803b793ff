mod lopdf_renderer;

pub use lopdf_renderer::LopdfRenderer;

#[cfg(test)]
pub(crate) use lopdf_renderer::tests::sample_pdf;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// One page laid out for display, sized in pixels at the requested scale
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RenderedPage {
    /// 1-based page number
    pub number: u32,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF has no pages")]
    NoPages,
}

/// Turns PDF bytes into displayable pages, in page order
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, bytes: &[u8], scale: f64) -> Result<Vec<RenderedPage>, RenderError>;
}
