use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::pdf::RenderedPage;

/// Where the viewer ended up after opening a letter
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewerState {
    Loading,
    Error {
        message: String,
    },
    /// PDF laid out page by page, in page order
    Rendered {
        filename: String,
        mime: String,
        pages: Vec<RenderedPage>,
    },
    /// Not a PDF; only a download is offered
    Notice {
        filename: String,
        mime: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DocumentDownloadDto {
    pub filename: String,
    pub mime: String,
    /// `data:{mime};base64,{payload}`
    pub data_uri: String,
}
