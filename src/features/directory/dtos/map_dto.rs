use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MapSceneQuery {
    /// Same filter as the organization list
    pub q: Option<String>,
    /// Record to bring into view with its popup open
    pub selected: Option<i64>,
}
