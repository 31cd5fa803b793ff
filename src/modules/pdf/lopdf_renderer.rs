use std::collections::HashSet;

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use super::{DocumentRenderer, RenderError, RenderedPage};

/// US Letter, used when neither a page nor its ancestors declare a MediaBox
const FALLBACK_MEDIA_BOX: (f64, f64) = (612.0, 792.0);

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }

    fn number(obj: &Object) -> Option<f64> {
        match obj {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r as f64),
            _ => None,
        }
    }

    /// Page size in points, walking up `Parent` links for an inherited MediaBox.
    /// A `Parent` chain that loops back ends the walk.
    fn media_box(doc: &Document, page_id: ObjectId) -> (f64, f64) {
        let mut visited = HashSet::new();
        let mut current = Some(page_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                warn!("Parent cycle at object {:?}; using fallback page size", id);
                break;
            }
            let Ok(dict) = doc.get_object(id).and_then(Object::as_dict) else {
                break;
            };

            if let Ok(rect) = dict.get(b"MediaBox").and_then(Object::as_array) {
                let coords: Vec<f64> = rect.iter().filter_map(Self::number).collect();
                if let [x0, y0, x1, y1] = coords[..] {
                    return ((x1 - x0).abs(), (y1 - y0).abs());
                }
            }

            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        FALLBACK_MEDIA_BOX
    }
}

impl DocumentRenderer for LopdfRenderer {
    fn render(&self, bytes: &[u8], scale: f64) -> Result<Vec<RenderedPage>, RenderError> {
        let doc = Document::load_mem(bytes).map_err(|e| RenderError::Parse(e.to_string()))?;
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(RenderError::NoPages);
        }
        debug!("Rendering {} page(s) at scale {}", pages.len(), scale);

        let rendered = pages
            .into_iter()
            .map(|(number, page_id)| {
                let (width, height) = Self::media_box(&doc, page_id);
                let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!("No text extracted from page {}: {}", number, e);
                    String::new()
                });
                RenderedPage {
                    number,
                    width: width * scale,
                    height: height * scale,
                    text,
                }
            })
            .collect();

        Ok(rendered)
    }
}
