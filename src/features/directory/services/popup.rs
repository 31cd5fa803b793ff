use std::collections::HashMap;

use minijinja::Value;
use serde::Serialize;

use crate::features::ormas::models::Ormas;
use crate::shared::constants::GOOGLE_MAPS_SEARCH_URL;
use crate::shared::templates::{render_template, TemplateError};

const POPUP_TEMPLATE: &str = "popup/ormas_popup.html";

#[derive(Debug, Serialize)]
struct PopupLink {
    url: String,
    label: &'static str,
    color: &'static str,
}

/// External map-search link for a coordinate
pub fn maps_search_url(lat: f64, lng: f64) -> String {
    let query = format!("{},{}", lat, lng);
    format!("{}{}", GOOGLE_MAPS_SEARCH_URL, urlencoding::encode(&query))
}

/// Popup HTML for a record's marker
pub fn build_popup_html(
    record: &Ormas,
    public_url: &dyn Fn(&str) -> Option<String>,
) -> Result<String, TemplateError> {
    let links: Vec<PopupLink> = record
        .attachments
        .iter()
        .filter_map(|(slot, attachment)| {
            let url = attachment.stored_path().and_then(public_url)?;
            Some(PopupLink {
                url,
                label: slot.label(),
                color: slot.link_color(),
            })
        })
        .collect();

    let coordinates = record
        .coordinates()
        .map(|(lat, lng)| format!("{:.5}, {:.5}", lat, lng))
        .unwrap_or_else(|| "-".to_string());
    let maps_url = record
        .coordinates()
        .map(|(lat, lng)| maps_search_url(lat, lng));
    // Digits and slashes only
    let created_date = record
        .created_at
        .map(|dt| Value::from_safe_string(dt.format("%d/%m/%Y").to_string()));

    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("name", Value::from(record.name.as_str()));
    ctx.insert("status", Value::from(record.status.as_str()));
    ctx.insert("address", Value::from(record.address.as_str()));
    ctx.insert("coordinates", Value::from(coordinates));
    ctx.insert("created_date", Value::from(created_date));
    ctx.insert(
        "surat_filename",
        Value::from(record.attachments.surat.filename.clone()),
    );
    ctx.insert("attachment_links", Value::from_serialize(&links));
    ctx.insert("maps_url", Value::from(maps_url));

    render_template(POPUP_TEMPLATE, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ormas::models::OrmasStatus;
    use crate::shared::test_helpers::sample_ormas;
    use chrono::{TimeZone, Utc};

    fn no_urls(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_popup_shows_record_fields() {
        let mut record = sample_ormas(4, "Komunitas A", "Jl. Merdeka 1");
        record.lat = Some(-2.123456);
        record.lng = Some(119.987654);
        record.status = OrmasStatus::Inactive;
        record.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap());
        record.attachments.surat.filename = Some("keberadaan.pdf".to_string());

        let html = build_popup_html(&record, &no_urls).unwrap();

        assert!(html.contains("Komunitas A"));
        assert!(html.contains("Belum Aktif"));
        assert!(html.contains("Jl. Merdeka 1"));
        assert!(html.contains("Koordinat: -2.12346, 119.98765"));
        assert!(html.contains("Dibuat: 09/03/2024"));
        assert!(html.contains("Surat: keberadaan.pdf"));
        assert!(html.contains("Buka di Google Maps"));
        assert!(html.contains("query=-2.123456%2C119.987654"));
    }

    #[test]
    fn test_popup_links_only_slots_with_paths() {
        let mut record = sample_ormas(5, "Paguyuban", "Desa Sumber");
        record.attachments.sk.path = Some("public/ormas_surat/sk/5/1-sk.pdf".to_string());
        record.attachments.lokasi.path = Some("   ".to_string());

        let html = build_popup_html(&record, &|p: &str| Some(format!("https://cdn.test/{}", p))).unwrap();

        assert!(html.contains("Surat Keterangan (SK)"));
        assert!(html.contains("#2563eb"));
        assert!(!html.contains("Lokasi Ormas"));
        assert!(!html.contains("Surat Keberadaan"));
        // No coordinates, no external map link
        assert!(!html.contains("Buka di Google Maps"));
    }

    #[test]
    fn test_popup_escapes_names() {
        let record = sample_ormas(6, "<script>x</script>", "-");
        let html = build_popup_html(&record, &no_urls).unwrap();
        assert!(!html.contains("<script>"));
    }
}
