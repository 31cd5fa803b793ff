use crate::features::ormas::models::Ormas;

/// Whether `record` matches an already trimmed, lowercased query: substring of
/// name or address (case-insensitive) or of the id's decimal form.
pub fn matches(record: &Ormas, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.address.to_lowercase().contains(needle)
        || record.id.to_string().contains(needle)
}

/// Keep the records matching `query`; a blank or absent query keeps all
pub fn filter_records(records: Vec<Ormas>, query: Option<&str>) -> Vec<Ormas> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    if needle.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| matches(r, &needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_ormas;

    #[test]
    fn test_filter_by_name_address_and_id() {
        let records = vec![
            sample_ormas(7, "Komunitas Pemuda", "Jl. Merdeka 1"),
            sample_ormas(12, "Paguyuban Tani", "Desa Sumber"),
            sample_ormas(120, "Karang Taruna", "Jl. Sudirman"),
        ];

        let ids = |q: &str| -> Vec<i64> {
            filter_records(records.clone(), Some(q))
                .iter()
                .map(|r| r.id)
                .collect()
        };

        assert_eq!(ids("  PEMUDA "), vec![7]);
        assert_eq!(ids("jl."), vec![7, 120]);
        assert_eq!(ids("12"), vec![12, 120]);
        assert_eq!(ids("nothing"), Vec::<i64>::new());
        assert_eq!(filter_records(records.clone(), Some("   ")).len(), 3);
        assert_eq!(filter_records(records, None).len(), 3);
    }
}
