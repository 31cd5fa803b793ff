use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of characters that are not allowed in an object key file name.
    /// ASCII word characters, dots and hyphens survive; everything else collapses to `_`.
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]+").unwrap();
}

/// Make a user supplied file name safe for use inside a storage object key
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_keeps_safe_names() {
        assert_eq!(sanitize_filename("surat-1.pdf"), "surat-1.pdf");
        assert_eq!(sanitize_filename("SK_2024.PDF"), "SK_2024.PDF");
    }

    #[test]
    fn test_sanitize_filename_collapses_runs() {
        assert_eq!(sanitize_filename("surat keberadaan (final).pdf"), "surat_keberadaan_final_.pdf");
        assert_eq!(sanitize_filename("a  /\\ b.png"), "a_b.png");
        assert_eq!(sanitize_filename("struktur-pengurus-é.jpg"), "struktur-pengurus-_.jpg");
    }
}
