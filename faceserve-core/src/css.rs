//! `@font-face` synthesis

use std::sync::Arc;

use crate::index::FontRecord;
use crate::weight::infer_weight;

/// Render the single-line `@font-face` block for one font.
///
/// Pure: the output depends only on the record. Italics are not separately
/// modeled, so `font-style` is always `normal`.
pub fn font_face_css(record: &FontRecord) -> String {
    let weight = infer_weight(&record.subfamily_name, &record.full_name);
    let ext = record.format.extension();
    format!(
        "@font-face {{ font-family: '{}'; font-style: normal; font-weight: {}; src: local('{}'), url({}.{}) format('{}'); }}",
        record.family_name, weight, record.full_name, record.unique_id, ext, ext
    )
}

/// One block per family member, each terminated by a newline. `None` when
/// the family has no members.
pub fn family_css(records: &[Arc<FontRecord>]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut css = String::new();
    for record in records {
        css.push_str(&font_face_css(record));
        css.push('\n');
    }
    Some(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FontFormat;
    use std::path::PathBuf;

    fn record(full: &str, family: &str, subfamily: &str, id: &str) -> FontRecord {
        FontRecord {
            path: PathBuf::from(format!("/fonts/{full}.ttf")),
            format: FontFormat::Ttf,
            full_name: full.to_string(),
            family_name: family.to_string(),
            subfamily_name: subfamily.to_string(),
            copyright: String::new(),
            unique_id: id.to_string(),
            content_hash: String::new(),
        }
    }

    #[test]
    fn synthesizes_single_line_block() {
        let record = record(
            "Acme Sans SemiBold",
            "Acme Sans",
            "SemiBold",
            "Acme Sans SemiBold",
        );
        let css = font_face_css(&record);

        assert!(!css.contains('\n'));
        assert_eq!(css.matches("font-weight").count(), 1);
        assert!(css.contains("font-family: 'Acme Sans';"));
        assert!(css.contains("font-style: normal;"));
        assert!(css.contains("font-weight: 600;"));
        assert!(css.contains("local('Acme Sans SemiBold')"));
        assert!(css.contains("url(Acme Sans SemiBold.ttf) format('ttf')"));
    }

    #[test]
    fn url_uses_the_unique_id_and_own_format() {
        let mut woff = record("Acme Sans", "Acme Sans", "Regular", "d34db33f");
        woff.format = FontFormat::Woff;
        let css = font_face_css(&woff);

        assert!(css.contains("url(d34db33f.woff) format('woff')"));
    }

    #[test]
    fn family_css_concatenates_newline_terminated_blocks() {
        let members = vec![
            Arc::new(record("Acme Sans", "Acme Sans", "Regular", "a")),
            Arc::new(record("Acme Sans Bold", "Acme Sans", "Bold", "b")),
        ];
        let css = family_css(&members).expect("family css");

        assert_eq!(css.lines().count(), 2);
        assert!(css.ends_with('\n'));
        assert!(css.contains("font-weight: 400;"));
        assert!(css.contains("font-weight: 700;"));
    }

    #[test]
    fn empty_family_yields_none() {
        assert!(family_css(&[]).is_none());
    }
}
