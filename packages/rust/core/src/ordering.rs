//! Ordering strategies applied between extraction and truncation.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use blogcards_shared::SortOrder;

use crate::extractor::ExtractedDocument;

/// Reorder `documents` in place according to `order`.
///
/// Sorting is stable and starts from lexical path order, so documents that
/// compare equal under `DeclaredDate` or `Modified` keep their path order.
pub fn order_documents(documents: &mut [ExtractedDocument], order: SortOrder) {
    documents.sort_by(|a, b| a.source.path.cmp(&b.source.path));

    match order {
        SortOrder::Lexical => {}
        SortOrder::DeclaredDate => documents.sort_by_cached_key(|d| {
            Reverse(d.frontmatter.date.as_deref().and_then(parse_declared_date))
        }),
        SortOrder::Modified => documents.sort_by_key(|d| Reverse(d.source.modified)),
    }
}

/// Best-effort reading of a frontmatter `date` for ordering.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC 3339. Anything else
/// is treated as undated.
pub fn parse_declared_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::testing::extracted;

    fn paths(docs: &[ExtractedDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.source.path.as_str()).collect()
    }

    #[test]
    fn parses_supported_formats() {
        assert!(parse_declared_date("2024-01-01").is_some());
        assert!(parse_declared_date(" 2024-01-01 ").is_some());
        assert!(parse_declared_date("2024-01-01 10:30:00").is_some());
        assert!(parse_declared_date("2024-01-01T10:30:00Z").is_some());
        assert!(parse_declared_date("January 1st").is_none());
    }

    #[test]
    fn rfc3339_offsets_are_normalized() {
        let a = parse_declared_date("2024-01-01T10:00:00+02:00").unwrap();
        let b = parse_declared_date("2024-01-01T08:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn lexical_is_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut docs = vec![
            extracted(dir.path(), "posts/b.md", &[]),
            extracted(dir.path(), "posts/a.md", &[]),
        ];
        order_documents(&mut docs, SortOrder::Lexical);
        assert_eq!(paths(&docs), vec!["posts/a.md", "posts/b.md"]);
    }

    #[test]
    fn declared_date_newest_first_undated_last() {
        let dir = tempfile::tempdir().unwrap();
        let mut docs = vec![
            extracted(dir.path(), "posts/a.md", &[("date", "2023-05-01")]),
            extracted(dir.path(), "posts/b.md", &[]),
            extracted(dir.path(), "posts/c.md", &[("date", "2024-02-01")]),
            extracted(dir.path(), "posts/d.md", &[("date", "not a date")]),
            extracted(dir.path(), "posts/e.md", &[("date", "2023-05-01")]),
        ];
        order_documents(&mut docs, SortOrder::DeclaredDate);
        assert_eq!(
            paths(&docs),
            vec!["posts/c.md", "posts/a.md", "posts/e.md", "posts/b.md", "posts/d.md"]
        );
    }

    #[test]
    fn modified_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        let mut docs = vec![
            extracted(dir.path(), "posts/a.md", &[]),
            extracted(dir.path(), "posts/b.md", &[]),
            extracted(dir.path(), "posts/c.md", &[]),
        ];
        docs[0].source.modified = Some(base);
        docs[1].source.modified = Some(base + Duration::from_secs(60));
        docs[2].source.modified = None;

        order_documents(&mut docs, SortOrder::Modified);
        assert_eq!(paths(&docs), vec!["posts/b.md", "posts/a.md", "posts/c.md"]);
    }
}
