//! Tests for recommendation table loading and lookup

use dentscan_common::recommendations::{RecommendationTable, FALLBACK_RECOMMENDATION};
use dentscan_common::{Error, SeverityCategory};
use std::io::Write;

fn write_table(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_round_trip_exact_case() {
    let file = write_table("Healthy: Brush twice daily\n");
    let table = RecommendationTable::load(file.path()).unwrap();

    assert_eq!(table.get("Healthy"), Some("Brush twice daily"));
    assert_eq!(table.get("healthy"), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_line_without_colon_is_skipped() {
    let table = RecommendationTable::parse("this line has no separator\ncavities: Book a filling\n\n");

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("cavities"), Some("Book a filling"));
    assert_eq!(table.get("this line has no separator"), None);
}

#[test]
fn test_split_on_first_colon_only() {
    let table = RecommendationTable::parse("abscess: Urgent: see a dentist within 24h");
    assert_eq!(table.get("abscess"), Some("Urgent: see a dentist within 24h"));
}

#[test]
fn test_whitespace_is_trimmed() {
    let table = RecommendationTable::parse("   gum infection   :   Rinse with salt water   \r\n");
    assert_eq!(table.get("gum infection"), Some("Rinse with salt water"));
}

#[test]
fn test_later_duplicates_win() {
    let table = RecommendationTable::parse("healthy: first\nhealthy: second\n");
    assert_eq!(table.get("healthy"), Some("second"));
}

#[test]
fn test_absent_category_returns_fallback_verbatim() {
    let table = RecommendationTable::parse("healthy: Keep it up\n");
    assert_eq!(table.recommendation_for("abscess"), FALLBACK_RECOMMENDATION);
    assert_eq!(table.recommendation_for("abscess"), "No recommendation available.");
}

#[test]
fn test_extra_categories_are_stored() {
    let table = RecommendationTable::parse("healthy: ok\nwisdom teeth: Monitor eruption\n");
    assert_eq!(table.get("wisdom teeth"), Some("Monitor eruption"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = RecommendationTable::load(&dir.path().join("infection_types.txt"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_shipped_table_covers_every_category() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../dentscan-web/data/infection_types.txt");
    let table = RecommendationTable::load(&path).unwrap();

    for category in SeverityCategory::ALL {
        assert!(
            table.get(category.label()).is_some(),
            "no recommendation for {}",
            category
        );
    }
}
