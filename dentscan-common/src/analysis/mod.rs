//! Pixel heuristics for uploaded photos
//!
//! Two pure functions make up the engine:
//! - [`tooth_gate`]: is the image plausibly a tooth photo (2-of-3 vote)
//! - [`severity`]: dark-pixel ratio mapped to a severity category
//!
//! [`analyze_file`] decodes an upload once and runs both in order.

pub mod severity;
pub mod tooth_gate;

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, Luma, RgbImage};
use tracing::{debug, warn};

use crate::{RecommendationTable, Result};

pub use severity::{detect_infection, estimate_severity, ClassificationResult, SeverityCategory};
pub use tooth_gate::{assess_tooth_likeness, is_tooth_image, GateReport};

/// Result of running the full pipeline on one upload
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Gate rejected the image. `report` is `None` when decoding failed.
    Rejected { report: Option<GateReport> },
    /// Gate accepted the image and severity was estimated
    Classified {
        report: GateReport,
        result: ClassificationResult,
    },
}

/// Decode an image file, sniffing the format from its content
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image)
}

/// Decode once, run the tooth gate, then the severity estimator if accepted
pub fn analyze_file(path: &Path, table: &RecommendationTable) -> Outcome {
    let image = match decode_image(path) {
        Ok(image) => image,
        Err(e) => {
            warn!("Could not decode {}: {}", path.display(), e);
            return Outcome::Rejected { report: None };
        }
    };

    let report = assess_tooth_likeness(&image.to_rgb8());
    debug!(
        path = %path.display(),
        white_ratio = report.white_ratio,
        box_area_ratio = report.box_area_ratio,
        edge_ratio = report.edge_ratio,
        votes = report.votes(),
        "Tooth gate metrics"
    );
    if !report.is_tooth() {
        return Outcome::Rejected {
            report: Some(report),
        };
    }

    match estimate_severity(&image, table) {
        Ok(result) => Outcome::Classified { report, result },
        Err(e) => {
            warn!("Severity estimation failed for {}: {}", path.display(), e);
            Outcome::Rejected {
                report: Some(report),
            }
        }
    }
}

/// ITU-R BT.601 luma, rounded to the nearest integer
pub(crate) fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Convert RGB to grayscale with [`luma_bt601`]
pub fn to_gray(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        Luma([luma_bt601(p.0[0], p.0[1], p.0[2])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_png(dir: &Path, name: &str, image: &RgbImage) -> std::path::PathBuf {
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    /// Mid-gray field with a centred white square covering a quarter of it
    fn tooth_like(background: u8) -> RgbImage {
        RgbImage::from_fn(100, 100, |x, y| {
            if (25..75).contains(&x) && (25..75).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([background; 3])
            }
        })
    }

    #[test]
    fn luma_matches_reference_weights() {
        assert_eq!(luma_bt601(0, 0, 0), 0);
        assert_eq!(luma_bt601(255, 255, 255), 255);
        assert_eq!(luma_bt601(255, 0, 0), 76);
        assert_eq!(luma_bt601(0, 255, 0), 150);
        assert_eq!(luma_bt601(0, 0, 255), 29);
    }

    #[test]
    fn undecodable_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let outcome = analyze_file(&path, &RecommendationTable::default());
        assert_eq!(outcome, Outcome::Rejected { report: None });
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = analyze_file(&dir.path().join("nope.png"), &RecommendationTable::default());
        assert_eq!(outcome, Outcome::Rejected { report: None });
    }

    #[test]
    fn uniform_gray_is_rejected_with_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "gray.png", &RgbImage::from_pixel(64, 64, Rgb([128; 3])));

        match analyze_file(&path, &RecommendationTable::default()) {
            Outcome::Rejected { report: Some(report) } => assert_eq!(report.votes(), 1),
            other => panic!("expected rejection with report, got {:?}", other),
        }
    }

    #[test]
    fn tooth_like_image_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "tooth.png", &tooth_like(100));
        let table: RecommendationTable = [("abscess", "See a dentist today")].into_iter().collect();

        match analyze_file(&path, &table) {
            Outcome::Classified { report, result } => {
                assert!(report.is_tooth());
                assert_eq!(result.category, SeverityCategory::Abscess);
                assert_eq!(result.severity, 75.0);
                assert_eq!(result.recommendation, "See a dentist today");
            }
            other => panic!("expected classification, got {:?}", other),
        }
    }

    #[test]
    fn format_is_sniffed_from_content() {
        // PNG bytes behind a .jpg name still decode
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "tooth.png", &tooth_like(100));
        let renamed = dir.path().join("tooth.jpg");
        std::fs::rename(&png, &renamed).unwrap();

        assert!(decode_image(&renamed).is_ok());
    }
}
