//! Severity estimator
//!
//! Damage is the percentage of pixels whose luminance is below 128, rounded
//! to two decimals, and is bucketed into six fixed categories.

use std::fmt;
use std::path::Path;

use image::DynamicImage;
use serde::{Serialize, Serializer};

use super::{decode_image, luma_bt601};
use crate::{Error, RecommendationTable, Result};

/// Luminance below which a pixel counts as dark
const DARK_THRESHOLD: u8 = 128;

/// Severity bucket assigned from the damage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityCategory {
    Healthy,
    Cavities,
    EnamelErosion,
    GumInfection,
    Abscess,
    PeriodontalDisease,
}

impl SeverityCategory {
    pub const ALL: [SeverityCategory; 6] = [
        SeverityCategory::Healthy,
        SeverityCategory::Cavities,
        SeverityCategory::EnamelErosion,
        SeverityCategory::GumInfection,
        SeverityCategory::Abscess,
        SeverityCategory::PeriodontalDisease,
    ];

    /// Map a damage percentage to its bucket
    ///
    /// Lower bounds are inclusive: 10.0 is `Cavities`, not `Healthy`.
    pub fn from_damage(damage: f64) -> Self {
        if damage < 10.0 {
            SeverityCategory::Healthy
        } else if damage < 30.0 {
            SeverityCategory::Cavities
        } else if damage < 50.0 {
            SeverityCategory::EnamelErosion
        } else if damage < 70.0 {
            SeverityCategory::GumInfection
        } else if damage < 90.0 {
            SeverityCategory::Abscess
        } else {
            SeverityCategory::PeriodontalDisease
        }
    }

    /// Display label, also the recommendation table key
    pub fn label(&self) -> &'static str {
        match self {
            SeverityCategory::Healthy => "healthy",
            SeverityCategory::Cavities => "cavities",
            SeverityCategory::EnamelErosion => "enamel erosion",
            SeverityCategory::GumInfection => "gum infection",
            SeverityCategory::Abscess => "abscess",
            SeverityCategory::PeriodontalDisease => "periodontal disease",
        }
    }
}

impl fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SeverityCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Category, damage percentage and advice for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: SeverityCategory,
    /// Damage percentage in [0, 100], two decimals
    pub severity: f64,
    pub recommendation: String,
}

/// Percentage of dark pixels, rounded to two decimals
pub fn damage_percentage(image: &DynamicImage) -> Result<f64> {
    let rgb = image.to_rgb8();
    let total = rgb.width() as u64 * rgb.height() as u64;
    if total == 0 {
        return Err(Error::InvalidInput("image has no pixels".to_string()));
    }

    let dark = rgb
        .pixels()
        .filter(|p| luma_bt601(p.0[0], p.0[1], p.0[2]) < DARK_THRESHOLD)
        .count() as u64;

    let percent = dark as f64 * 100.0 / total as f64;
    Ok((percent * 100.0).round() / 100.0)
}

/// Estimate severity for a decoded image
pub fn estimate_severity(
    image: &DynamicImage,
    table: &RecommendationTable,
) -> Result<ClassificationResult> {
    let severity = damage_percentage(image)?;
    let category = SeverityCategory::from_damage(severity);
    Ok(ClassificationResult {
        category,
        severity,
        recommendation: table.recommendation_for(category.label()).to_string(),
    })
}

/// Decode `path` and estimate severity
pub fn detect_infection(path: &Path, table: &RecommendationTable) -> Result<ClassificationResult> {
    let image = decode_image(path)?;
    estimate_severity(&image, table)
}
