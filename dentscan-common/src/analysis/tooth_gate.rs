//! Tooth-likeness gate
//!
//! Three independent signals, each a cheap scan over the image:
//! 1. Grid sample of bright, low-saturation pixels (`white_ratio`)
//! 2. Bounding box of the bright region relative to the frame (`box_area_ratio`)
//! 3. Canny edge density (`edge_ratio`)
//!
//! An image passes when at least two of the three conditions hold.
//!
//! `imageproc`'s Canny smooths with a Gaussian (sigma 1.4) and uses an L2
//! gradient, so on textured photos the edge ratio runs lower than an
//! unsmoothed L1 Canny would report at the same thresholds.

use std::path::Path;

use image::{GrayImage, RgbImage};
use imageproc::edges::canny;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::warn;

use super::{decode_image, to_gray};

/// Target number of grid samples along each axis
const GRID_DIVISIONS: u32 = 20;

/// Mean intensity above which a sampled pixel counts as white-ish
const WHITE_INTENSITY: f32 = 200.0;
/// Channel spread (max - min) below which a sampled pixel counts as unsaturated
const WHITE_MAX_SPREAD: u8 = 30;
/// Accepted open interval for the white-ish sample ratio
const WHITE_RATIO_RANGE: (f64, f64) = (0.01, 0.8);

/// Grayscale level above which a pixel belongs to the bright mask
const BRIGHT_THRESHOLD: u8 = 200;
/// Minimum bright bounding box area as a fraction of the image
const MIN_BOX_AREA_RATIO: f64 = 0.015;

const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;
/// Edge pixel fraction must stay below this
const MAX_EDGE_RATIO: f64 = 0.15;

/// Votes needed to accept
const REQUIRED_VOTES: usize = 2;

/// Raw gate metrics for one image
///
/// Serializes the three metrics together with the derived condition flags
/// and vote count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateReport {
    pub white_ratio: f64,
    pub box_area_ratio: f64,
    pub edge_ratio: f64,
}

impl GateReport {
    pub fn white_condition(&self) -> bool {
        WHITE_RATIO_RANGE.0 < self.white_ratio && self.white_ratio < WHITE_RATIO_RANGE.1
    }

    pub fn box_condition(&self) -> bool {
        self.box_area_ratio > MIN_BOX_AREA_RATIO
    }

    pub fn edge_condition(&self) -> bool {
        self.edge_ratio < MAX_EDGE_RATIO
    }

    /// Number of conditions that hold (0..=3)
    pub fn votes(&self) -> usize {
        [
            self.white_condition(),
            self.box_condition(),
            self.edge_condition(),
        ]
        .into_iter()
        .filter(|&c| c)
        .count()
    }

    /// Majority verdict
    pub fn is_tooth(&self) -> bool {
        self.votes() >= REQUIRED_VOTES
    }
}

impl Serialize for GateReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("GateReport", 7)?;
        s.serialize_field("white_ratio", &self.white_ratio)?;
        s.serialize_field("box_area_ratio", &self.box_area_ratio)?;
        s.serialize_field("edge_ratio", &self.edge_ratio)?;
        s.serialize_field("white_condition", &self.white_condition())?;
        s.serialize_field("box_condition", &self.box_condition())?;
        s.serialize_field("edge_condition", &self.edge_condition())?;
        s.serialize_field("votes", &self.votes())?;
        s.end()
    }
}

/// Compute all three gate metrics for a decoded image
///
/// A zero-area image yields all-zero metrics with the edge ratio forced
/// above its limit, so it can never pass.
pub fn assess_tooth_likeness(rgb: &RgbImage) -> GateReport {
    if rgb.width() == 0 || rgb.height() == 0 {
        return GateReport {
            white_ratio: 0.0,
            box_area_ratio: 0.0,
            edge_ratio: 1.0,
        };
    }

    let gray = to_gray(rgb);
    GateReport {
        white_ratio: white_ratio(rgb),
        box_area_ratio: bright_box_area_ratio(&gray),
        edge_ratio: edge_ratio(&gray),
    }
}

/// Decode `path` and run the gate; an unreadable file is not a tooth
pub fn is_tooth_image(path: &Path) -> bool {
    match decode_image(path) {
        Ok(image) => assess_tooth_likeness(&image.to_rgb8()).is_tooth(),
        Err(e) => {
            warn!("Tooth gate could not decode {}: {}", path.display(), e);
            false
        }
    }
}

/// Fraction of grid samples that are bright and unsaturated
///
/// Steps are `max(1, dim / 20)`, so small images are sampled densely and the
/// grid can exceed 20x20 when a dimension is not a multiple of the step.
pub fn white_ratio(rgb: &RgbImage) -> f64 {
    let (w, h) = rgb.dimensions();
    let step_x = (w / GRID_DIVISIONS).max(1) as usize;
    let step_y = (h / GRID_DIVISIONS).max(1) as usize;

    let mut white = 0usize;
    let mut total = 0usize;
    for x in (0..w).step_by(step_x) {
        for y in (0..h).step_by(step_y) {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let intensity = (r as f32 + g as f32 + b as f32) / 3.0;
            let spread = r.max(g).max(b) - r.min(g).min(b);
            total += 1;
            if intensity > WHITE_INTENSITY && spread < WHITE_MAX_SPREAD {
                white += 1;
            }
        }
    }

    if total == 0 {
        0.0
    } else {
        white as f64 / total as f64
    }
}

/// Area of the bounding box around pixels brighter than 200, over image area
pub fn bright_box_area_ratio(gray: &GrayImage) -> f64 {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    // (min_x, min_y, max_x, max_y), inclusive
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in gray.enumerate_pixels() {
        if p.0[0] > BRIGHT_THRESHOLD {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    match bounds {
        Some((x0, y0, x1, y1)) => {
            let box_area = (x1 - x0 + 1) as f64 * (y1 - y0 + 1) as f64;
            box_area / (w as f64 * h as f64)
        }
        None => 0.0,
    }
}

/// Fraction of pixels marked as edges by Canny (low 100, high 200)
pub fn edge_ratio(gray: &GrayImage) -> f64 {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let edges = canny(gray, CANNY_LOW, CANNY_HIGH);
    let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
    edge_pixels as f64 / total as f64
}
