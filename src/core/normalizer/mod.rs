//! # Normalizer Module
//!
//! Turns a raw tag set into a typed [`PhotoRecord`].
//!
//! ## Tolerance
//! Every field is independently optional: a missing or malformed tag leaves
//! that one field absent and produces a [`ParseWarning`], never an error.
//! The warnings travel with the result so a run can be inspected without
//! grepping logs.
//!
//! ## Extracted Fields
//! - Capture time (DateTimeOriginal)
//! - Maker, camera model, lens model
//! - Aperture, ISO
//! - Focal length, stored in hundredths of a millimeter so phone lenses
//!   (3.99mm and friends) survive aggregation without float drift
//! - Derived 35mm-equivalent focal length
//!
//! The FocalLength35efl tag some cameras report is never read - it cannot
//! be trusted on several models. The equivalent is always recomputed from
//! the physical focal length and the crop-factor rules.

use crate::core::crop::CropFactorResolver;
use crate::core::extractor::RawTagSet;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TAG_DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";
const TAG_MAKE: &str = "Make";
const TAG_MODEL: &str = "Model";
const TAG_LENS_MODEL: &str = "LensModel";
const TAG_APERTURE: &str = "Aperture";
const TAG_FOCAL_LENGTH: &str = "FocalLength";
const TAG_ISO: &str = "ISO";

/// EXIF date format, e.g. `2023:07:14 18:03:21`
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// One normalized photo record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Path of the scanned file
    pub path: PathBuf,
    /// Original capture date/time
    pub captured_at: Option<DateTime<Utc>>,
    /// Camera maker (e.g., "FUJIFILM", "Apple")
    pub maker: Option<String>,
    /// Camera model (e.g., "X-T4", "iPhone 13 Pro")
    pub camera_model: Option<String>,
    /// Lens model
    pub lens_model: Option<String>,
    /// Aperture f-number
    pub aperture: Option<f64>,
    /// Physical focal length, hundredths of a millimeter
    pub focal_length_x100: Option<i64>,
    /// ISO sensitivity
    pub iso: Option<u32>,
    /// Derived 35mm-equivalent focal length, hundredths of a millimeter.
    /// Present only when both the focal length and the camera model are.
    pub focal_length_35mm_x100: Option<i64>,
}

impl PhotoRecord {
    /// A record for a file that yielded no usable tags
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            captured_at: None,
            maker: None,
            camera_model: None,
            lens_model: None,
            aperture: None,
            focal_length_x100: None,
            iso: None,
            focal_length_35mm_x100: None,
        }
    }

    /// Check if any metadata was extracted
    pub fn has_data(&self) -> bool {
        self.captured_at.is_some()
            || self.maker.is_some()
            || self.camera_model.is_some()
            || self.lens_model.is_some()
            || self.aperture.is_some()
            || self.focal_length_x100.is_some()
            || self.iso.is_some()
    }

    /// Get a display string for the camera
    pub fn camera_display(&self) -> Option<String> {
        match (&self.maker, &self.camera_model) {
            (Some(make), Some(model)) => {
                // Avoid duplication like "Apple Apple iPhone"
                if model.starts_with(make.as_str()) {
                    Some(model.clone())
                } else {
                    Some(format!("{} {}", make, model))
                }
            }
            (None, Some(model)) => Some(model.clone()),
            (Some(make), None) => Some(make.clone()),
            (None, None) => None,
        }
    }
}

/// The tag a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagField {
    CapturedAt,
    Aperture,
    FocalLength,
    Iso,
}

impl std::fmt::Display for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagField::CapturedAt => write!(f, "{}", TAG_DATE_TIME_ORIGINAL),
            TagField::Aperture => write!(f, "{}", TAG_APERTURE),
            TagField::FocalLength => write!(f, "{}", TAG_FOCAL_LENGTH),
            TagField::Iso => write!(f, "{}", TAG_ISO),
        }
    }
}

/// A tag value that was present but could not be parsed.
///
/// The field it belongs to is left absent; the warning records what was
/// seen and why it was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseWarning {
    /// File the tag came from
    pub path: PathBuf,
    /// Which field failed
    pub field: TagField,
    /// The raw value as reported by the extractor
    pub value: String,
    /// Why it was rejected
    pub reason: String,
}

/// Result of normalizing one file's tag set
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub record: PhotoRecord,
    pub warnings: Vec<ParseWarning>,
    /// Set when the camera model had no crop-factor rule and the neutral
    /// factor was applied
    pub unknown_model: Option<String>,
}

/// Converts raw tag sets into photo records
pub struct TagNormalizer {
    resolver: CropFactorResolver,
}

impl TagNormalizer {
    /// Create a normalizer with an injected crop-factor resolver
    pub fn new(resolver: CropFactorResolver) -> Self {
        Self { resolver }
    }

    /// Normalize one file's raw tags.
    ///
    /// Never fails: missing and malformed tags degrade to absent fields.
    pub fn normalize(&self, path: &Path, tags: &RawTagSet) -> NormalizedRecord {
        let mut record = PhotoRecord::empty(path);
        let mut warnings = Vec::new();

        if let Some(value) = tags.get(TAG_DATE_TIME_ORIGINAL) {
            let text = coerce_string(value);
            match NaiveDateTime::parse_from_str(&text, EXIF_DATE_FORMAT) {
                Ok(naive) => {
                    record.captured_at = Some(DateTime::from_naive_utc_and_offset(naive, Utc));
                }
                Err(e) => warnings.push(ParseWarning {
                    path: path.to_path_buf(),
                    field: TagField::CapturedAt,
                    value: text,
                    reason: e.to_string(),
                }),
            }
        }

        record.maker = tags.get(TAG_MAKE).map(coerce_string);
        record.camera_model = tags.get(TAG_MODEL).map(coerce_string);
        record.lens_model = tags.get(TAG_LENS_MODEL).map(coerce_string);

        if let Some(value) = tags.get(TAG_APERTURE) {
            match parse_f64(value) {
                Some(f) if f.is_finite() && f > 0.0 => record.aperture = Some(f),
                _ => warnings.push(ParseWarning {
                    path: path.to_path_buf(),
                    field: TagField::Aperture,
                    value: coerce_string(value),
                    reason: "not a positive f-number".to_string(),
                }),
            }
        }

        if let Some(value) = tags.get(TAG_FOCAL_LENGTH) {
            match parse_focal_length_x100(value) {
                Some(x100) => record.focal_length_x100 = Some(x100),
                None => warnings.push(ParseWarning {
                    path: path.to_path_buf(),
                    field: TagField::FocalLength,
                    value: coerce_string(value),
                    reason: "no leading focal length in millimeters".to_string(),
                }),
            }
        }

        if let Some(value) = tags.get(TAG_ISO) {
            match parse_u32(value) {
                Some(iso) if iso > 0 => record.iso = Some(iso),
                _ => warnings.push(ParseWarning {
                    path: path.to_path_buf(),
                    field: TagField::Iso,
                    value: coerce_string(value),
                    reason: "not a positive integer".to_string(),
                }),
            }
        }

        let mut unknown_model = None;
        if let (Some(x100), Some(model)) = (record.focal_length_x100, &record.camera_model) {
            let factor = match self.resolver.lookup(model) {
                Some(factor) => factor,
                None => {
                    unknown_model = Some(model.clone());
                    self.resolver.resolve(model)
                }
            };
            record.focal_length_35mm_x100 = Some(crate::core::crop::to_35mm_equivalent(x100, factor));
        }

        NormalizedRecord {
            record,
            warnings,
            unknown_model,
        }
    }
}

/// String form of a raw tag value: JSON strings verbatim, scalars via
/// their display form
fn coerce_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_u32(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a focal length like `"70.0 mm"` (or a bare number of millimeters)
/// into hundredths of a millimeter.
fn parse_focal_length_x100(value: &serde_json::Value) -> Option<i64> {
    let millimeters = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => {
            let token = s.trim().split_whitespace().next()?;
            token.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if !millimeters.is_finite() || millimeters <= 0.0 {
        return None;
    }

    Some((millimeters * 100.0).round() as i64)
}
