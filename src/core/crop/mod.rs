//! # Crop Module
//!
//! Maps camera model strings to sensor crop factors and corrects physical
//! focal lengths to their 35mm equivalent.
//!
//! ## Why not the vendor tag?
//! Some cameras embed a pre-corrected 35mm-equivalent focal length of their
//! own, and on several models it is wrong. The pipeline never reads that
//! tag; the equivalent is always recomputed from the physical focal length
//! and the rule table here.

use regex::Regex;

/// Factor applied when no rule matches a camera model
pub const DEFAULT_CROP_FACTOR: f64 = 1.0;

/// One ordered rule: a pattern over camera-model strings and the crop
/// factor of the matching sensor
#[derive(Debug, Clone)]
pub struct CropFactorRule {
    pattern: Regex,
    factor: f64,
}

impl CropFactorRule {
    /// Build a rule from a regex pattern.
    ///
    /// The pattern is searched anywhere in the model string, so
    /// `GR DIGITAL \d+` matches `RICOH GR DIGITAL 3`.
    pub fn new(pattern: &str, factor: f64) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            factor,
        })
    }

    fn matches(&self, model: &str) -> bool {
        self.pattern.is_match(model)
    }
}

/// Resolves camera models to crop factors through an ordered rule list.
///
/// The rule list is fixed at construction; first match wins.
pub struct CropFactorResolver {
    rules: Vec<CropFactorRule>,
}

impl CropFactorResolver {
    /// Create a resolver with a custom rule list
    pub fn new(rules: Vec<CropFactorRule>) -> Self {
        Self { rules }
    }

    /// Create a resolver with the built-in rule table
    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// Return the factor of the first matching rule, if any
    pub fn lookup(&self, model: &str) -> Option<f64> {
        self.rules
            .iter()
            .find(|rule| rule.matches(model))
            .map(|rule| rule.factor)
    }

    /// Return the crop factor for a model, falling back to
    /// [`DEFAULT_CROP_FACTOR`] for unrecognized models.
    ///
    /// An unrecognized model is expected as the device lineup grows; it is
    /// logged once per call, not treated as an error.
    pub fn resolve(&self, model: &str) -> f64 {
        match self.lookup(model) {
            Some(factor) => factor,
            None => {
                tracing::warn!(model, "unknown crop factor for camera model, using 1.0");
                DEFAULT_CROP_FACTOR
            }
        }
    }
}

impl Default for CropFactorResolver {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// The built-in rule table, in evaluation order.
///
/// Add new camera models here as the library grows.
pub fn default_rules() -> Vec<CropFactorRule> {
    let table: &[(&str, f64)] = &[
        // APS-C
        (r"X-T\d+", 1.5),
        (r"Sony A6\d+", 1.5),
        // Micro Four Thirds
        (r"Panasonic GH5", 2.0),
        // iPhone main camera
        (r"iPhone 13 Pro", 4.56),
        // Ricoh GR Digital compacts
        (r"GR DIGITAL \d+", 4.5),
    ];

    table
        .iter()
        .map(|(pattern, factor)| {
            CropFactorRule::new(pattern, *factor).expect("built-in rule pattern is valid")
        })
        .collect()
}

/// Convert a physical focal length to its 35mm equivalent.
///
/// Both values are in hundredths of a millimeter; the multiply happens in
/// f64 and is rounded back to the fixed-point representation once.
pub fn to_35mm_equivalent(focal_length_x100: i64, crop_factor: f64) -> i64 {
    (focal_length_x100 as f64 * crop_factor).round() as i64
}
