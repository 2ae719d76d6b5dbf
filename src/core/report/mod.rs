//! # Report Module
//!
//! Aggregates the record set into shooting-habit summaries.
//!
//! ## Summaries
//! 1. Top cameras by shot count (maker-prefixed display names)
//! 2. Top lenses by shot count
//! 3. Focal-length distribution, on the 35mm-equivalent axis
//! 4. ISO distribution
//! 5. Monthly shot counts per camera
//! 6. Monthly shot counts per lens
//!
//! Chart drawing is deliberately out of scope; these are the tables a
//! plotting frontend (or a pair of eyes on the terminal) consumes.
//! A record missing the field an aggregate needs is excluded from that
//! aggregate only.

mod export;

pub use export::export_csv;

use crate::core::collector::PhotoRecordSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width of a focal-length histogram bucket, in millimeters
const FOCAL_LENGTH_BUCKET_MM: i64 = 5;

/// A labeled count, used for the top-camera and top-lens rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

/// One focal-length histogram bucket, `lower_mm <= x < upper_mm`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocalLengthBucket {
    pub lower_mm: i64,
    pub upper_mm: i64,
    pub count: usize,
}

/// Shot count for one ISO value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoEntry {
    pub iso: u32,
    pub count: usize,
}

/// Shot count for one (month, camera-or-lens) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    /// Month in `YYYY-MM` form
    pub month: String,
    pub label: String,
    pub count: usize,
}

/// The full set of shooting-habit summaries for one record set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryReport {
    /// Records the report was built from
    pub total_records: usize,
    pub top_cameras: Vec<CountEntry>,
    pub top_lenses: Vec<CountEntry>,
    pub focal_length_histogram: Vec<FocalLengthBucket>,
    pub iso_distribution: Vec<IsoEntry>,
    pub monthly_by_camera: Vec<TrendEntry>,
    pub monthly_by_lens: Vec<TrendEntry>,
}

impl LibraryReport {
    /// Build every summary over the record set, keeping the `top_n`
    /// busiest cameras and lenses
    pub fn from_records(records: &PhotoRecordSet, top_n: usize) -> Self {
        Self {
            total_records: records.len(),
            top_cameras: ranked_counts(
                records.iter().filter_map(|r| r.camera_display()),
                top_n,
            ),
            top_lenses: ranked_counts(
                records.iter().filter_map(|r| r.lens_model.clone()),
                top_n,
            ),
            focal_length_histogram: focal_length_histogram(records),
            iso_distribution: iso_distribution(records),
            monthly_by_camera: monthly_trend(records, |r| r.camera_display()),
            monthly_by_lens: monthly_trend(records, |r| r.lens_model.clone()),
        }
    }
}

/// Count labels and keep the `top_n` largest, busiest first.
/// Ties break alphabetically so output is deterministic.
fn ranked_counts(labels: impl Iterator<Item = String>, top_n: usize) -> Vec<CountEntry> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry { label, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries.truncate(top_n);
    entries
}

/// Histogram over focal lengths, preferring the 35mm-equivalent value so
/// different sensors share one axis; records that got no correction fall
/// back to the physical focal length.
fn focal_length_histogram(records: &PhotoRecordSet) -> Vec<FocalLengthBucket> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for record in records {
        let x100 = match record.focal_length_35mm_x100.or(record.focal_length_x100) {
            Some(x100) => x100,
            None => continue,
        };
        // 1819 (18.19mm) lands in the 15-20mm bucket
        let millimeters = x100 / 100;
        let lower = (millimeters / FOCAL_LENGTH_BUCKET_MM) * FOCAL_LENGTH_BUCKET_MM;
        *counts.entry(lower).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(lower_mm, count)| FocalLengthBucket {
            lower_mm,
            upper_mm: lower_mm + FOCAL_LENGTH_BUCKET_MM,
            count,
        })
        .collect()
}

fn iso_distribution(records: &PhotoRecordSet) -> Vec<IsoEntry> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        if let Some(iso) = record.iso {
            *counts.entry(iso).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(iso, count)| IsoEntry { iso, count })
        .collect()
}

/// Shot counts grouped by capture month and a record label; records
/// missing either the timestamp or the label are excluded
fn monthly_trend(
    records: &PhotoRecordSet,
    label: impl Fn(&crate::core::normalizer::PhotoRecord) -> Option<String>,
) -> Vec<TrendEntry> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();

    for record in records {
        let (captured_at, label) = match (record.captured_at, label(record)) {
            (Some(captured_at), Some(label)) => (captured_at, label),
            _ => continue,
        };
        let month = captured_at.format("%Y-%m").to_string();
        *counts.entry((month, label)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((month, label), count)| TrendEntry {
            month,
            label,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::PhotoRecord;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    fn record(
        maker: Option<&str>,
        model: Option<&str>,
        lens: Option<&str>,
    ) -> PhotoRecord {
        let mut r = PhotoRecord::empty(Path::new("/lib/p.jpeg"));
        r.maker = maker.map(str::to_string);
        r.camera_model = model.map(str::to_string);
        r.lens_model = lens.map(str::to_string);
        r
    }

    #[test]
    fn top_cameras_ranks_by_count() {
        let records = PhotoRecordSet::from_records(vec![
            record(Some("FUJIFILM"), Some("X-T4"), None),
            record(Some("FUJIFILM"), Some("X-T4"), None),
            record(Some("Apple"), Some("iPhone 13 Pro"), None),
        ]);

        let report = LibraryReport::from_records(&records, 15);

        assert_eq!(report.top_cameras.len(), 2);
        assert_eq!(report.top_cameras[0].label, "FUJIFILM X-T4");
        assert_eq!(report.top_cameras[0].count, 2);
        assert_eq!(report.top_cameras[1].label, "Apple iPhone 13 Pro");
    }

    #[test]
    fn top_n_truncates_the_ranking() {
        let records = PhotoRecordSet::from_records(vec![
            record(None, Some("A"), None),
            record(None, Some("B"), None),
            record(None, Some("C"), None),
        ]);

        let report = LibraryReport::from_records(&records, 2);

        assert_eq!(report.top_cameras.len(), 2);
    }

    #[test]
    fn records_without_camera_are_excluded_from_camera_ranking() {
        let records = PhotoRecordSet::from_records(vec![
            record(None, None, Some("XF23mmF1.4 R")),
            record(None, Some("X-T4"), None),
        ]);

        let report = LibraryReport::from_records(&records, 15);

        assert_eq!(report.top_cameras.len(), 1);
        assert_eq!(report.top_lenses.len(), 1);
        assert_eq!(report.top_lenses[0].label, "XF23mmF1.4 R");
    }

    #[test]
    fn focal_length_histogram_prefers_equivalent_axis() {
        let mut phone = record(Some("Apple"), Some("iPhone 13 Pro"), None);
        phone.focal_length_x100 = Some(399);
        phone.focal_length_35mm_x100 = Some(1819);

        let mut uncorrected = record(None, None, None);
        uncorrected.focal_length_x100 = Some(2300);

        let records = PhotoRecordSet::from_records(vec![phone, uncorrected]);
        let report = LibraryReport::from_records(&records, 15);

        // 18.19mm -> 15-20 bucket, 23.00mm -> 20-25 bucket
        assert_eq!(
            report.focal_length_histogram,
            vec![
                FocalLengthBucket {
                    lower_mm: 15,
                    upper_mm: 20,
                    count: 1
                },
                FocalLengthBucket {
                    lower_mm: 20,
                    upper_mm: 25,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn iso_distribution_is_ascending() {
        let mut a = record(None, None, None);
        a.iso = Some(1600);
        let mut b = record(None, None, None);
        b.iso = Some(400);
        let mut c = record(None, None, None);
        c.iso = Some(400);

        let records = PhotoRecordSet::from_records(vec![a, b, c]);
        let report = LibraryReport::from_records(&records, 15);

        assert_eq!(
            report.iso_distribution,
            vec![
                IsoEntry {
                    iso: 400,
                    count: 2
                },
                IsoEntry {
                    iso: 1600,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn monthly_trend_groups_by_month_and_camera() {
        let mut july = record(Some("FUJIFILM"), Some("X-T4"), None);
        july.captured_at = Some(Utc.with_ymd_and_hms(2023, 7, 14, 12, 0, 0).unwrap());
        let mut july_again = record(Some("FUJIFILM"), Some("X-T4"), None);
        july_again.captured_at = Some(Utc.with_ymd_and_hms(2023, 7, 20, 12, 0, 0).unwrap());
        let mut august = record(Some("FUJIFILM"), Some("X-T4"), None);
        august.captured_at = Some(Utc.with_ymd_and_hms(2023, 8, 1, 12, 0, 0).unwrap());

        let records = PhotoRecordSet::from_records(vec![july, july_again, august]);
        let report = LibraryReport::from_records(&records, 15);

        assert_eq!(
            report.monthly_by_camera,
            vec![
                TrendEntry {
                    month: "2023-07".to_string(),
                    label: "FUJIFILM X-T4".to_string(),
                    count: 2
                },
                TrendEntry {
                    month: "2023-08".to_string(),
                    label: "FUJIFILM X-T4".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn undated_records_are_excluded_from_trends() {
        let records =
            PhotoRecordSet::from_records(vec![record(Some("FUJIFILM"), Some("X-T4"), None)]);
        let report = LibraryReport::from_records(&records, 15);

        assert!(report.monthly_by_camera.is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let records = PhotoRecordSet::from_records(vec![record(None, Some("X-T4"), None)]);
        let report = LibraryReport::from_records(&records, 15);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("top_cameras"));
        assert!(json.contains("X-T4"));
    }
}
