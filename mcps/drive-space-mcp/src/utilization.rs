//! Disk utilization computation
//!
//! Turns raw disk samples into whole-MB sizes and a two-decimal utilization
//! percentage, recording a human-readable log as it goes. Unreadable samples
//! and zero-sized disks become the zero row `(0, 0, 0.0)` rather than errors.

use crate::types::{DiskSample, Log, Utilization, UtilizationReport};

pub const NO_READABLE_INFORMATION: &str = "No readable Information";
pub const ZERO_SIZE_DISK: &str = "Disk size reported as 0 MB, utilization not computed";
pub const SEPARATOR: &str = "--------------";

/// Computes utilization rows for one drive of each element
#[derive(Debug, Clone)]
pub struct UtilizationReporter {
    drive: String,
}

impl UtilizationReporter {
    /// Create a reporter for a drive label such as `C` (a trailing `:` is dropped)
    pub fn new(drive: impl AsRef<str>) -> Self {
        Self {
            drive: drive.as_ref().trim_end_matches(':').to_string(),
        }
    }

    pub fn drive(&self) -> &str {
        &self.drive
    }

    /// Compute the utilization row and log lines for one sample
    pub fn compute_utilization(&self, sample: &DiskSample) -> Utilization {
        let mut log_lines = vec![format!(
            "Disk {} Information for {}",
            self.drive, sample.element_name
        )];

        let parsed = parse_size(sample.total_size.as_deref())
            .zip(parse_size(sample.free_space.as_deref()));

        let mut utilization = match parsed {
            None => {
                log_lines.push(NO_READABLE_INFORMATION.to_string());
                zero_row(log_lines)
            }
            Some((0, _)) => {
                log_lines.push(ZERO_SIZE_DISK.to_string());
                zero_row(log_lines)
            }
            Some((total_size, free_space)) => {
                let utilization_percent = utilization_percent(free_space, total_size);
                log_lines.push(format!("Size in disk: {} MB", total_size));
                log_lines.push(format!("Free Space in disk: {} MB", free_space));
                log_lines.push(format!("Utilization in disk: {} %", utilization_percent));
                Utilization {
                    free_space,
                    total_size,
                    utilization_percent,
                    log_lines,
                }
            }
        };

        utilization.log_lines.push(SEPARATOR.to_string());
        utilization
    }

    /// Compute every sample in order, returning the report and the run log
    pub fn build_report(&self, samples: &[DiskSample]) -> (UtilizationReport, Log) {
        let mut report = UtilizationReport::with_capacity(samples.len());
        let mut log = Log::new();

        for sample in samples {
            let utilization = self.compute_utilization(sample);
            report.push(&sample.element_name, &utilization);
            log.extend(utilization.log_lines);
        }

        (report, log)
    }
}

impl Default for UtilizationReporter {
    fn default() -> Self {
        Self::new("C")
    }
}

/// [`UtilizationReporter::compute_utilization`] for the `C` drive
pub fn compute_utilization(sample: &DiskSample) -> Utilization {
    UtilizationReporter::default().compute_utilization(sample)
}

/// [`UtilizationReporter::build_report`] for the `C` drive
pub fn build_report(samples: &[DiskSample]) -> (UtilizationReport, Log) {
    UtilizationReporter::default().build_report(samples)
}

/// Parse a raw size in MB and floor it to whole units
///
/// Returns `None` for missing, non-numeric or non-finite input, and for values
/// that do not fit in an `i64` once floored.
pub fn parse_size(raw: Option<&str>) -> Option<i64> {
    let value: f64 = raw?.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let floored = value.floor();
    // 2^63 is exactly representable; anything at or above it overflows.
    if floored < i64::MIN as f64 || floored >= 9_223_372_036_854_775_808.0 {
        return None;
    }
    Some(floored as i64)
}

/// `(1 - free/total) * 100`, rounded half-to-even at two decimals
fn utilization_percent(free_space: i64, total_size: i64) -> f64 {
    let used = (1.0 - free_space as f64 / total_size as f64) * 100.0;
    (used * 100.0).round_ties_even() / 100.0
}

fn zero_row(log_lines: Vec<String>) -> Utilization {
    Utilization {
        free_space: 0,
        total_size: 0,
        utilization_percent: 0.0,
        log_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, total: Option<&str>, free: Option<&str>) -> DiskSample {
        DiskSample::new(name, total, free)
    }

    #[test]
    fn test_quarter_free_is_seventy_five_percent() {
        let result = compute_utilization(&sample("dma-01", Some("1000.0"), Some("250.0")));

        assert_eq!(result.total_size, 1000);
        assert_eq!(result.free_space, 250);
        assert_eq!(result.utilization_percent, 75.0);
        assert_eq!(
            result.log_lines,
            vec![
                "Disk C Information for dma-01",
                "Size in disk: 1000 MB",
                "Free Space in disk: 250 MB",
                "Utilization in disk: 75 %",
                "--------------",
            ]
        );
    }

    #[test]
    fn test_unparseable_total_is_zero_row() {
        let result = compute_utilization(&sample("dma-01", Some("abc"), Some("250")));

        assert!(result.is_degraded());
        assert_eq!((result.free_space, result.total_size), (0, 0));
        assert_eq!(result.utilization_percent, 0.0);
        assert!(result
            .log_lines
            .iter()
            .any(|line| line == NO_READABLE_INFORMATION));
    }

    #[test]
    fn test_unparseable_free_space_is_zero_row() {
        let result = compute_utilization(&sample("dma-01", Some("1000"), Some("n/a")));
        assert!(result.is_degraded());
        assert_eq!(result.log_lines[1], NO_READABLE_INFORMATION);
    }

    #[test]
    fn test_missing_cells_are_zero_row() {
        let result = compute_utilization(&sample("dma-01", None, Some("250")));
        assert!(result.is_degraded());

        let result = compute_utilization(&sample("dma-01", Some("1000"), None));
        assert!(result.is_degraded());
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let result = compute_utilization(&sample("dma-01", Some("0"), Some("0")));

        assert!(result.is_degraded());
        assert!(result.utilization_percent.is_finite());
        assert_eq!(result.log_lines[1], ZERO_SIZE_DISK);
    }

    #[test]
    fn test_total_below_one_floors_to_zero() {
        let result = compute_utilization(&sample("dma-01", Some("0.9"), Some("0.5")));
        assert!(result.is_degraded());
        assert_eq!(result.log_lines[1], ZERO_SIZE_DISK);
    }

    #[test]
    fn test_sizes_are_floored() {
        let result = compute_utilization(&sample("dma-01", Some("1000.9"), Some("250.7")));
        assert_eq!(result.total_size, 1000);
        assert_eq!(result.free_space, 250);
        assert_eq!(result.utilization_percent, 75.0);
    }

    #[test]
    fn test_percent_rounds_to_two_decimals() {
        let result = compute_utilization(&sample("dma-01", Some("3"), Some("1")));
        assert_eq!(result.utilization_percent, 66.67);

        let result = compute_utilization(&sample("dma-01", Some("7"), Some("1")));
        assert_eq!(result.utilization_percent, 85.71);
    }

    #[test]
    fn test_percent_matches_formula_across_sizes() {
        for total in [1_i64, 7, 100, 4096, 476_837, 1_907_346] {
            for free in [0, 1, total / 3, total / 2, total] {
                let result = compute_utilization(&sample(
                    "dma-01",
                    Some(total.to_string().as_str()),
                    Some(free.to_string().as_str()),
                ));
                let expected =
                    ((1.0 - free as f64 / total as f64) * 100.0 * 100.0).round_ties_even() / 100.0;
                assert_eq!(result.utilization_percent, expected, "{free}/{total}");
            }
        }
    }

    #[test]
    fn test_full_and_empty_disks() {
        let full = compute_utilization(&sample("dma-01", Some("500"), Some("0")));
        assert_eq!(full.utilization_percent, 100.0);

        let empty = compute_utilization(&sample("dma-01", Some("500"), Some("500")));
        assert_eq!(empty.utilization_percent, 0.0);
        assert!(!empty.is_degraded());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let input = sample("dma-01", Some("2048.5"), Some("1024.25"));
        assert_eq!(compute_utilization(&input), compute_utilization(&input));
    }

    #[test]
    fn test_parse_size_edge_cases() {
        assert_eq!(parse_size(Some(" 42.7 ")), Some(42));
        assert_eq!(parse_size(Some("-0.5")), Some(-1));
        assert_eq!(parse_size(Some("1e3")), Some(1000));
        assert_eq!(parse_size(Some("NaN")), None);
        assert_eq!(parse_size(Some("inf")), None);
        assert_eq!(parse_size(Some("1e300")), None);
        assert_eq!(parse_size(Some("")), None);
        assert_eq!(parse_size(None), None);
    }

    #[test]
    fn test_build_report_keeps_order_and_degraded_rows() {
        let samples = vec![
            sample("dma-01", Some("1000.0"), Some("250.0")),
            sample("dma-02", Some("abc"), Some("250")),
            sample("dma-03", Some("200"), Some("50")),
        ];

        let (report, log) = build_report(&samples);

        assert_eq!(report.len(), 3);
        assert_eq!(report.names(), ["dma-01", "dma-02", "dma-03"]);
        assert_eq!(report.free_space(), [250, 0, 50]);
        assert_eq!(report.total_size(), [1000, 0, 200]);
        assert_eq!(report.utilization_percent(), [75.0, 0.0, 75.0]);
        assert_eq!(log.lines()[5], "Disk C Information for dma-02");
        assert_eq!(log.lines()[6], NO_READABLE_INFORMATION);
    }

    #[test]
    fn test_build_report_lengths_match_input() {
        for count in [0, 1, 5] {
            let samples: Vec<DiskSample> = (0..count)
                .map(|i| sample(&format!("dma-{i}"), Some("100"), Some("10")))
                .collect();
            let (report, _) = build_report(&samples);

            assert_eq!(report.names().len(), count);
            assert_eq!(report.free_space().len(), count);
            assert_eq!(report.total_size().len(), count);
            assert_eq!(report.utilization_percent().len(), count);
        }
    }

    #[test]
    fn test_empty_input_gives_empty_log() {
        let (report, log) = build_report(&[]);
        assert!(report.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_drive_label_drops_colon() {
        let reporter = UtilizationReporter::new("D:");
        let result = reporter.compute_utilization(&sample("dma-01", Some("10"), Some("5")));
        assert_eq!(result.log_lines[0], "Disk D Information for dma-01");
    }
}
