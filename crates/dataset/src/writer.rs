//! CSV output for finished day datasets.
//!
//! Both halves of a day are staged into temporary files in the output
//! directory and only renamed into place once both have been written in
//! full, so a failed day never leaves a partial matrix behind.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::info;

use lob_core::types::specs::{lookback_windows, weight_triples};
use lob_core::types::SessionHalf;

use crate::assemble::DayDataset;
use crate::error::Result;
use crate::grid::HalfMatrix;

/// Writes day datasets under a fixed output directory.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    out_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output path for one half of one day.
    ///
    /// Month and day are written unpadded, matching the input naming.
    pub fn half_path(&self, year: u32, month: u32, day: u32, half: SessionHalf) -> PathBuf {
        self.out_dir.join(format!(
            "order_book_3_{year}_{month}_{day}_{}.csv",
            half.output_suffix()
        ))
    }

    /// Write both halves of a day, atomically as a pair.
    ///
    /// Returns the two final paths, morning first.
    pub fn write_day(
        &self,
        year: u32,
        month: u32,
        day: u32,
        dataset: &DayDataset,
    ) -> Result<(PathBuf, PathBuf)> {
        let morning_tmp = self.stage_half(&dataset.morning)?;
        let afternoon_tmp = self.stage_half(&dataset.afternoon)?;

        let morning_path = self.half_path(year, month, day, SessionHalf::Morning);
        let afternoon_path = self.half_path(year, month, day, SessionHalf::Afternoon);

        morning_tmp.persist(&morning_path).map_err(|e| e.error)?;
        if let Err(e) = afternoon_tmp.persist(&afternoon_path) {
            // Keep the pair atomic: take the morning file back out.
            let _ = std::fs::remove_file(&morning_path);
            return Err(e.error.into());
        }

        info!(
            morning = %morning_path.display(),
            afternoon = %afternoon_path.display(),
            "wrote day dataset"
        );
        Ok((morning_path, afternoon_path))
    }

    /// Write one half to an unnamed temporary file in the output
    /// directory (so the final rename stays on one filesystem).
    fn stage_half(&self, matrix: &HalfMatrix) -> Result<NamedTempFile> {
        let tmp = tempfile::Builder::new()
            .prefix(".order_book_3_")
            .suffix(".csv.tmp")
            .tempfile_in(&self.out_dir)?;

        let mut wtr = csv::Writer::from_writer(tmp);
        wtr.write_record(header())?;
        for row in matrix.rows() {
            wtr.write_record(row.iter().map(|v| format_value(*v)))?;
        }
        let mut tmp = wtr.into_inner().map_err(|e| e.into_error())?;
        tmp.flush()?;
        Ok(tmp)
    }
}

/// Column names, in matrix order: label, rise ratios ascending by
/// window, then the ratio/diff pair per weight triple.
pub fn header() -> Vec<String> {
    let mut names = Vec::with_capacity(65);
    names.push("label".to_string());
    for w in lookback_windows() {
        names.push(format!("rise_{}", w.window_secs));
    }
    for t in weight_triples() {
        names.push(format!("w_ratio_{}", t.tag));
        names.push(format!("w_diff_{}", t.tag));
    }
    names
}

/// Plain decimal rendering; non-finite values come out as `inf`,
/// `-inf`, and `NaN`.
fn format_value(v: f64) -> String {
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lob_core::types::specs::TOTAL_COLUMNS;
    use lob_core::types::SnapshotSeries;

    use crate::assemble::{build_day_from_series, BuildOptions};

    fn tiny_day() -> DayDataset {
        let mut s = SnapshotSeries::with_capacity(700);
        let mut t = -2.0;
        let mut k = 0u32;
        while t < 25_150.0 {
            let px = 100.0 + (k % 5) as f64 * 0.25;
            s.push(
                t,
                [px - 0.5; 3],
                [5.0, 6.0, 7.0],
                [px; 3],
                [8.0, 9.0, 10.0],
            );
            t += 37.0;
            k += 1;
        }
        build_day_from_series(&s, &BuildOptions::default()).unwrap()
    }

    #[test]
    fn test_header_shape_and_order() {
        let h = header();
        assert_eq!(h.len(), TOTAL_COLUMNS);
        assert_eq!(h[0], "label");
        assert_eq!(h[1], "rise_360");
        assert_eq!(h[30], "rise_1230");
        assert_eq!(h[31], "w_ratio_100");
        assert_eq!(h[32], "w_diff_100");
        assert_eq!(h[63], "w_ratio_235");
        assert_eq!(h[64], "w_diff_235");
    }

    #[test]
    fn test_write_day_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        let day = tiny_day();

        let (up, down) = writer.write_day(2014, 1, 2, &day).unwrap();
        assert_eq!(
            up.file_name().unwrap().to_str().unwrap(),
            "order_book_3_2014_1_2_UP.csv"
        );
        assert_eq!(
            down.file_name().unwrap().to_str().unwrap(),
            "order_book_3_2014_1_2_DOWN.csv"
        );

        let mut rdr = csv::Reader::from_path(&up).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), TOTAL_COLUMNS);
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9_000);

        let mut rdr = csv::Reader::from_path(&down).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 10_800);
    }

    #[test]
    fn test_no_stray_temp_files_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        writer.write_day(2014, 1, 2, &tiny_day()).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.ends_with(".csv")));
    }

    #[test]
    fn test_failed_second_persist_removes_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());

        // Block the afternoon rename by squatting on its path with a
        // directory; the already-persisted morning file must be taken
        // back out so the day leaves no half-pair behind.
        let down_path = writer.half_path(2014, 1, 2, SessionHalf::Afternoon);
        std::fs::create_dir(&down_path).unwrap();

        assert!(writer.write_day(2014, 1, 2, &tiny_day()).is_err());
        let up_path = writer.half_path(2014, 1, 2, SessionHalf::Morning);
        assert!(!up_path.exists());
    }

    #[test]
    fn test_nonfinite_values_render_plainly() {
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(1.5), "1.5");
    }
}
