//! Single-proportion restorations read from CSV, one job per row.

use crate::core::diagnostics::DiagnosticsConfig;
use crate::core::engine::restore_with;
use crate::domain::model::{
    ControlPoints, Coordinate, ProportionInput, ProportionInputs, RestorationMode,
    RestorationResult,
};
use crate::utils::error::{Result, SurveyError};
use crate::utils::units::parse_distance;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One CSV row. Coordinates are feet; distances may carry `ft` or `ch`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub a_northing: String,
    pub a_easting: String,
    pub b_northing: String,
    pub b_easting: String,
    pub c_northing: String,
    pub c_easting: String,
    pub d_northing: String,
    pub d_easting: String,
    pub record_ns: String,
    pub measured_ns: String,
    pub record_ew: String,
    pub measured_ew: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub id: String,
    pub northing: String,
    pub easting: String,
    pub ns_ratio: String,
    pub ew_ratio: String,
    pub status: String,
    pub warnings: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub with_warnings: usize,
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| SurveyError::invalid_input(field, value, "not a number"))?;
    crate::utils::validation::validate_finite(field, parsed)?;
    Ok(parsed)
}

impl BatchJob {
    pub fn control_points(&self) -> Result<ControlPoints> {
        let mut points = ControlPoints::new();
        for (role, northing, easting) in [
            ("A", &self.a_northing, &self.a_easting),
            ("B", &self.b_northing, &self.b_easting),
            ("C", &self.c_northing, &self.c_easting),
            ("D", &self.d_northing, &self.d_easting),
        ] {
            let coordinate = Coordinate::new(
                parse_coordinate(&format!("{} northing", role), northing)?,
                parse_coordinate(&format!("{} easting", role), easting)?,
            );
            points.insert(role, coordinate);
        }
        Ok(points)
    }

    pub fn inputs(&self) -> Result<ProportionInputs> {
        Ok(ProportionInputs::single(
            ProportionInput::new(
                parse_distance("record_ns", &self.record_ns)?,
                parse_distance("measured_ns", &self.measured_ns)?,
            ),
            ProportionInput::new(
                parse_distance("record_ew", &self.record_ew)?,
                parse_distance("measured_ew", &self.measured_ew)?,
            ),
        ))
    }

    pub fn restore(&self, diagnostics: &DiagnosticsConfig) -> Result<RestorationResult> {
        restore_with(
            RestorationMode::Single,
            &self.control_points()?,
            &self.inputs()?,
            diagnostics,
        )
    }
}

impl BatchOutcome {
    fn success(id: &str, result: &RestorationResult) -> Self {
        Self {
            id: id.to_string(),
            northing: format!("{:.2}", result.coordinate.northing),
            easting: format!("{:.2}", result.coordinate.easting),
            ns_ratio: format!("{:.6}", result.ns_ratio),
            ew_ratio: format!("{:.6}", result.ew_ratio),
            status: "ok".to_string(),
            warnings: result
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    fn failure(id: &str, error: &SurveyError) -> Self {
        Self {
            id: id.to_string(),
            northing: String::new(),
            easting: String::new(),
            ns_ratio: String::new(),
            ew_ratio: String::new(),
            status: format!("error: {}", error),
            warnings: String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Restores every row of `input` and writes one outcome row per job to
/// `output`. Row-level failures, including rows the CSV reader cannot
/// decode, are recorded in the `status` column; only I/O errors abort the
/// batch.
pub fn run_batch<R: Read, W: Write>(
    input: R,
    output: W,
    diagnostics: &DiagnosticsConfig,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (index, row) in reader.deserialize::<BatchJob>().enumerate() {
        summary.total += 1;
        let job = match row {
            Ok(job) => job,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let id = format!("row-{}", index + 1);
                tracing::warn!("❌ Row {} could not be read: {}", index + 1, e);
                summary.failed += 1;
                writer.serialize(BatchOutcome::failure(&id, &SurveyError::from(e)))?;
                continue;
            }
        };

        let outcome = match job.restore(diagnostics) {
            Ok(result) => {
                summary.succeeded += 1;
                if !result.is_clean() {
                    summary.with_warnings += 1;
                }
                BatchOutcome::success(&job.id, &result)
            }
            Err(e) => {
                tracing::warn!("❌ Row {} ({}) failed: {}", index + 1, job.id, e);
                summary.failed += 1;
                BatchOutcome::failure(&job.id, &e)
            }
        };
        writer.serialize(&outcome)?;
    }

    writer.flush()?;
    tracing::info!(
        "Batch complete: {} jobs, {} succeeded, {} failed, {} with warnings",
        summary.total,
        summary.succeeded,
        summary.failed,
        summary.with_warnings
    );
    Ok(summary)
}
