use crate::core::diagnostics::{check_orientation, check_span, DiagnosticsConfig, Warnings};
use crate::domain::model::{
    CardinalDirection, ControlPoints, Coordinate, ProportionInput, ProportionInputs,
    RestorationMode, RestorationResult,
};
use crate::domain::ports::RestorationStrategy;
use crate::utils::error::{Result, SurveyError};
use crate::utils::validation::validate_non_negative;

/// `measured / record` for one control line.
pub fn proportion_ratio(line: &str, input: &ProportionInput) -> Result<f64> {
    validate_non_negative(&format!("{} record distance", line), input.record)?;
    validate_non_negative(&format!("{} measured distance", line), input.measured)?;

    if input.record == 0.0 {
        return Err(SurveyError::division_by_zero(format!("{} ratio", line)));
    }
    Ok(input.measured / input.record)
}

/// Position `measured` along the line from `p1` toward `p2`, scaled by the
/// line's record length.
pub fn proportionate_position(p1: f64, p2: f64, input: &ProportionInput) -> Result<f64> {
    let ratio = proportion_ratio("axis", input)?;
    Ok(p1 + ratio * (p2 - p1))
}

/// Northing proportioned from B (south) toward A (north) on the NS line,
/// easting from C (west) toward D (east) on the EW line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProportion;

const ROLES: [&str; 4] = ["A", "B", "C", "D"];

impl RestorationStrategy for SingleProportion {
    fn mode(&self) -> RestorationMode {
        RestorationMode::Single
    }

    fn required_roles(&self) -> &'static [&'static str] {
        &ROLES
    }

    fn restore(
        &self,
        points: &ControlPoints,
        inputs: &ProportionInputs,
        diagnostics: &DiagnosticsConfig,
    ) -> Result<RestorationResult> {
        let mode = self.mode();
        let a = points.require("A", mode)?;
        let b = points.require("B", mode)?;
        let c = points.require("C", mode)?;
        let d = points.require("D", mode)?;
        let ns = inputs.require("ns")?;
        let ew = inputs.require("ew")?;

        let ns_ratio = proportion_ratio("NS", &ns)?;
        let ew_ratio = proportion_ratio("EW", &ew)?;

        let northing = b.northing + ns_ratio * (a.northing - b.northing);
        let easting = c.easting + ew_ratio * (d.easting - c.easting);
        let coordinate = Coordinate::new(northing, easting);

        let trace = vec![
            format!("NS Ratio = {} / {} = {:.4}", ns.measured, ns.record, ns_ratio),
            format!("EW Ratio = {} / {} = {:.4}", ew.measured, ew.record, ew_ratio),
            format!(
                "Restored Northing = {} + {:.4} × ({} - {}) = {:.2}",
                b.northing, ns_ratio, a.northing, b.northing, northing
            ),
            format!(
                "Restored Easting = {} + {:.4} × ({} - {}) = {:.2}",
                c.easting, ew_ratio, d.easting, c.easting, easting
            ),
            format!("Final Restored Corner: ({:.2}, {:.2})", northing, easting),
        ];

        let restored = "the restored corner";
        let mut warnings = Warnings::new();
        check_orientation(
            "A",
            a.northing,
            CardinalDirection::North,
            &[("B", b.northing), (restored, northing)],
            &mut warnings,
        );
        check_orientation(
            "B",
            b.northing,
            CardinalDirection::South,
            &[("A", a.northing), (restored, northing)],
            &mut warnings,
        );
        check_orientation(
            "D",
            d.easting,
            CardinalDirection::East,
            &[("C", c.easting), (restored, easting)],
            &mut warnings,
        );
        check_orientation(
            "C",
            c.easting,
            CardinalDirection::West,
            &[("D", d.easting), (restored, easting)],
            &mut warnings,
        );
        check_span("NS", (a.northing - b.northing).abs(), diagnostics, &mut warnings);
        check_span("EW", (d.easting - c.easting).abs(), diagnostics, &mut warnings);

        Ok(RestorationResult {
            mode,
            coordinate,
            ns_ratio,
            ew_ratio,
            trace,
            warnings: warnings.into_vec(),
        })
    }
}
