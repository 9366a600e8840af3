use crate::core::diagnostics::{
    check_adjacent_distance, check_orientation, check_span, DiagnosticsConfig, Warnings,
};
use crate::domain::model::{
    CardinalDirection, ControlPoints, Coordinate, ProportionInput, ProportionInputs,
    RestorationMode, RestorationResult,
};
use crate::domain::ports::RestorationStrategy;
use crate::utils::error::{Result, SurveyError};
use crate::utils::validation::validate_non_negative;

/// Average of the record-based and measured-based fractional positions
/// along a line, measured from the first end.
pub fn weighted_proportion(r1: f64, r2: f64, m1: f64, m2: f64) -> Result<f64> {
    for (field, value) in [
        ("record distance", r1),
        ("record distance", r2),
        ("measured distance", m1),
        ("measured distance", m2),
    ] {
        validate_non_negative(field, value)?;
    }

    let record_total = r1 + r2;
    let measured_total = m1 + m2;
    if record_total == 0.0 {
        return Err(SurveyError::division_by_zero("record proportion"));
    }
    if measured_total == 0.0 {
        return Err(SurveyError::division_by_zero("measured proportion"));
    }

    Ok((r1 / record_total + m1 / measured_total) / 2.0)
}

fn line_proportion(
    name: &str,
    near: &ProportionInput,
    far: &ProportionInput,
) -> Result<f64> {
    weighted_proportion(near.record, far.record, near.measured, far.measured).map_err(|err| {
        match err {
            SurveyError::DivisionByZeroError { context } => {
                SurveyError::division_by_zero(format!("{} {}", name, context))
            }
            other => other,
        }
    })
}

/// Bilinear placement of a lost corner inside the quadrilateral formed by
/// the SW, SE, NW and NE known corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleProportion;

const ROLES: [&str; 4] = ["SW", "SE", "NW", "NE"];

impl RestorationStrategy for DoubleProportion {
    fn mode(&self) -> RestorationMode {
        RestorationMode::Double
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
        let sw = points.require("SW", mode)?;
        let se = points.require("SE", mode)?;
        let nw = points.require("NW", mode)?;
        let ne = points.require("NE", mode)?;
        let north = inputs.require("north")?;
        let south = inputs.require("south")?;
        let east = inputs.require("east")?;
        let west = inputs.require("west")?;

        let prop_ew = line_proportion("EW", &west, &east)?;
        let prop_ns = line_proportion("NS", &south, &north)?;

        let northing_west = sw.northing + prop_ns * (nw.northing - sw.northing);
        let northing_east = se.northing + prop_ns * (ne.northing - se.northing);
        let northing = northing_west + prop_ew * (northing_east - northing_west);

        let easting_south = sw.easting + prop_ew * (se.easting - sw.easting);
        let easting_north = nw.easting + prop_ew * (ne.easting - nw.easting);
        let easting = easting_south + prop_ns * (easting_north - easting_south);

        let coordinate = Coordinate::new(northing, easting);
        tracing::debug!(prop_ns, prop_ew, "Double proportion placed corner at {}", coordinate);

        let trace = vec![
            format!(
                "EW Proportion = ({} / ({} + {}) + {} / ({} + {})) / 2 = {:.6}",
                west.record,
                west.record,
                east.record,
                west.measured,
                west.measured,
                east.measured,
                prop_ew
            ),
            format!(
                "NS Proportion = ({} / ({} + {}) + {} / ({} + {})) / 2 = {:.6}",
                south.record,
                south.record,
                north.record,
                south.measured,
                south.measured,
                north.measured,
                prop_ns
            ),
            format!(
                "Northing at West Line = {} + {:.6} × ({} - {}) = {:.2}",
                sw.northing, prop_ns, nw.northing, sw.northing, northing_west
            ),
            format!(
                "Northing at East Line = {} + {:.6} × ({} - {}) = {:.2}",
                se.northing, prop_ns, ne.northing, se.northing, northing_east
            ),
            format!(
                "Restored Northing = {:.2} + {:.6} × ({:.2} - {:.2}) = {:.2}",
                northing_west, prop_ew, northing_east, northing_west, northing
            ),
            format!(
                "Easting at South Line = {} + {:.6} × ({} - {}) = {:.2}",
                sw.easting, prop_ew, se.easting, sw.easting, easting_south
            ),
            format!(
                "Easting at North Line = {} + {:.6} × ({} - {}) = {:.2}",
                nw.easting, prop_ew, ne.easting, nw.easting, easting_north
            ),
            format!(
                "Restored Easting = {:.2} + {:.6} × ({:.2} - {:.2}) = {:.2}",
                easting_south, prop_ns, easting_north, easting_south, easting
            ),
            format!("Final Restored Corner: ({:.2}, {:.2})", northing, easting),
        ];

        let restored = "the restored corner";
        let mut warnings = Warnings::new();
        for (role, corner, vertical, horizontal) in [
            ("NW", nw, CardinalDirection::North, CardinalDirection::West),
            ("NE", ne, CardinalDirection::North, CardinalDirection::East),
            ("SW", sw, CardinalDirection::South, CardinalDirection::West),
            ("SE", se, CardinalDirection::South, CardinalDirection::East),
        ] {
            check_orientation(
                role,
                corner.northing,
                vertical,
                &[(restored, northing)],
                &mut warnings,
            );
            check_orientation(
                role,
                corner.easting,
                horizontal,
                &[(restored, easting)],
                &mut warnings,
            );
        }

        check_span("West NS", (nw.northing - sw.northing).abs(), diagnostics, &mut warnings);
        check_span("East NS", (ne.northing - se.northing).abs(), diagnostics, &mut warnings);
        check_span("South EW", (se.easting - sw.easting).abs(), diagnostics, &mut warnings);
        check_span("North EW", (ne.easting - nw.easting).abs(), diagnostics, &mut warnings);

        for (line, input) in [("North", north), ("South", south), ("East", east), ("West", west)] {
            check_adjacent_distance(line, input.measured, diagnostics, &mut warnings);
        }

        Ok(RestorationResult {
            mode,
            coordinate,
            ns_ratio: prop_ns,
            ew_ratio: prop_ew,
            trace,
            warnings: warnings.into_vec(),
        })
    }
}
