use anyhow::Result;
use plss_restore::core::double_proportion::weighted_proportion;
use plss_restore::core::single_proportion::proportionate_position;
use plss_restore::{
    restore, ControlPoints, Coordinate, ProportionInput, ProportionInputs, RestorationMode,
    RestorationSession, SurveyError, ValidationWarning,
};
use proptest::prelude::*;

fn single_points(ns_span: f64) -> ControlPoints {
    ControlPoints::new()
        .with("A", Coordinate::new(ns_span, 0.0))
        .with("B", Coordinate::new(0.0, 0.0))
        .with("C", Coordinate::new(1000.0, 0.0))
        .with("D", Coordinate::new(1000.0, 5280.0))
}

fn single_inputs(record_ns: f64, measured_ns: f64) -> ProportionInputs {
    ProportionInputs::single(
        ProportionInput::new(record_ns, measured_ns),
        ProportionInput::new(5280.0, 2640.0),
    )
}

fn square() -> ControlPoints {
    ControlPoints::new()
        .with("SW", Coordinate::new(0.0, 0.0))
        .with("SE", Coordinate::new(0.0, 5280.0))
        .with("NW", Coordinate::new(5280.0, 0.0))
        .with("NE", Coordinate::new(5280.0, 5280.0))
}

fn is_span_warning(warning: &ValidationWarning, line: &str) -> bool {
    matches!(warning, ValidationWarning::ImplausibleSpan { line: l, .. } if l == line)
}

#[test]
fn test_single_axis_midpoint() {
    let input = ProportionInput::new(5280.0, 2640.0);
    assert_eq!(proportionate_position(0.0, 5280.0, &input).unwrap(), 2640.0);
}

#[test]
fn test_double_proportion_grid_center() -> Result<()> {
    let input = ProportionInput::new(2640.0, 2640.0);
    let inputs = ProportionInputs::double(input, input, input, input);

    let result = restore(RestorationMode::Double, &square(), &inputs)?;

    assert_eq!(result.ew_ratio, 0.5);
    assert_eq!(result.ns_ratio, 0.5);
    assert_eq!(result.coordinate, Coordinate::new(2640.0, 2640.0));
    Ok(())
}

#[test]
fn test_zero_record_distance_is_an_error() {
    let err = restore(
        RestorationMode::Single,
        &single_points(5280.0),
        &single_inputs(0.0, 2640.0),
    )
    .unwrap_err();
    assert!(matches!(err, SurveyError::DivisionByZeroError { .. }));

    let zero = ProportionInput::new(0.0, 0.0);
    let inputs = ProportionInputs::double(zero, zero, zero, zero);
    let err = restore(RestorationMode::Double, &square(), &inputs).unwrap_err();
    assert!(matches!(err, SurveyError::DivisionByZeroError { .. }));
}

#[test]
fn test_span_warning_fires_for_3000_ft() -> Result<()> {
    let implausible = restore(
        RestorationMode::Single,
        &single_points(3000.0),
        &single_inputs(3000.0, 1500.0),
    )?;
    assert!(implausible.warnings.iter().any(|w| is_span_warning(w, "NS")));

    let plausible = restore(
        RestorationMode::Single,
        &single_points(2640.0),
        &single_inputs(2640.0, 1320.0),
    )?;
    assert!(!plausible.warnings.iter().any(|w| is_span_warning(w, "NS")));
    Ok(())
}

#[test]
fn test_ew_span_warning_fires_for_3000_ft() -> Result<()> {
    let points = single_points(5280.0).with("D", Coordinate::new(1000.0, 3000.0));
    let result = restore(RestorationMode::Single, &points, &single_inputs(5280.0, 2640.0))?;

    assert_eq!(result.coordinate, Coordinate::new(2640.0, 1500.0));
    assert!(result.warnings.iter().any(|w| is_span_warning(w, "EW")));
    assert!(!result.warnings.iter().any(|w| is_span_warning(w, "NS")));
    Ok(())
}

#[test]
fn test_restore_is_idempotent() -> Result<()> {
    let points = ControlPoints::new()
        .with("SW", Coordinate::new(12.34, -7.5))
        .with("SE", Coordinate::new(40.1, 5291.7))
        .with("NW", Coordinate::new(5268.2, 3.3))
        .with("NE", Coordinate::new(5301.9, 5276.4));
    let inputs = ProportionInputs::double(
        ProportionInput::new(2640.0, 2651.37),
        ProportionInput::new(2640.0, 2633.12),
        ProportionInput::new(2640.0, 2618.9),
        ProportionInput::new(2640.0, 2660.05),
    );
    let session = RestorationSession::new(RestorationMode::Double, points, inputs);

    let first = session.restore()?;
    let second = session.restore()?;
    assert_eq!(first, second);
    assert_eq!(first.trace, second.trace);
    assert_eq!(first.coordinate.northing.to_bits(), second.coordinate.northing.to_bits());
    Ok(())
}

#[test]
fn test_record_and_measured_evidence_are_averaged() -> Result<()> {
    // record puts the corner 1/4 of the way east, measurement 3/4
    let west = ProportionInput::new(1320.0, 3960.0);
    let east = ProportionInput::new(3960.0, 1320.0);
    let even = ProportionInput::new(2640.0, 2640.0);
    let result = restore(
        RestorationMode::Double,
        &square(),
        &ProportionInputs::double(even, even, east, west),
    )?;
    assert_eq!(result.ew_ratio, 0.5);

    let skewed = ProportionInput::new(1320.0, 1320.0);
    let result = restore(
        RestorationMode::Double,
        &square(),
        &ProportionInputs::double(even, even, east, skewed),
    )?;
    assert_eq!(result.ew_ratio, (0.25 + 1320.0 / 2640.0) / 2.0);
    Ok(())
}

fn bilinear(points: &ControlPoints, u: f64, v: f64) -> Coordinate {
    let sw = points.get("SW").unwrap();
    let se = points.get("SE").unwrap();
    let nw = points.get("NW").unwrap();
    let ne = points.get("NE").unwrap();
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        (1.0 - u) * (1.0 - v) * a + u * (1.0 - v) * b + (1.0 - u) * v * c + u * v * d
    };
    Coordinate::new(
        blend(sw.northing, se.northing, nw.northing, ne.northing),
        blend(sw.easting, se.easting, nw.easting, ne.easting),
    )
}

proptest! {
    #[test]
    fn double_proportion_is_bilinear(
        jitter in prop::array::uniform8(-150.0f64..150.0),
        distances in prop::array::uniform8(100.0f64..5000.0),
    ) {
        let points = ControlPoints::new()
            .with("SW", Coordinate::new(jitter[0], jitter[1]))
            .with("SE", Coordinate::new(jitter[2], 5280.0 + jitter[3]))
            .with("NW", Coordinate::new(5280.0 + jitter[4], jitter[5]))
            .with("NE", Coordinate::new(5280.0 + jitter[6], 5280.0 + jitter[7]));
        let inputs = ProportionInputs::double(
            ProportionInput::new(distances[0], distances[1]),
            ProportionInput::new(distances[2], distances[3]),
            ProportionInput::new(distances[4], distances[5]),
            ProportionInput::new(distances[6], distances[7]),
        );

        let result = restore(RestorationMode::Double, &points, &inputs).unwrap();
        let expected = bilinear(&points, result.ew_ratio, result.ns_ratio);

        prop_assert!((result.coordinate.northing - expected.northing).abs() < 1e-6);
        prop_assert!((result.coordinate.easting - expected.easting).abs() < 1e-6);
        prop_assert!(result.ns_ratio > 0.0 && result.ns_ratio < 1.0);
        prop_assert!(result.ew_ratio > 0.0 && result.ew_ratio < 1.0);
    }

    #[test]
    fn weighted_proportion_lies_between_evidence(
        r1 in 1.0f64..10_000.0,
        r2 in 1.0f64..10_000.0,
        m1 in 1.0f64..10_000.0,
        m2 in 1.0f64..10_000.0,
    ) {
        let p = weighted_proportion(r1, r2, m1, m2).unwrap();
        let record = r1 / (r1 + r2);
        let measured = m1 / (m1 + m2);
        prop_assert!(p >= record.min(measured) - 1e-12);
        prop_assert!(p <= record.max(measured) + 1e-12);
    }
}
