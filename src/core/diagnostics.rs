use crate::domain::model::{CardinalDirection, ValidationWarning};
use crate::utils::error::Result;
use crate::utils::units::feet_to_chains;
use crate::utils::validation::{validate_positive, Validate};
use serde::{Deserialize, Serialize};

/// Half-mile multiples from one half section up to five miles.
pub const SECTION_MULTIPLES: [f64; 10] = [
    2640.0, 5280.0, 7920.0, 10560.0, 13200.0, 15840.0, 18480.0, 21120.0, 23760.0, 26400.0,
];

pub const DEFAULT_SPAN_TOLERANCE: f64 = 300.0;
pub const DEFAULT_MAX_ADJACENT_CHAINS: f64 = 80.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Allowed deviation, in feet, of a control line from a section multiple.
    pub span_tolerance: f64,
    /// Longest distance, in chains, from a known corner to the lost corner
    /// before it is flagged as a probable fractional section.
    pub max_adjacent_chains: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            span_tolerance: DEFAULT_SPAN_TOLERANCE,
            max_adjacent_chains: DEFAULT_MAX_ADJACENT_CHAINS,
        }
    }
}

impl Validate for DiagnosticsConfig {
    fn validate(&self) -> Result<()> {
        validate_positive("diagnostics.span_tolerance", self.span_tolerance)?;
        validate_positive("diagnostics.max_adjacent_chains", self.max_adjacent_chains)
    }
}

/// Ordered warnings without duplicates.
#[derive(Debug, Default)]
pub struct Warnings(Vec<ValidationWarning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: ValidationWarning) {
        if !self.0.contains(&warning) {
            tracing::warn!("⚠️ {}", warning);
            self.0.push(warning);
        }
    }

    pub fn into_vec(self) -> Vec<ValidationWarning> {
        self.0
    }
}

pub fn is_plausible_span(span: f64, tolerance: f64) -> bool {
    SECTION_MULTIPLES
        .iter()
        .any(|multiple| (span - multiple).abs() <= tolerance)
}

pub fn check_span(line: &str, span: f64, config: &DiagnosticsConfig, warnings: &mut Warnings) {
    if is_plausible_span(span, config.span_tolerance) {
        tracing::debug!(
            "✅ {} span ({:.2} ft) is within ±{} ft of a valid section multiple",
            line,
            span,
            config.span_tolerance
        );
    } else {
        warnings.push(ValidationWarning::ImplausibleSpan {
            line: line.to_string(),
            span,
            tolerance: config.span_tolerance,
        });
    }
}

/// Checks that `value` (a northing for north/south, an easting for
/// east/west) lies strictly on the `expected` side of every reference.
pub fn check_orientation(
    corner: &str,
    value: f64,
    expected: CardinalDirection,
    references: &[(&str, f64)],
    warnings: &mut Warnings,
) {
    let holds = references.iter().all(|(_, other)| match expected {
        CardinalDirection::North | CardinalDirection::East => value > *other,
        CardinalDirection::South | CardinalDirection::West => value < *other,
    });

    if !holds {
        let reference = references
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" and ");
        warnings.push(ValidationWarning::Orientation {
            corner: corner.to_string(),
            expected,
            reference,
        });
    }
}

pub fn check_adjacent_distance(
    line: &str,
    feet: f64,
    config: &DiagnosticsConfig,
    warnings: &mut Warnings,
) {
    let chains = feet_to_chains(feet);
    if chains > config.max_adjacent_chains {
        warnings.push(ValidationWarning::ExcessiveDistance {
            line: line.to_string(),
            chains,
            limit: config.max_adjacent_chains,
        });
    }
}
