use crate::core::diagnostics::DiagnosticsConfig;
use crate::core::double_proportion::DoubleProportion;
use crate::core::single_proportion::SingleProportion;
use crate::domain::model::{ControlPoints, ProportionInputs, RestorationMode, RestorationResult};
use crate::domain::ports::RestorationStrategy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_finite, Validate};
use serde::Serialize;

impl RestorationMode {
    pub fn strategy(&self) -> &'static dyn RestorationStrategy {
        match self {
            RestorationMode::Single => &SingleProportion,
            RestorationMode::Double => &DoubleProportion,
        }
    }
}

pub fn restore(
    mode: RestorationMode,
    points: &ControlPoints,
    inputs: &ProportionInputs,
) -> Result<RestorationResult> {
    restore_with(mode, points, inputs, &DiagnosticsConfig::default())
}

pub fn restore_with(
    mode: RestorationMode,
    points: &ControlPoints,
    inputs: &ProportionInputs,
    diagnostics: &DiagnosticsConfig,
) -> Result<RestorationResult> {
    tracing::debug!("Restoring lost corner by {} from {} known corners", mode, points.len());

    for point in points.iter() {
        validate_finite(&format!("{} northing", point.role), point.coordinate.northing)?;
        validate_finite(&format!("{} easting", point.role), point.coordinate.easting)?;
    }

    let result = mode.strategy().restore(points, inputs, diagnostics)?;

    tracing::info!(
        "📍 Restored corner {} (NS {:.6}, EW {:.6}, {} warnings)",
        result.coordinate,
        result.ns_ratio,
        result.ew_ratio,
        result.warnings.len()
    );
    Ok(result)
}

/// Everything one restoration needs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestorationSession {
    mode: RestorationMode,
    points: ControlPoints,
    inputs: ProportionInputs,
    diagnostics: DiagnosticsConfig,
}

impl RestorationSession {
    pub fn new(mode: RestorationMode, points: ControlPoints, inputs: ProportionInputs) -> Self {
        Self {
            mode,
            points,
            inputs,
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    pub fn with_diagnostics(self, diagnostics: DiagnosticsConfig) -> Self {
        Self {
            diagnostics,
            ..self
        }
    }

    pub fn mode(&self) -> RestorationMode {
        self.mode
    }

    pub fn points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn inputs(&self) -> &ProportionInputs {
        &self.inputs
    }

    pub fn diagnostics(&self) -> &DiagnosticsConfig {
        &self.diagnostics
    }

    /// Roles the chosen mode needs that are not in the control points.
    pub fn missing_roles(&self) -> Vec<&'static str> {
        self.mode
            .strategy()
            .required_roles()
            .iter()
            .copied()
            .filter(|role| self.points.get(role).is_none())
            .collect()
    }

    pub fn restore(&self) -> Result<RestorationResult> {
        restore_with(self.mode, &self.points, &self.inputs, &self.diagnostics)
    }
}

impl Validate for RestorationSession {
    fn validate(&self) -> Result<()> {
        self.diagnostics.validate()?;
        if let Some(role) = self.missing_roles().first() {
            self.points.require(role, self.mode)?;
        }
        Ok(())
    }
}
