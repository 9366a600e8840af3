use crate::core::diagnostics::DiagnosticsConfig;
use crate::domain::model::{ControlPoints, ProportionInputs, RestorationMode, RestorationResult};
use crate::utils::error::Result;

/// One way of placing a lost corner from known corners and field distances.
pub trait RestorationStrategy {
    fn mode(&self) -> RestorationMode;

    /// Roles that must be present in the control points.
    fn required_roles(&self) -> &'static [&'static str];

    fn restore(
        &self,
        points: &ControlPoints,
        inputs: &ProportionInputs,
        diagnostics: &DiagnosticsConfig,
    ) -> Result<RestorationResult>;
}
