pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::SessionConfig;

pub use crate::core::addressing::{corner_offset, resolve, row_col, section_number, SectionGrid};
pub use crate::core::diagnostics::DiagnosticsConfig;
pub use crate::core::engine::{restore, restore_with, RestorationSession};
pub use crate::domain::model::{
    ControlPoint, ControlPoints, Coordinate, CornerTag, ProportionInput, ProportionInputs,
    RestorationMode, RestorationResult, SectionAddress, ValidationWarning,
};
pub use crate::utils::error::{Result, SurveyError};
