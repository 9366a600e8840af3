pub mod addressing;
pub mod batch;
pub mod diagnostics;
pub mod double_proportion;
pub mod engine;
pub mod single_proportion;

pub use crate::domain::model::{
    ControlPoint, ControlPoints, Coordinate, CornerTag, ProportionInput, ProportionInputs,
    RestorationMode, RestorationResult, SectionAddress, ValidationWarning,
};
pub use crate::domain::ports::RestorationStrategy;
pub use crate::utils::error::Result;
