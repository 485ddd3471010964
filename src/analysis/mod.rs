//! Diagram analysis for nsdgen
//!
//! Structural validation, jump classification and routine-level facts.

mod jump;
mod routine;
mod validator;

pub use jump::JumpKind;
pub use routine::RoutineInfo;
pub use validator::Validator;

use crate::diagram::Root;
use crate::errors::NsdResult;
use crate::intermediate::MarkerConfig;

/// Validate `root` and collect its routine facts
pub fn analyze(root: &Root, markers: &MarkerConfig) -> NsdResult<RoutineInfo> {
    Validator::with_markers(markers).validate(root)?;
    Ok(RoutineInfo::analyze(root, markers))
}
