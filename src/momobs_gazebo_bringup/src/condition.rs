//! Condition evaluation for activation guards

use crate::{error::SubstitutionError, ir::Condition, substitution::LaunchContext};

/// Evaluate whether an action guarded by `condition` should run
pub fn evaluate_condition(
    condition: &Condition,
    context: &LaunchContext,
) -> Result<bool, SubstitutionError> {
    match condition {
        Condition::If(expr) => Ok(is_truthy(&expr.resolve(context)?)),
    }
}

/// Determine if a string value is "truthy"
pub fn is_truthy(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    matches!(
        normalized.as_str(),
        "true" | "1" | "yes" | "y" | "on" | "enabled"
    )
}
