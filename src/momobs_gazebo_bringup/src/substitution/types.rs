//! Substitution types

use crate::error::SubstitutionError;
use crate::substitution::context::LaunchContext;
use serde::Serialize;

/// Deferred string value, resolved against a `LaunchContext` at evaluation time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Substitution {
    /// Plain text (no substitution)
    Text(String),
    /// Value of a launch argument, e.g. `LaunchConfiguration('force')`
    LaunchConfiguration(String),
}

impl Substitution {
    /// Resolve substitution to string value
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        match self {
            Substitution::Text(s) => Ok(s.clone()),
            Substitution::LaunchConfiguration(name) => context
                .get_configuration(name)
                .ok_or_else(|| SubstitutionError::UndefinedVariable(name.clone())),
        }
    }
}

/// Resolve list of substitutions to single string
pub fn resolve_substitutions(
    subs: &[Substitution],
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let mut result = String::new();
    for sub in subs {
        result.push_str(&sub.resolve(context)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_substitution() {
        let sub = Substitution::Text("hello".to_string());
        let context = LaunchContext::new();
        assert_eq!(sub.resolve(&context).unwrap(), "hello");
    }

    #[test]
    fn test_launch_configuration() {
        let sub = Substitution::LaunchConfiguration("force".to_string());
        let mut context = LaunchContext::new();
        context.set_configuration("force".to_string(), "true".to_string());
        assert_eq!(sub.resolve(&context).unwrap(), "true");
    }

    #[test]
    fn test_undefined_variable() {
        let sub = Substitution::LaunchConfiguration("residuals".to_string());
        let context = LaunchContext::new();
        let err = sub.resolve(&context).unwrap_err();
        assert!(err.to_string().contains("residuals"));
    }

    #[test]
    fn test_resolve_multiple() {
        let subs = vec![
            Substitution::Text("/".to_string()),
            Substitution::LaunchConfiguration("topic".to_string()),
            Substitution::Text("/smooth".to_string()),
        ];
        let mut context = LaunchContext::new();
        context.set_configuration("topic".to_string(), "cmd_vel".to_string());
        assert_eq!(
            resolve_substitutions(&subs, &context).unwrap(),
            "/cmd_vel/smooth"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let sub = Substitution::LaunchConfiguration("force".to_string());
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, r#"{"type":"launch_configuration","value":"force"}"#);
    }
}
