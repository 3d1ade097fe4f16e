//! Launch context for managing configurations

use std::collections::HashMap;

/// Metadata recorded for a declared launch argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentMetadata {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

/// Launch context holding configurations and declared arguments
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
    declared_arguments: Vec<ArgumentMetadata>,
}

impl LaunchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context pre-populated with invocation overrides
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut context = Self::new();
        for (k, v) in overrides {
            context.set_configuration(k, v);
        }
        context
    }

    pub fn set_configuration(&mut self, name: String, value: String) {
        self.configurations.insert(name, value);
    }

    pub fn get_configuration(&self, name: &str) -> Option<String> {
        self.configurations.get(name).cloned()
    }

    /// Record a declared argument and apply its default unless already set
    pub fn declare_argument(&mut self, metadata: ArgumentMetadata) {
        if let Some(default) = &metadata.default {
            if !self.configurations.contains_key(&metadata.name) {
                self.configurations
                    .insert(metadata.name.clone(), default.clone());
            }
        }
        self.declared_arguments.push(metadata);
    }

    pub fn declared_arguments(&self) -> &[ArgumentMetadata] {
        &self.declared_arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn force_arg(default: &str) -> ArgumentMetadata {
        ArgumentMetadata {
            name: "force".to_string(),
            default: Some(default.to_string()),
            description: None,
        }
    }

    #[test]
    fn test_new_context() {
        let context = LaunchContext::new();
        assert!(context.get_configuration("any").is_none());
        assert!(context.declared_arguments().is_empty());
    }

    #[test]
    fn test_override_configuration() {
        let mut context = LaunchContext::new();
        context.set_configuration("key".to_string(), "value1".to_string());
        context.set_configuration("key".to_string(), "value2".to_string());
        assert_eq!(context.get_configuration("key"), Some("value2".to_string()));
    }

    #[test]
    fn test_declare_applies_default() {
        let mut context = LaunchContext::new();
        context.declare_argument(force_arg("false"));
        assert_eq!(context.get_configuration("force"), Some("false".to_string()));
        assert_eq!(context.declared_arguments().len(), 1);
    }

    #[test]
    fn test_override_wins_over_default() {
        let mut context =
            LaunchContext::with_overrides([("force".to_string(), "true".to_string())]);
        context.declare_argument(force_arg("false"));
        assert_eq!(context.get_configuration("force"), Some("true".to_string()));
    }
}
