//! Launch action representation
//!
//! A declarative, ordered list of launch actions handed to an external
//! executor. Activation conditions stay attached to their actions instead of
//! filtering the list, so the sequence is identical for every flag value and
//! only its evaluation differs.

use crate::{
    condition::evaluate_condition,
    error::SubstitutionError,
    substitution::{resolve_substitutions, ArgumentMetadata, LaunchContext, Substitution},
};
use serde::Serialize;
use std::{collections::BTreeMap, fmt, path::PathBuf};

/// A lazy string expression (unevaluated substitution chain).
/// Evaluate with a `LaunchContext` to resolve to a concrete string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Expr(pub Vec<Substitution>);

impl Expr {
    /// Create an `Expr` from a literal string (no substitutions).
    pub fn literal(s: impl Into<String>) -> Self {
        Expr(vec![Substitution::Text(s.into())])
    }

    /// Create an `Expr` reading a launch configuration.
    pub fn configuration(name: impl Into<String>) -> Self {
        Expr(vec![Substitution::LaunchConfiguration(name.into())])
    }

    /// Resolve this expression against a `LaunchContext`.
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        resolve_substitutions(&self.0, context)
    }
}

/// Condition gating an action's execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "expr", rename_all = "snake_case")]
pub enum Condition {
    /// Execute when the expression evaluates to truthy.
    If(Expr),
}

/// A single action with an optional activation condition.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Whether the executor should perform this action under `context`.
    pub fn is_active(&self, context: &LaunchContext) -> Result<bool, SubstitutionError> {
        match &self.condition {
            Some(condition) => evaluate_condition(condition, context),
            None => Ok(true),
        }
    }
}

/// All launch action types used by the bringup.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    /// Declares a launch argument with optional default.
    DeclareArgument {
        name: String,
        default: Option<String>,
        description: Option<String>,
    },

    /// Includes another (Python) launch file by path.
    Include { file: PathBuf },

    /// Spawns a ROS 2 node.
    SpawnNode(NodeDecl),

    /// Runs an arbitrary process.
    ExecuteProcess(ProcessDecl),

    /// Waits `period` seconds, then runs `actions`.
    Timer { period: f64, actions: Vec<Action> },
}

impl ActionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionKind::DeclareArgument { .. } => "declare_argument",
            ActionKind::Include { .. } => "include",
            ActionKind::SpawnNode(_) => "node",
            ActionKind::ExecuteProcess(_) => "execute_process",
            ActionKind::Timer { .. } => "timer",
        }
    }
}

/// A ROS 2 node to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDecl {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub output: Option<String>,
    pub emulate_tty: bool,
    pub params: Vec<ParamDecl>,
    pub param_files: Vec<PathBuf>,
    pub remaps: Vec<RemapDecl>,
    pub arguments: Vec<String>,
}

impl NodeDecl {
    pub fn new(package: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            executable: executable.into(),
            name: None,
            output: None,
            emulate_tty: false,
            params: Vec::new(),
            param_files: Vec::new(),
            remaps: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

/// A plain process to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDecl {
    pub cmd: Vec<String>,
    pub output: Option<String>,
}

/// A typed node parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            // Keep the decimal point so ROS types the parameter as a double
            ParamValue::Double(d) => write!(f, "{:?}", d),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Double(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

/// An inline parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDecl {
    pub name: String,
    pub value: ParamValue,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A topic remapping declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemapDecl {
    pub from: String,
    pub to: String,
}

/// The complete, ordered launch sequence plus the invocation's argument values.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchDescription {
    /// Values supplied by the invoker; these override declared defaults.
    pub launch_arguments: BTreeMap<String, String>,
    pub body: Vec<Action>,
}

impl LaunchDescription {
    pub fn new(body: Vec<Action>) -> Self {
        Self {
            launch_arguments: BTreeMap::new(),
            body,
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Collect all declared argument names (recursive into timers).
    pub fn arguments(&self) -> Vec<&str> {
        let mut result = Vec::new();
        collect_arguments(&self.body, &mut result);
        result
    }

    /// Collect all node-spawning actions (SpawnNode, ExecuteProcess).
    pub fn all_nodes(&self) -> Vec<&Action> {
        let mut result = Vec::new();
        collect_nodes(&self.body, &mut result);
        result
    }

    /// Find the first node running `executable`, with its condition.
    pub fn find_node(&self, executable: &str) -> Option<(&NodeDecl, Option<&Condition>)> {
        self.all_nodes()
            .into_iter()
            .find_map(|action| match &action.kind {
                ActionKind::SpawnNode(node) if node.executable == executable => {
                    Some((node, action.condition.as_ref()))
                }
                _ => None,
            })
    }

    /// Context with invocation overrides applied over declared defaults.
    pub fn launch_context(&self) -> LaunchContext {
        let mut context = LaunchContext::with_overrides(
            self.launch_arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        declare_arguments(&self.body, &mut context);
        context
    }
}

fn declare_arguments(actions: &[Action], context: &mut LaunchContext) {
    for action in actions {
        match &action.kind {
            ActionKind::DeclareArgument {
                name,
                default,
                description,
            } => context.declare_argument(ArgumentMetadata {
                name: name.clone(),
                default: default.clone(),
                description: description.clone(),
            }),
            ActionKind::Timer { actions, .. } => declare_arguments(actions, context),
            _ => {}
        }
    }
}

fn collect_arguments<'a>(actions: &'a [Action], out: &mut Vec<&'a str>) {
    for action in actions {
        match &action.kind {
            ActionKind::DeclareArgument { name, .. } => {
                out.push(name.as_str());
            }
            ActionKind::Timer { actions, .. } => {
                collect_arguments(actions, out);
            }
            _ => {}
        }
    }
}

fn collect_nodes<'a>(actions: &'a [Action], out: &mut Vec<&'a Action>) {
    for action in actions {
        match &action.kind {
            ActionKind::SpawnNode(_) | ActionKind::ExecuteProcess(_) => {
                out.push(action);
            }
            ActionKind::Timer { actions, .. } => {
                collect_nodes(actions, out);
            }
            _ => {}
        }
    }
}
