//! Parameter file loading

use crate::{error::GenerationError, file_cache::read_file_cached};
use serde_yaml::Value;
use std::path::Path;

/// Load parameters from a ROS 2 parameter YAML file
pub fn load_param_file(path: &Path) -> Result<Vec<(String, String)>, GenerationError> {
    let content = read_file_cached(path)?;
    parse_param_yaml(&content)
}

/// Flatten every node's `ros__parameters` section into `(name, value)` pairs.
///
/// ROS 2 parameter files have the structure:
/// ```yaml
/// node_name:        # or /** for every node
///   ros__parameters:
///     param1: value1
///     nested:
///       param2: value2
/// ```
pub fn parse_param_yaml(content: &str) -> Result<Vec<(String, String)>, GenerationError> {
    let yaml: Value = serde_yaml::from_str(content)
        .map_err(|e| GenerationError::ParamFile(format!("YAML parse error: {}", e)))?;

    let mut params = Vec::new();

    if let Value::Mapping(root_map) = yaml {
        for (_node_name, node_value) in root_map.iter() {
            if let Value::Mapping(node_map) = node_value {
                if let Some(Value::Mapping(params_map)) = node_map.get("ros__parameters") {
                    flatten_params("", params_map, &mut params);
                }
            }
        }
    }

    Ok(params)
}

/// Recursively flatten nested parameter maps
fn flatten_params(prefix: &str, map: &serde_yaml::Mapping, output: &mut Vec<(String, String)>) {
    for (key, value) in map.iter() {
        let Value::String(key_str) = key else {
            continue;
        };
        let full_key = if prefix.is_empty() {
            key_str.clone()
        } else {
            format!("{}.{}", prefix, key_str)
        };

        match value {
            Value::Mapping(nested_map) => flatten_params(&full_key, nested_map, output),
            Value::String(s) => output.push((full_key, s.clone())),
            Value::Number(n) => output.push((full_key, n.to_string())),
            Value::Bool(b) => output.push((full_key, b.to_string())),
            Value::Sequence(seq) => {
                // Arrays get serialized as JSON
                let json_str =
                    serde_json::to_string(seq).unwrap_or_else(|_| format!("{:?}", seq));
                output.push((full_key, json_str));
            }
            Value::Null => output.push((full_key, "null".to_string())),
            Value::Tagged(tagged) => output.push((full_key, format!("{:?}", tagged.value))),
        }
    }
}
