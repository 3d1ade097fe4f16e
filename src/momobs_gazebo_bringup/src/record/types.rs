//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root structure for record.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordJson {
    pub argument: Vec<ArgumentRecord>,
    pub node: Vec<NodeRecord>,
    pub include: Vec<IncludeRecord>,
    pub timer: Vec<TimerRecord>,
    pub file_data: HashMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Declared launch argument and the value it took for this launch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentRecord {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
}

/// Node or plain process to start, in launch order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: Option<String>,
    pub name: Option<String>,
    pub params: Vec<(String, String)>,
    pub params_files: Vec<String>,
    pub remaps: Vec<(String, String)>,
    pub args: Option<Vec<String>>,
    pub cmd: Vec<String>,
    pub output: Option<String>,
    pub emulate_tty: bool,
    /// Seconds to wait after launch start, for actions nested in a timer
    pub delay: Option<f64>,
}

/// Included launch file, left to the executor to expand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeRecord {
    pub file: String,
}

/// Pacing delay between launch entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerRecord {
    pub period: f64,
    /// Index into `node` of the first record started after the timer
    pub node_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_node(executable: &str) -> NodeRecord {
        NodeRecord {
            executable: executable.to_string(),
            package: None,
            name: None,
            params: vec![],
            params_files: vec![],
            remaps: vec![],
            args: None,
            cmd: vec![executable.to_string()],
            output: None,
            emulate_tty: false,
            delay: None,
        }
    }

    #[test]
    fn test_serialize_empty() {
        let record = RecordJson::new();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"argument\""));
        assert!(json.contains("\"node\""));
        assert!(json.contains("\"include\""));
        assert!(json.contains("\"timer\""));
        assert!(json.contains("\"file_data\""));
    }

    #[test]
    fn test_tuple_serialization() {
        let mut node = bare_node("quadruped_controller_node");
        node.params = vec![
            ("loop_rate".to_string(), "500.0".to_string()),
            ("gazebo".to_string(), "true".to_string()),
        ];

        let json = serde_json::to_string(&node).unwrap();
        // Tuples should serialize as arrays
        assert!(json.contains("[\"loop_rate\",\"500.0\"]"));
        assert!(json.contains("[\"gazebo\",\"true\"]"));
    }

    #[test]
    fn test_deserialize_back() {
        let mut record = RecordJson::new();
        record.node.push(bare_node("gzclient"));
        record.timer.push(TimerRecord {
            period: 1.0,
            node_index: 1,
        });

        let parsed: RecordJson = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(parsed.node[0].executable, "gzclient");
        assert_eq!(parsed.timer[0].node_index, 1);
    }
}
