//! Record module for generating record.json

pub mod generator;
pub mod types;

pub use generator::{generate_record, CommandGenerator};
pub use types::{IncludeRecord, NodeRecord, RecordJson, TimerRecord};
