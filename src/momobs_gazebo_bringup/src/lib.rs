//! momobs_gazebo_bringup library
//!
//! Builds the Gazebo bringup launch sequence for the ANYmal C quadruped and
//! turns it into records an external launch executor can run.

pub mod ament;
pub mod condition;
pub mod description;
pub mod error;
pub mod ir;
pub mod params;
pub mod record;
pub mod sequencer;
pub mod substitution;

mod file_cache;

pub use record::{generate_record, RecordJson};
pub use sequencer::{LaunchFlags, LaunchSequencer};
