//! Shared fixtures for integration tests

#![allow(dead_code)]

use momobs_gazebo_bringup::sequencer;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Helper to get fixture path from crate tests directory
pub fn get_fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

pub fn install(prefix: &Path, package: &str, files: &[(&str, Option<&str>)]) {
    let share = prefix.join("share").join(package);
    fs::create_dir_all(&share).unwrap();
    for (relative, fixture) in files {
        let target = share.join(relative);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        match fixture {
            Some(fixture) => {
                fs::copy(get_fixture_path(fixture), &target).unwrap();
            }
            None => fs::write(&target, "").unwrap(),
        }
    }
}

/// Build a throwaway install prefix holding the three required packages,
/// optionally leaving one out.
pub fn workspace_without(missing: Option<&str>) -> TempDir {
    let prefix = TempDir::new().unwrap();
    let packages: [(&str, Vec<(&str, Option<&str>)>); 3] = [
        (
            sequencer::DESCRIPTION_PACKAGE,
            vec![
                ("launch/floating_base_description.launch.py", None),
                ("launch/gazebo_description.launch.py", None),
                ("urdf/anymal_main.xacro", Some("urdf/anymal_main.xacro")),
            ],
        ),
        (
            sequencer::BRIDGE_PACKAGE,
            vec![("launch/gazebo_wrapper.launch.py", None)],
        ),
        (
            sequencer::CONFIG_PACKAGE,
            vec![
                ("config/joints/joints.yaml", Some("config/joints.yaml")),
                ("config/gait/gait.yaml", Some("config/gait.yaml")),
                ("config/links/links.yaml", Some("config/links.yaml")),
            ],
        ),
    ];
    for (package, files) in packages {
        if Some(package) != missing {
            install(prefix.path(), package, &files);
        }
    }
    prefix
}

