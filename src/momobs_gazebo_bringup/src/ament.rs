//! Installed package lookup (ament resource index)

use crate::error::{LaunchError, Result};
use std::path::{Path, PathBuf};

/// Distributions probed when neither `AMENT_PREFIX_PATH` nor `ROS_DISTRO` locate a package
const FALLBACK_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// Locates installed ROS 2 packages
pub trait PackageLocator {
    /// Install prefix containing `package`, if installed
    fn find_prefix(&self, package: &str) -> Option<PathBuf>;

    /// `<prefix>/share/<package>`, failing with `ResourceNotFound` when absent
    fn get_package_share_directory(&self, package: &str) -> Result<PathBuf> {
        self.find_prefix(package)
            .map(|prefix| prefix.join("share").join(package))
            .ok_or_else(|| LaunchError::ResourceNotFound(package.to_string()))
    }

    /// `<prefix>/lib/<package>`, where ROS 2 installs a package's executables
    fn package_lib_directory(&self, package: &str) -> Option<PathBuf> {
        self.find_prefix(package)
            .map(|prefix| prefix.join("lib").join(package))
    }
}

/// Ordered list of install prefixes searched like the ament index
#[derive(Debug, Clone, Default)]
pub struct AmentIndex {
    prefixes: Vec<PathBuf>,
}

impl AmentIndex {
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Build the search path from `AMENT_PREFIX_PATH`, then `/opt/ros/$ROS_DISTRO`,
    /// then the well-known distributions
    pub fn from_env() -> Self {
        let mut prefixes: Vec<PathBuf> = Vec::new();

        if let Some(prefix_path) = std::env::var_os("AMENT_PREFIX_PATH") {
            prefixes.extend(
                std::env::split_paths(&prefix_path).filter(|p| !p.as_os_str().is_empty()),
            );
        }

        if let Ok(distro) = std::env::var("ROS_DISTRO") {
            prefixes.push(PathBuf::from("/opt/ros").join(distro));
        }

        for distro in FALLBACK_DISTROS {
            let prefix = PathBuf::from("/opt/ros").join(distro);
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }

        log::debug!("Ament search path: {:?}", prefixes);
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }
}

impl PackageLocator for AmentIndex {
    fn find_prefix(&self, package: &str) -> Option<PathBuf> {
        let found = self
            .prefixes
            .iter()
            .find(|prefix| is_installed_in(prefix, package))
            .cloned();

        match &found {
            Some(prefix) => log::trace!("Found package {} in {}", package, prefix.display()),
            None => log::debug!("Package {} not found in any prefix", package),
        }
        found
    }
}

/// A package counts as installed when it is registered in the resource index
/// or its share directory exists
fn is_installed_in(prefix: &Path, package: &str) -> bool {
    let marker = prefix
        .join("share/ament_index/resource_index/packages")
        .join(package);
    marker.exists() || prefix.join("share").join(package).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_share_directory() {
        let prefix = TempDir::new().unwrap();
        fs::create_dir_all(prefix.path().join("share/momobs_ros2")).unwrap();

        let index = AmentIndex::new(vec![prefix.path().to_path_buf()]);
        let share = index.get_package_share_directory("momobs_ros2").unwrap();
        assert_eq!(share, prefix.path().join("share/momobs_ros2"));
    }

    #[test]
    fn test_resource_index_marker() {
        let prefix = TempDir::new().unwrap();
        let marker_dir = prefix
            .path()
            .join("share/ament_index/resource_index/packages");
        fs::create_dir_all(&marker_dir).unwrap();
        fs::write(marker_dir.join("champ_base"), "").unwrap();

        let index = AmentIndex::new(vec![prefix.path().to_path_buf()]);
        assert_eq!(
            index.package_lib_directory("champ_base"),
            Some(prefix.path().join("lib/champ_base"))
        );
    }

    #[test]
    fn test_first_prefix_wins() {
        let overlay = TempDir::new().unwrap();
        let underlay = TempDir::new().unwrap();
        fs::create_dir_all(overlay.path().join("share/anymal_c_config")).unwrap();
        fs::create_dir_all(underlay.path().join("share/anymal_c_config")).unwrap();

        let index = AmentIndex::new(vec![
            overlay.path().to_path_buf(),
            underlay.path().to_path_buf(),
        ]);
        assert_eq!(index.prefixes().len(), 2);
        assert_eq!(
            index.find_prefix("anymal_c_config"),
            Some(overlay.path().to_path_buf())
        );
    }

    #[test]
    fn test_missing_package() {
        let prefix = TempDir::new().unwrap();
        let index = AmentIndex::new(vec![prefix.path().to_path_buf()]);

        match index.get_package_share_directory("does_not_exist") {
            Err(LaunchError::ResourceNotFound(pkg)) => assert_eq!(pkg, "does_not_exist"),
            other => panic!("Expected ResourceNotFound, got {:?}", other),
        }
    }
}
