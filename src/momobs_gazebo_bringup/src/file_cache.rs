//! Configuration file cache

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::{
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Cached file content with modification time
struct CachedFile {
    content: String,
    modified: SystemTime,
}

/// Process-wide cache of parameter files, keyed by path
static FILE_CACHE: Lazy<DashMap<PathBuf, CachedFile>> = Lazy::new(DashMap::new);

/// Read file with caching and modification time validation
pub(crate) fn read_file_cached(path: &Path) -> io::Result<String> {
    let modified = std::fs::metadata(path)?.modified()?;

    if let Some(entry) = FILE_CACHE.get(path) {
        if entry.modified == modified {
            log::trace!("File cache hit: {}", path.display());
            return Ok(entry.content.clone());
        }
    }

    log::debug!("File cache miss: {}", path.display());

    let content = std::fs::read_to_string(path)?;
    FILE_CACHE.insert(
        path.to_path_buf(),
        CachedFile {
            content: content.clone(),
            modified,
        },
    );

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_repeated_reads_agree() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"gait:\n  ros__parameters:\n    nominal_height: 0.5\n")
            .unwrap();
        file.flush().unwrap();

        let first = read_file_cached(file.path()).unwrap();
        let second = read_file_cached(file.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("nominal_height"));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_file_cached(Path::new("/nonexistent/links.yaml")).is_err());
    }
}
