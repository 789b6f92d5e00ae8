use std::path::{Path, PathBuf};

use cov_config::PROJECT_DIR;

/// Nearest ancestor of `start` (inclusive) holding a `.covboard` directory.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}
