use savedsearch_core::paths::SAVEDSEARCH_DIR;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `SAVEDSEARCH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.savedsearch/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marked_ancestor(&cwd).unwrap_or(cwd)
}

fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(SAVEDSEARCH_DIR).is_dir())
        .map(Path::to_path_buf)
}
