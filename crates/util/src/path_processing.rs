use std::path::{Path, PathBuf};

use dirs_next::home_dir;

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Nearest ancestor of `start` (inclusive) that contains a `.git` entry.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| dir.join(".git").exists()).map(Path::to_path_buf)
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn project_root_is_nearest_git_ancestor() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).as_deref(), Some(dir.path()));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/project");
        assert_eq!(resolve_against(base, "out/yaml"), PathBuf::from("/srv/project/out/yaml"));
        assert_eq!(resolve_against(base, "/abs/dir"), PathBuf::from("/abs/dir"));
    }
}
