use std::{env, path::PathBuf};

pub const CONFIG_FILE: &str = ".runtime-console.toml";

/// Name of the config file inside the platform config directory
const PLATFORM_CONFIG_FILE: &str = "config.toml";

/// Locations searched for a config file, in priority order
///
/// 1. `.runtime-console.toml` in the current working directory
/// 2. `.runtime-console.toml` in the home directory
/// 3. `config.toml` in the platform config directory (see [`crate::paths`])
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    if let Some(dir) = crate::paths::platform_config_dir() {
        candidates.push(dir.join(PLATFORM_CONFIG_FILE));
    }
    candidates
}

/// Load config file content from the first location that has one
///
/// Returns the path together with the file content if found, None otherwise.
pub fn load_config_file() -> Option<(PathBuf, String)> {
    for path in config_file_candidates() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Some((path, content));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cwd_is_searched_first() {
        let candidates = config_file_candidates();
        assert_eq!(candidates[0], PathBuf::from(CONFIG_FILE));
        assert!(candidates.iter().skip(1).all(|path| path.is_absolute()));

        // The platform directory is searched last and not created
        if let Some(dir) = crate::paths::platform_config_dir() {
            assert_eq!(candidates.last(), Some(&dir.join(PLATFORM_CONFIG_FILE)));
        }
    }
}
