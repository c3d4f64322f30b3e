use std::path::{Path, PathBuf};

const APP_DIR: &str = "tuner";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/tuner/ (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(unix)]
fn binary_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(windows)]
fn binary_names(name: &str) -> Vec<String> {
    if name.to_ascii_lowercase().ends_with(".exe") {
        vec![name.to_string()]
    } else {
        vec![format!("{name}.exe"), name.to_string()]
    }
}

fn find_on_path(names: &[String]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        for name in names {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

/// Resolve the player binary.  Anything containing a path separator is taken
/// as a path; a bare name is searched for on PATH.
pub fn find_player_binary(binary: &str) -> Option<PathBuf> {
    let candidate = expand_home(Path::new(binary));
    if candidate.components().count() > 1 {
        return candidate.is_file().then_some(candidate);
    }
    find_on_path(&binary_names(binary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home(Path::new("~/.config/x")), home.join(".config/x"));
        assert_eq!(expand_home(Path::new("/etc/x")), PathBuf::from("/etc/x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_player_binary() {
        assert!(find_player_binary("sh").is_some());
        assert!(find_player_binary("/bin/sh").is_some());
        assert!(find_player_binary("definitely-not-a-player-binary").is_none());
        assert!(find_player_binary("/nonexistent/mplayer").is_none());
    }
}
