use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    // Use ~/.local/share/airband (XDG standard) on unix rather than the
    // macOS Application Support folder for consistency across platforms.
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("airband")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airband")
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("airband")
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airband")
    }
}

/// Candidate player binaries, in preference order.
#[cfg(unix)]
const PLAYER_CANDIDATES: &[&str] = &["mpv", "vlc", "cvlc"];

#[cfg(windows)]
const PLAYER_CANDIDATES: &[&str] = &["mpv.exe", "vlc.exe"];

/// Locate a native player binary on PATH.
pub fn find_player_binary() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        for candidate in PLAYER_CANDIDATES {
            let full = dir.join(candidate);
            if full.is_file() {
                return Some(full);
            }
        }
    }
    None
}
