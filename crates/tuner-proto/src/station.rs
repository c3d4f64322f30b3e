/// A named reference to a remote audio stream or playlist file.
///
/// Stations are immutable once loaded; their identity is their position in
/// the [`StationCatalog`](crate::catalog::StationCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Station {
    pub name: String,
    /// Stream URL or playlist path handed verbatim to the player.
    pub url: String,
}

impl Station {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// True when the locator points at a playlist (`.m3u` / `.pls`) rather
    /// than a direct stream.
    pub fn is_playlist(&self) -> bool {
        is_playlist_locator(&self.url)
    }
}

pub fn is_playlist_locator(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.ends_with(".m3u") || lower.ends_with(".pls")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_suffixes() {
        assert!(is_playlist_locator(
            "http://provisioning.streamtheworld.com/pls/WGNPLUSAM.pls"
        ));
        assert!(is_playlist_locator("/home/me/radio/list.M3U"));
        assert!(!is_playlist_locator("http://stream.wbez.org/wbez128.mp3"));
        assert!(!is_playlist_locator("http://example.com/live.m3u8"));
    }
}
