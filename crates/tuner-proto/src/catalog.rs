use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::station::Station;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read station list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered, read-only list of stations.  Order defines cursor navigation and
/// rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// The list used when no station file exists.
    pub fn builtin() -> Self {
        Self::new(vec![
            Station::new("WBEZ 91.5", "http://stream.wbez.org/wbez128.mp3"),
            Station::new(
                "WGN",
                "http://provisioning.streamtheworld.com/pls/WGNPLUSAM.pls",
            ),
        ])
    }

    pub fn get(&self, idx: usize) -> Option<&Station> {
        self.stations.get(idx)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }
}

/// Parse one `name,stream_locator` line.  Anything that does not split into
/// exactly two comma-separated fields is rejected.
pub fn parse_station_line(line: &str) -> Option<Station> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split(',');
    let name = fields.next()?;
    let url = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Station::new(name.trim(), url.trim()))
}

pub fn parse_stations_from_str(content: &str) -> StationCatalog {
    let mut stations = Vec::new();
    let mut skipped = 0usize;
    for line in content.lines() {
        match parse_station_line(line) {
            Some(station) => stations.push(station),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("station list: skipped {} malformed line(s)", skipped);
    }
    StationCatalog::new(stations)
}

/// Load the station list at `path`, falling back to
/// [`StationCatalog::builtin`] when the file does not exist.
///
/// A file that exists but cannot be read is an error; malformed lines are not.
pub fn load_catalog(path: &Path) -> Result<StationCatalog, CatalogError> {
    if !path.exists() {
        info!(
            "No station list at {}, using built-in stations",
            path.display()
        );
        return Ok(StationCatalog::builtin());
    }

    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_stations_from_str(&content);
    info!(
        "Loaded {} stations from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_both_fields() {
        let station = parse_station_line("WBEZ 91.5, http://stream.wbez.org/wbez128.mp3").unwrap();
        assert_eq!(
            station,
            Station::new("WBEZ 91.5", "http://stream.wbez.org/wbez128.mp3")
        );
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert_eq!(parse_station_line("badline"), None);
        assert_eq!(parse_station_line(""), None);
        assert_eq!(parse_station_line("a,b,c"), None);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let station = parse_station_line("KEXP,http://live-mp3-128.kexp.org/kexp128.mp3\r").unwrap();
        assert_eq!(station.url, "http://live-mp3-128.kexp.org/kexp128.mp3");
    }

    #[test]
    fn test_parse_keeps_order_and_skips_garbage() {
        let catalog = parse_stations_from_str("one,http://a\nnonsense\n\ntwo , http://b\n");
        let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn test_builtin_has_two_stations() {
        let catalog = StationCatalog::builtin();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.get(0).unwrap().is_playlist());
        assert!(catalog.get(1).unwrap().is_playlist());
    }
}
