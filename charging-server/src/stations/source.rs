//! Where the station list comes from.

use std::path::PathBuf;

use super::client::StationClient;
use super::error::StationError;
use super::types::{Station, parse_station_list};

/// Origin of the station list.
#[derive(Debug, Clone)]
pub enum StationSource {
    /// The live upstream feed.
    Live(StationClient),

    /// A JSON file on disk, in the upstream envelope or as a bare array.
    /// Useful for offline development and tests.
    File(PathBuf),
}

impl StationSource {
    /// Load the complete station list.
    pub async fn load(&self) -> Result<Vec<Station>, StationError> {
        match self {
            StationSource::Live(client) => client.fetch_all().await,
            StationSource::File(path) => {
                let contents =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|e| StationError::Io {
                            path: path.display().to_string(),
                            message: e.to_string(),
                        })?;
                parse_station_list(&contents).map_err(|e| StationError::Json {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            StationSource::Live(_) => "upstream feed".to_string(),
            StationSource::File(path) => format!("file {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(
            &path,
            r#"{"data": {"stations": [{"id": 1, "latitude": 1.0, "longitude": 1.0}]}}"#,
        )
        .unwrap();

        let stations = StationSource::File(path).load().await.unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = StationSource::File("/nonexistent/stations.json".into());
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, StationError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, "{").unwrap();

        let err = StationSource::File(path).load().await.unwrap_err();
        assert!(matches!(err, StationError::Json { .. }));
    }
}
