//! Offline dashboard source reading `{dir}/{dashboard_id}.json`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dash_core::{DashboardPayload, DashboardScope};

use super::DashboardSource;
use crate::DataError;

/// Reads saved payloads from a directory; the scope is not part of the path
pub struct FileDashboardSource {
    dir: PathBuf,
    name: String,
}

impl FileDashboardSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            name: dir.display().to_string(),
            dir,
        }
    }

    pub fn payload_path(&self, dashboard_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", dashboard_id))
    }
}

#[async_trait]
impl DashboardSource for FileDashboardSource {
    async fn fetch(&self, scope: &DashboardScope, dashboard_id: &str) -> Result<DashboardPayload, DataError> {
        let path = self.payload_path(dashboard_id);
        tracing::debug!("Reading {} payload from {}", scope, path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| DataError::Io { path: path.clone(), source })?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_reads_saved_payload() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("overview.json"),
            r#"{"is_available": true, "config": {"charts": [{"id": "c", "chart_type": "pie"}]}, "data": {"charts": {"c": [{"label": "a", "value": 1}]}}}"#,
        )
        .unwrap();

        let source = FileDashboardSource::new(dir.path());
        let payload = source.fetch(&DashboardScope::System, "overview").await.unwrap();
        assert!(payload.is_available);
        assert_eq!(payload.config.charts.len(), 1);
        assert!(payload.data.chart("c").is_some());
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDashboardSource::new(dir.path());

        let missing = source.fetch(&DashboardScope::System, "nope").await.unwrap_err();
        assert!(matches!(missing, DataError::Io { .. }));

        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let bad = source.fetch(&DashboardScope::System, "bad").await.unwrap_err();
        assert!(matches!(bad, DataError::Json(_)));
    }
}
