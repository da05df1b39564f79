//! Sources that produce a [`DashboardPayload`] for `(scope, dashboard_id)`

pub mod file_source;
pub mod http_source;

pub use file_source::FileDashboardSource;
pub use http_source::HttpDashboardSource;

use async_trait::async_trait;
use dash_core::{DashboardPayload, DashboardScope};

use crate::DataError;

/// Trait for dashboard payload sources
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Fetch the configuration and data for one dashboard
    async fn fetch(&self, scope: &DashboardScope, dashboard_id: &str) -> Result<DashboardPayload, DataError>;

    /// Get the source name for logging
    fn source_name(&self) -> &str;
}
