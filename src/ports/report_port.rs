//! Dashboard output port trait.

use std::path::Path;

use crate::domain::dashboard::Dashboard;
use crate::domain::error::StockscopeError;

/// Port for writing a rendered dashboard somewhere a browser can open it.
pub trait ReportPort {
    fn write(&self, dashboard: &Dashboard, output_path: &Path) -> Result<(), StockscopeError>;
}
