//! Report output port.

use std::path::Path;

use crate::domain::analytics::AnalyticsReport;
use crate::domain::error::TradescopeError;

/// Port for writing computed analytics.
pub trait ReportPort {
    fn write(&self, report: &AnalyticsReport, output_path: &Path) -> Result<(), TradescopeError>;
}
