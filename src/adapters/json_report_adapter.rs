//! JSON report writer.

use crate::domain::analytics::AnalyticsReport;
use crate::domain::error::TradescopeError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(&self, report: &AnalyticsReport) -> Result<String, TradescopeError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.map_err(|e| TradescopeError::Report {
            reason: format!("failed to serialize report: {}", e),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &AnalyticsReport, output_path: &Path) -> Result<(), TradescopeError> {
        let content = self.render(report)?;
        fs::write(output_path, content).map_err(|e| TradescopeError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        tracing::info!(path = %output_path.display(), "report written");
        Ok(())
    }
}
