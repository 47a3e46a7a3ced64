/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::domain::{InventoryReport, ReportConfig, ReportError};
use crate::ports::ReportSink;
use async_trait::async_trait;

/// Primary port - Main interface offered by the inventory reporting domain
///
/// This is what the CLI and library consumers use to produce a report.
#[async_trait]
pub trait InventoryReportingService: Send + Sync {
    /// Inventory every system of an organization
    ///
    /// Rows are handed to `sink` as they are produced; the returned report
    /// carries the aggregate summaries.
    ///
    /// # Arguments
    /// * `config` - Organization and output options
    /// * `sink` - Destination for report rows
    ///
    /// # Returns
    /// * `Ok(InventoryReport)` - Totals for the whole run
    /// * `Err(ReportError)` - The system listing or the sink failed
    async fn generate_report(
        &self,
        config: &ReportConfig,
        sink: &mut dyn ReportSink,
    ) -> Result<InventoryReport, ReportError>;
}
