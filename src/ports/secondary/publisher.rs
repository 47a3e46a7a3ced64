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

use crate::domain::{PublishError, ReportRow};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Secondary port - Destination for report rows
pub trait ReportSink: Send {
    /// Append one row
    fn write_row(&mut self, row: &ReportRow) -> Result<(), PublishError>;

    /// Flush buffered output
    fn finish(&mut self) -> Result<(), PublishError>;
}

/// Secondary port - Storage for raw API payloads (debug dumps)
#[async_trait]
pub trait PayloadRepository: Send + Sync {
    /// Save a payload as JSON
    ///
    /// # Arguments
    /// * `file_name` - Name of the dump file, without directory
    /// * `payload` - The JSON body as received
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Where the payload was written
    /// * `Err(PublishError)` - Error occurred during save
    async fn save_payload(&self, file_name: &str, payload: &Value)
        -> Result<PathBuf, PublishError>;
}
