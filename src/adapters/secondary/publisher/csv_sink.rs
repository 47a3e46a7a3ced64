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

//! CSV sink for the inventory report

use crate::domain::{PublishError, ReportRow};
use crate::ports::ReportSink;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes report rows as fully quoted, comma separated records
///
/// The title row is written on creation, so even a run without rows leaves
/// a valid file behind.
pub struct CsvReportSink<W: Write + Send> {
    writer: Writer<W>,
}

impl CsvReportSink<File> {
    /// Create (or truncate) the report file at `path`
    pub fn create(path: &Path) -> Result<Self, PublishError> {
        let file = File::create(path).map_err(|e| PublishError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_writer(file)
    }
}

impl<W: Write + Send> CsvReportSink<W> {
    pub fn from_writer(inner: W) -> Result<Self, PublishError> {
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .quote_style(QuoteStyle::Always)
            .from_writer(inner);
        writer.write_record(ReportRow::HEADERS)?;
        Ok(Self { writer })
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, PublishError> {
        self.writer
            .into_inner()
            .map_err(|e| PublishError::Csv(e.error().to_string()))
    }
}

impl<W: Write + Send> ReportSink for CsvReportSink<W> {
    fn write_row(&mut self, row: &ReportRow) -> Result<(), PublishError> {
        self.writer.write_record(row.to_record())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PublishError> {
        self.writer
            .flush()
            .map_err(|e| PublishError::Csv(e.to_string()))
    }
}
