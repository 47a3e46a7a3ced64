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

use thiserror::Error;

/// Errors raised while talking to the Satellite API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server could not be reached (DNS, TCP, TLS, timeout)
    #[error("Cannot connect to the API at {url}: {message}")]
    Connection { url: String, message: String },
    /// The server rejected the supplied credentials
    #[error("Authentication failed for {url} (HTTP {status})")]
    Authentication { url: String, status: u16 },
    /// Any other non-success HTTP status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// The response body was not the JSON shape we expected
    ///
    /// `resource` is the request URL or, for payload shape errors, the
    /// resource name.
    #[error("Failed to decode {resource}: {message}")]
    Decode { resource: String, message: String },
    /// The HTTP client itself could not be built
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),
}

impl ApiError {
    /// True when the failure has a known network or HTTP cause
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ApiError::Connection { .. } | ApiError::Authentication { .. } | ApiError::Status { .. }
        )
    }
}

/// Errors specific to writing report output
#[derive(Debug, Error)]
pub enum PublishError {
    /// Filesystem operation failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    /// CSV encoding or flushing failed
    #[error("CSV write failed: {0}")]
    Csv(String),
    /// Serialization failed
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<csv::Error> for PublishError {
    fn from(err: csv::Error) -> Self {
        PublishError::Csv(err.to_string())
    }
}

/// Errors that abort report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// The initial system listing failed
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The report sink could not be written
    #[error(transparent)]
    Publish(#[from] PublishError),
    /// Required settings were not given
    #[error("Missing required options: {0}")]
    MissingSettings(String),
    /// Settings are present but malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ReportError {
    /// Process exit code for this failure
    ///
    /// `1` for missing arguments and for connection, authentication or HTTP
    /// status failures; `2` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Api(err) if err.is_connectivity() => 1,
            ReportError::MissingSettings(_) | ReportError::InvalidConfiguration(_) => 1,
            _ => 2,
        }
    }
}
