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

//! File-based repository for raw API payload dumps

use crate::domain::PublishError;
use crate::ports::PayloadRepository;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;

/// File system repository writing payloads under one directory
pub struct FileSystemRepository {
    output_dir: PathBuf,
}

impl FileSystemRepository {
    /// Create a new file system repository
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Default for FileSystemRepository {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl PayloadRepository for FileSystemRepository {
    async fn save_payload(
        &self,
        file_name: &str,
        payload: &Value,
    ) -> Result<PathBuf, PublishError> {
        let json_string = serde_json::to_string_pretty(payload).map_err(|e| {
            PublishError::Serialization(format!("JSON serialization failed: {}", e))
        })?;

        // Ensure the output directory exists
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PublishError::Io {
                path: self.output_dir.display().to_string(),
                message: e.to_string(),
            })?;

        let path = self.output_dir.join(file_name);
        fs::write(&path, json_string)
            .await
            .map_err(|e| PublishError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_payload() {
        let temp_dir = tempdir().unwrap();
        let repository = FileSystemRepository::new(temp_dir.path());
        let payload = json!({"results": [{"uuid": "u1", "name": "host1"}]});

        let path = repository
            .save_payload("ACME_all_systems-output.json", &payload)
            .await
            .unwrap();

        assert_eq!(path, temp_dir.path().join("ACME_all_systems-output.json"));
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, payload);
    }

    #[tokio::test]
    async fn test_create_directory() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("nested").join("dumps");
        let repository = FileSystemRepository::new(&nested);

        repository
            .save_payload("ACME_u1_system-facts.json", &json!({"subtotal": 0}))
            .await
            .unwrap();

        assert!(nested.join("ACME_u1_system-facts.json").exists());
    }
}
