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

use crate::domain::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// Secondary port - Satellite REST API
///
/// Each call returns the decoded JSON body so the caller can both dump the
/// raw payload and parse it into domain types.
#[async_trait]
pub trait SatelliteApi: Send + Sync {
    /// `GET /katello/api/v2/systems` scoped to an organization
    async fn list_systems(&self, orgid: &str) -> Result<Value, ApiError>;

    /// `GET /katello/api/v2/systems/{uuid}?fields=full`
    async fn get_system_detail(&self, uuid: &str) -> Result<Value, ApiError>;

    /// `GET /katello/api/v2/systems/{uuid}/subscriptions`
    async fn get_subscriptions(&self, uuid: &str) -> Result<Value, ApiError>;

    /// `GET /api/v2/hosts/{hostname}/facts`
    async fn get_facts(&self, hostname: &str) -> Result<Value, ApiError>;
}
