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

//! Common helpers for rendering loosely typed JSON values

use crate::domain::entities::NOT_AVAILABLE;
use serde_json::Value;

/// Render a JSON value as report text
///
/// # Arguments
/// * `value` - Raw JSON value from an API payload
///
/// # Returns
/// * `Some(String)` - Strings verbatim, scalars and containers as JSON text
/// * `None` - The value is `null`
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Render an optional JSON value, falling back to `NA`
pub fn text_or_na(value: Option<&Value>) -> String {
    value
        .and_then(render_value)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
