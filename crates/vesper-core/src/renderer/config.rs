// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Serialized renderer configuration.
//!
//! A [`RendererConfig`] lists every pass and every view of an application. It
//! is usually stored as JSON:
//!
//! ```json
//! {
//!   "app_name": "demo",
//!   "passes": [
//!     { "name": "shadow", "next_name": "main", "render_area": [0, 0, 2048, 2048],
//!       "target": { "attachments": [{ "kind": "depth" }], "sync_to_window_size": false } },
//!     { "name": "main", "prev_name": "shadow", "render_area": [0, 0, 1280, 720],
//!       "clear_flags": 3 }
//!   ],
//!   "views": [
//!     { "name": "world", "view_type": "world", "passes": [{ "name": "shadow" }, { "name": "main" }] }
//!   ]
//! }
//! ```

use super::error::ConfigError;
use super::pass::RenderPassConfig;
use super::view::RenderViewConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The passes and views of an application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Application name handed to the backend on initialization.
    #[serde(default)]
    pub app_name: String,
    /// Every pass any view may reference.
    #[serde(default)]
    pub passes: Vec<RenderPassConfig>,
    /// The views, in creation order.
    #[serde(default)]
    pub views: Vec<RenderViewConfig>,
}

impl RendererConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Looks up a pass configuration by name.
    pub fn pass(&self, name: &str) -> Option<&RenderPassConfig> {
        self.passes.iter().find(|p| p.name == name)
    }
}
