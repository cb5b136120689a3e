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

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "vesper_agents=debug,vesper_infra=warn"). When it is `None`, `RUST_LOG` is
/// used, and `info` when that is unset too.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit filter, taking precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    /// ANSI colouring behaviour.
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = match config.env_filter {
            Some(filter) => {
                let mut builder = env_logger::Builder::new();
                builder.parse_filters(&filter);
                builder
            }
            None => env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            ),
        };
        builder.write_style(config.write_style);

        // Another logger may already be installed (test harnesses, embedders).
        if builder.try_init().is_err() {
            log::debug!("a global logger was already installed");
            return;
        }
        log::debug!("logging initialized");
    });
}
