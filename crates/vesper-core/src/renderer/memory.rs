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

//! Buffer-side value types shared with backends.

use serde::{Deserialize, Serialize};

/// A byte range inside a buffer.
///
/// Ranges are not validated here. The owner of the buffer checks that
/// `offset + size` fits, typically through [`MemoryRange::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MemoryRange {
    /// Start of the range, in bytes.
    pub offset: u64,
    /// Length of the range, in bytes.
    pub size: u64,
}

impl MemoryRange {
    /// Creates a new range.
    pub const fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// The first byte past the range, or `None` if `offset + size` overflows.
    pub const fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }
}

/// What a buffer-like resource is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBufferType {
    /// Not yet classified.
    #[default]
    Unknown,
    /// Vertex data.
    Vertex,
    /// Index data.
    Index,
    /// Uniform (constant) data.
    Uniform,
    /// Host-visible staging memory for uploads.
    Staging,
    /// Host-visible memory for readbacks.
    Read,
    /// General-purpose storage data.
    Storage,
}
