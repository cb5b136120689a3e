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

//! Opaque handles into the resource system.
//!
//! The render pipeline never owns textures, geometry or shaders. It only holds
//! these small, copyable identifiers and hands them back to the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A handle to a texture owned by the resource system.
///
/// Render target attachments are lists of these. Dropping a handle never frees
/// the texture behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(Uuid);

impl TextureHandle {
    /// Creates a new, random (version 4) `TextureHandle`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing identifier.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying identifier.
    pub const fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture:{}", self.0)
    }
}

/// A handle to uploaded geometry (vertex and index data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryHandle(Uuid);

impl GeometryHandle {
    /// Creates a new, random (version 4) `GeometryHandle`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying identifier.
    pub const fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GeometryHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle to a skybox (cube map plus its geometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkyboxHandle(Uuid);

impl SkyboxHandle {
    /// Creates a new, random (version 4) `SkyboxHandle`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying identifier.
    pub const fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SkyboxHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies a shader program the backend has already loaded.
///
/// Obtained from [`RendererBackend::resolve_shader`](crate::renderer::RendererBackend::resolve_shader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);
