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

//! The contract a GPU layer implements to execute frames.

use super::error::BackendError;
use super::packet::GeometryRenderData;
use super::pass::RenderPass;
use crate::math::{Extent2D, Mat4, Vec3, Vec4};
use crate::resource::{ShaderId, SkyboxHandle, TextureHandle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The graphics API a backend drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendType {
    /// Vulkan.
    Vulkan,
    /// Direct3D.
    DirectX,
    /// Metal.
    Metal,
    /// OpenGL.
    OpenGL,
    /// No GPU at all: commands are recorded, not executed.
    Headless,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Vulkan => write!(f, "Vulkan"),
            BackendType::DirectX => write!(f, "DirectX"),
            BackendType::Metal => write!(f, "Metal"),
            BackendType::OpenGL => write!(f, "OpenGL"),
            BackendType::Headless => write!(f, "Headless"),
        }
    }
}

/// A command recorded inside an open render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand<'a> {
    /// Binds a shader and its per-view globals.
    Globals {
        /// The shader to bind.
        shader: ShaderId,
        /// Projection transform.
        projection: Mat4,
        /// World-to-view transform.
        view: Mat4,
        /// Camera position in world space.
        view_position: Vec3,
        /// Ambient light colour.
        ambient_colour: Vec4,
    },
    /// Draws one geometry with its model transform.
    Geometry(&'a GeometryRenderData),
    /// Draws a skybox.
    Skybox(SkyboxHandle),
}

/// The GPU layer as seen by the renderer and its views.
///
/// A backend is created by the renderer on first initialization and is only
/// ever touched from the render thread afterwards.
pub trait RendererBackend: Send {
    /// The graphics API this backend drives.
    fn backend_type(&self) -> BackendType;

    /// Brings up the device and the surface.
    fn initialize(&mut self, app_name: &str) -> Result<(), BackendError>;

    /// Tears down everything `initialize` created.
    fn shutdown(&mut self) -> Result<(), BackendError>;

    /// Notifies the backend that the surface changed size.
    fn resized(&mut self, width: u16, height: u16) -> Result<(), BackendError>;

    /// Opens a frame. On success [`image_index`](Self::image_index) names the
    /// frame in flight to render into.
    fn begin_frame(&mut self, delta_time: f64) -> Result<(), BackendError>;

    /// Closes and presents the frame.
    fn end_frame(&mut self, delta_time: f64) -> Result<(), BackendError>;

    /// The current surface size.
    fn surface_extent(&self) -> Extent2D;

    /// How many frames may be in flight at once. Passes keep one render target
    /// per frame in flight.
    fn frames_in_flight(&self) -> usize;

    /// The frame-in-flight index of the open frame.
    fn image_index(&self) -> usize;

    /// The backend's colour attachment for a frame-in-flight index.
    fn window_attachment(&self, index: usize) -> Option<TextureHandle>;

    /// The backend's depth attachment for a frame-in-flight index.
    fn depth_attachment(&self, index: usize) -> Option<TextureHandle>;

    /// Looks up a loaded shader by name.
    fn resolve_shader(&mut self, name: &str) -> Option<ShaderId>;

    /// Opens `pass` on its target for `target_index`.
    fn begin_renderpass(&mut self, pass: &RenderPass, target_index: usize)
        -> Result<(), BackendError>;

    /// Closes `pass`.
    fn end_renderpass(&mut self, pass: &RenderPass) -> Result<(), BackendError>;

    /// Records a command into the open pass.
    fn submit(&mut self, command: DrawCommand<'_>) -> Result<(), BackendError>;
}
