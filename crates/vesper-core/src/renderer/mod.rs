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

//! Provides the public, backend-agnostic contracts of the render-view pipeline.
//!
//! This module defines the "common language" of frame orchestration: the
//! [`RendererBackend`] trait a GPU layer implements, the [`RenderView`] trait
//! view strategies implement, and the passes, targets, packets, configuration
//! and errors that flow between them.
//!
//! Following the CLAD architecture, this module defines the 'what'. View
//! strategies live in `vesper-lanes`, the frame orchestrator in
//! `vesper-agents`, and concrete backends in `vesper-infra`.

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod packet;
pub mod pass;
pub mod shader;
pub mod view;

// Re-export the most important traits and types for easier use.
pub use self::backend::{BackendType, DrawCommand, RendererBackend};
pub use self::config::RendererConfig;
pub use self::error::{
    BackendError, ConfigError, FrameError, FrameStage, LifecycleError, RenderError,
    ShapeMismatchError,
};
pub use self::memory::{MemoryRange, RenderBufferType};
pub use self::packet::{
    CameraSnapshot, ExtendedData, GeometryRenderData, MeshInstance, RenderPacket,
    RenderViewPacket, SkyboxPacketData, UiPacketData, ViewPacketData, ViewPacketInput,
    WorldPacketData,
};
pub use self::pass::{
    AttachmentKind, AttachmentSource, ClearFlags, RenderPass, RenderPassConfig, RenderPassId,
    RenderPassRegistry, RenderTarget, RenderTargetAttachmentConfig, RenderTargetConfig,
};
pub use self::view::{
    PacketCounter, ProjectionMatrixSource, ProjectionParams, RenderView, RenderViewConfig,
    RenderViewId, RenderViewKind, RenderViewPassConfig, RenderViewState, ViewMatrixSource,
};
