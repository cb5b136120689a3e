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

//! Defines the hierarchy of error types for the render-view pipeline.

use super::pass::AttachmentKind;
use super::view::{RenderViewKind, ViewMatrixSource};
use crate::math::Rect;
use std::fmt;

/// An error in a pass, view, or renderer configuration.
///
/// These are raised while building passes and views, before anything reaches
/// the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The render area of a pass has a non-positive width or height.
    DegenerateRenderArea {
        /// The name of the offending pass.
        pass: String,
        /// The rejected area.
        area: Rect,
    },
    /// The clear flags of a pass contain bits outside colour/depth/stencil.
    InvalidClearFlags {
        /// The name of the offending pass.
        pass: String,
        /// The raw bits that were supplied.
        bits: u8,
    },
    /// A view was configured without any pass.
    EmptyPassList {
        /// The name of the offending view.
        view: String,
    },
    /// A view references a pass name that has no configuration.
    UnknownPass {
        /// The view holding the reference.
        view: String,
        /// The missing pass name.
        pass: String,
    },
    /// A pass's `prev_name` or `next_name` does not name a pass of the same view.
    UnresolvedPassLink {
        /// The pass holding the link.
        pass: String,
        /// The name that could not be resolved.
        link: String,
    },
    /// A view with this name is already registered.
    DuplicateView {
        /// The duplicated view name.
        view: String,
    },
    /// A live pass with this name is already registered.
    DuplicatePass {
        /// The duplicated pass name.
        pass: String,
    },
    /// A render target attachment could not be resolved from the backend.
    UnresolvedAttachment {
        /// The pass owning the target.
        pass: String,
        /// The frame-in-flight index of the target.
        target_index: usize,
        /// The kind of attachment that was requested.
        kind: AttachmentKind,
    },
    /// Every slot of the pass registry holds a live or retired pass.
    PassIdsExhausted,
    /// The renderer handed out every view identifier.
    ViewIdsExhausted,
    /// A configuration file could not be read.
    Io {
        /// The path that failed to load.
        path: String,
        /// The underlying I/O error, rendered to text.
        message: String,
    },
    /// A configuration document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DegenerateRenderArea { pass, area } => write!(
                f,
                "Render pass '{pass}' has a degenerate render area ({}x{})",
                area.width, area.height
            ),
            ConfigError::InvalidClearFlags { pass, bits } => {
                write!(f, "Render pass '{pass}' has invalid clear flags {bits:#04x}")
            }
            ConfigError::EmptyPassList { view } => {
                write!(f, "Render view '{view}' has no passes")
            }
            ConfigError::UnknownPass { view, pass } => {
                write!(f, "Render view '{view}' references unknown pass '{pass}'")
            }
            ConfigError::UnresolvedPassLink { pass, link } => {
                write!(f, "Render pass '{pass}' links to unknown pass '{link}'")
            }
            ConfigError::DuplicateView { view } => {
                write!(f, "A render view named '{view}' is already registered")
            }
            ConfigError::DuplicatePass { pass } => {
                write!(f, "A render pass named '{pass}' is already registered")
            }
            ConfigError::UnresolvedAttachment {
                pass,
                target_index,
                kind,
            } => write!(
                f,
                "Render pass '{pass}': no {kind:?} attachment available for target {target_index}"
            ),
            ConfigError::PassIdsExhausted => write!(f, "No render pass identifiers left"),
            ConfigError::ViewIdsExhausted => write!(f, "No render view identifiers left"),
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read configuration '{path}': {message}")
            }
            ConfigError::Parse(msg) => write!(f, "Failed to parse configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An error reported by a [`RendererBackend`](super::RendererBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// A human readable description of the failure.
    pub message: String,
    /// `false` when the device is gone and no further frame can be rendered.
    pub recoverable: bool,
}

impl BackendError {
    /// A failure that loses the current operation but leaves the device usable.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recoverable: true,
        }
    }

    /// A failure after which the device cannot be used anymore.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recoverable: false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recoverable {
            write!(f, "Backend error: {}", self.message)
        } else {
            write!(f, "Unrecoverable backend error: {}", self.message)
        }
    }
}

impl std::error::Error for BackendError {}

/// Packet data handed to a view does not match the view's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatchError {
    /// The view that rejected the data.
    pub view: String,
    /// The kind of data the view accepts.
    pub expected: RenderViewKind,
    /// The kind of data that was supplied.
    pub received: RenderViewKind,
}

impl fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Render view '{}' expected {} packet data, got {}",
            self.view, self.expected, self.received
        )
    }
}

impl std::error::Error for ShapeMismatchError {}

/// A renderer operation was called in a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// The renderer has not been initialized.
    NotInitialized,
    /// The renderer has been shut down.
    AlreadyShutdown,
    /// `begin_frame` was called while a frame is already open.
    FrameAlreadyBegun,
    /// `end_frame` was called without an open frame.
    FrameNotBegun,
    /// The backend lost its device. Only shutdown is allowed.
    DeviceLost,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotInitialized => write!(f, "The renderer is not initialized."),
            LifecycleError::AlreadyShutdown => write!(f, "The renderer has been shut down."),
            LifecycleError::FrameAlreadyBegun => write!(f, "A frame has already been begun."),
            LifecycleError::FrameNotBegun => write!(f, "No frame has been begun."),
            LifecycleError::DeviceLost => write!(f, "The graphics device was lost."),
        }
    }
}

impl std::error::Error for LifecycleError {}

/// The step of [`draw_frame`](RenderError::Frame) that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStage {
    /// Building the packet of the named view.
    BuildPacket(String),
    /// Opening the frame on the backend.
    BeginFrame,
    /// Rendering the named view.
    RenderView(String),
    /// Closing the frame on the backend.
    EndFrame,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStage::BuildPacket(view) => write!(f, "build packet for view '{view}'"),
            FrameStage::BeginFrame => write!(f, "begin frame"),
            FrameStage::RenderView(view) => write!(f, "render view '{view}'"),
            FrameStage::EndFrame => write!(f, "end frame"),
        }
    }
}

/// A frame that could not be drawn completely.
#[derive(Debug)]
pub struct FrameError {
    /// The frame that failed.
    pub frame_number: u64,
    /// Where it failed.
    pub stage: FrameStage,
    /// The underlying failure.
    pub source: Box<RenderError>,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {} failed during {}: {}",
            self.frame_number, self.stage, self.source
        )
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// A high-level error of the render-view pipeline.
#[derive(Debug)]
pub enum RenderError {
    /// Invalid pass, view or renderer configuration.
    Config(ConfigError),
    /// The backend rejected an operation.
    Backend(BackendError),
    /// A view was handed packet data of the wrong kind.
    ShapeMismatch(ShapeMismatchError),
    /// The renderer was used out of order.
    Lifecycle(LifecycleError),
    /// Backend initialization failed. Every caller of `initialize` sees this.
    InitializationFailed(String),
    /// A view refused to be created.
    ViewCreationFailed {
        /// The name of the view.
        view: String,
    },
    /// A view failed to submit its passes.
    ViewRenderFailed {
        /// The name of the view.
        view: String,
    },
    /// The frame did not supply the camera a view renders from.
    MissingCamera {
        /// The name of the view.
        view: String,
        /// The configured view matrix source.
        source: ViewMatrixSource,
    },
    /// No view with this name is registered.
    UnknownView(String),
    /// A frame could not be drawn.
    Frame(FrameError),
}

impl RenderError {
    /// Returns `true` when this error means the backend device is gone.
    pub fn is_device_lost(&self) -> bool {
        match self {
            RenderError::Backend(err) => !err.recoverable,
            RenderError::Lifecycle(LifecycleError::DeviceLost) => true,
            RenderError::Frame(err) => err.source.is_device_lost(),
            _ => false,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(err) => write!(f, "Configuration error: {err}"),
            RenderError::Backend(err) => write!(f, "{err}"),
            RenderError::ShapeMismatch(err) => write!(f, "{err}"),
            RenderError::Lifecycle(err) => write!(f, "Lifecycle error: {err}"),
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize renderer backend: {msg}")
            }
            RenderError::ViewCreationFailed { view } => {
                write!(f, "Render view '{view}' could not be created")
            }
            RenderError::ViewRenderFailed { view } => {
                write!(f, "Render view '{view}' failed to render")
            }
            RenderError::MissingCamera { view, source } => {
                write!(f, "Render view '{view}' needs a {source:?} but none was supplied")
            }
            RenderError::UnknownView(view) => write!(f, "Unknown render view '{view}'"),
            RenderError::Frame(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Config(err) => Some(err),
            RenderError::Backend(err) => Some(err),
            RenderError::ShapeMismatch(err) => Some(err),
            RenderError::Lifecycle(err) => Some(err),
            RenderError::Frame(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for RenderError {
    fn from(err: ConfigError) -> Self {
        RenderError::Config(err)
    }
}

impl From<BackendError> for RenderError {
    fn from(err: BackendError) -> Self {
        RenderError::Backend(err)
    }
}

impl From<ShapeMismatchError> for RenderError {
    fn from(err: ShapeMismatchError) -> Self {
        RenderError::ShapeMismatch(err)
    }
}

impl From<LifecycleError> for RenderError {
    fn from(err: LifecycleError) -> Self {
        RenderError::Lifecycle(err)
    }
}

impl From<FrameError> for RenderError {
    fn from(err: FrameError) -> Self {
        RenderError::Frame(err)
    }
}
