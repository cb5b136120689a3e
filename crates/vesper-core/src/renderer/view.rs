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

//! # Render Views
//!
//! A render view turns one slice of the scene (the world, the UI, the skybox)
//! into a [`RenderViewPacket`] each frame and drives its passes on the backend.
//!
//! The behaviour of each kind lives in a strategy implementing [`RenderView`].
//! What every strategy shares (identity, matrix sources, pass list, extent and
//! projection) lives in [`RenderViewState`], built from a [`RenderViewConfig`].

use super::backend::RendererBackend;
use super::error::{ConfigError, RenderError};
use super::packet::{RenderViewPacket, ViewPacketData};
use super::pass::{RenderPassId, RenderPassRegistry};
use super::shader;
use crate::math::{degrees_to_radians, Extent2D, Mat4};
use crate::resource::ShaderId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The closed set of view kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderViewKind {
    /// The 3D scene.
    World,
    /// Screen-space user interface.
    Ui,
    /// The environment cube map behind the scene.
    Skybox,
}

impl RenderViewKind {
    /// The view matrix source used when the configuration does not pick one.
    pub fn default_view_matrix_source(self) -> ViewMatrixSource {
        match self {
            RenderViewKind::World | RenderViewKind::Skybox => ViewMatrixSource::SceneCamera,
            RenderViewKind::Ui => ViewMatrixSource::UiCamera,
        }
    }

    /// The projection used when the configuration does not pick one.
    pub fn default_projection_matrix_source(self) -> ProjectionMatrixSource {
        match self {
            RenderViewKind::World | RenderViewKind::Skybox => ProjectionMatrixSource::Perspective,
            RenderViewKind::Ui => ProjectionMatrixSource::Orthographic,
        }
    }

    /// The built-in shader drawn by views of this kind.
    pub fn builtin_shader_name(self) -> &'static str {
        match self {
            RenderViewKind::World => shader::BUILTIN_MATERIAL,
            RenderViewKind::Ui => shader::BUILTIN_UI,
            RenderViewKind::Skybox => shader::BUILTIN_SKYBOX,
        }
    }
}

impl fmt::Display for RenderViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderViewKind::World => write!(f, "World"),
            RenderViewKind::Ui => write!(f, "UI"),
            RenderViewKind::Skybox => write!(f, "Skybox"),
        }
    }
}

/// Which camera supplies a view's view matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMatrixSource {
    /// The main scene camera.
    SceneCamera,
    /// The UI camera. Identity when the frame supplies none.
    UiCamera,
    /// A light's camera, for shadow-style views.
    LightCamera,
}

/// Which default projection a view uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMatrixSource {
    /// Perspective projection.
    Perspective,
    /// Orthographic projection over the view extent.
    Orthographic,
}

/// Parameters of a view's projection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Vertical field of view, in degrees. Ignored by orthographic views.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl ProjectionParams {
    /// The default parameters for a projection source.
    pub const fn default_for(source: ProjectionMatrixSource) -> Self {
        match source {
            ProjectionMatrixSource::Perspective => Self {
                fov_degrees: 45.0,
                near: 0.1,
                far: 1000.0,
            },
            ProjectionMatrixSource::Orthographic => Self {
                fov_degrees: 0.0,
                near: -100.0,
                far: 100.0,
            },
        }
    }

    /// Builds the projection matrix for a view extent.
    ///
    /// Orthographic projections map `(0, 0)` to the top-left corner.
    pub fn matrix(&self, source: ProjectionMatrixSource, extent: Extent2D) -> Mat4 {
        match source {
            ProjectionMatrixSource::Perspective => Mat4::perspective_rh(
                degrees_to_radians(self.fov_degrees),
                extent.aspect_ratio(),
                self.near,
                self.far,
            ),
            ProjectionMatrixSource::Orthographic => Mat4::orthographic_rh(
                0.0,
                extent.width as f32,
                extent.height as f32,
                0.0,
                self.near,
                self.far,
            ),
        }
    }
}

/// A pass reference inside a [`RenderViewConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderViewPassConfig {
    /// Name of the pass, matching a [`RenderPassConfig`](super::RenderPassConfig).
    pub name: String,
}

impl From<&str> for RenderViewPassConfig {
    fn from(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl From<String> for RenderViewPassConfig {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Configuration of a render view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderViewConfig {
    /// Unique name of the view.
    pub name: String,
    /// Shader to use instead of the kind's built-in.
    #[serde(default)]
    pub custom_shader_name: Option<String>,
    /// Width in pixels. `0` means the full surface width.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels. `0` means the full surface height.
    #[serde(default)]
    pub height: u32,
    /// The kind of view.
    pub view_type: RenderViewKind,
    /// Defaults to the kind's usual camera.
    #[serde(default)]
    pub view_matrix_source: Option<ViewMatrixSource>,
    /// Defaults to the kind's usual projection.
    #[serde(default)]
    pub projection_matrix_source: Option<ProjectionMatrixSource>,
    /// The passes, in execution order.
    pub passes: Vec<RenderViewPassConfig>,
    /// Overrides the default projection parameters.
    #[serde(default)]
    pub projection: Option<ProjectionParams>,
}

impl RenderViewConfig {
    /// A full-surface view of `kind` over the named passes.
    pub fn new<P: Into<RenderViewPassConfig>>(
        name: impl Into<String>,
        kind: RenderViewKind,
        passes: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            name: name.into(),
            custom_shader_name: None,
            width: 0,
            height: 0,
            view_type: kind,
            view_matrix_source: None,
            projection_matrix_source: None,
            passes: passes.into_iter().map(Into::into).collect(),
            projection: None,
        }
    }

    /// The configured view matrix source, or the kind's default.
    pub fn resolved_view_matrix_source(&self) -> ViewMatrixSource {
        self.view_matrix_source
            .unwrap_or_else(|| self.view_type.default_view_matrix_source())
    }

    /// The configured projection source, or the kind's default.
    pub fn resolved_projection_matrix_source(&self) -> ProjectionMatrixSource {
        self.projection_matrix_source
            .unwrap_or_else(|| self.view_type.default_projection_matrix_source())
    }
}

/// A stable identifier of a registered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderViewId(pub u32);

/// The state every view strategy shares.
#[derive(Debug, Clone)]
pub struct RenderViewState {
    id: RenderViewId,
    name: String,
    kind: RenderViewKind,
    view_matrix_source: ViewMatrixSource,
    projection_matrix_source: ProjectionMatrixSource,
    projection_params: ProjectionParams,
    projection: Mat4,
    passes: Vec<RenderPassId>,
    custom_shader_name: Option<String>,
    shader: Option<ShaderId>,
    width: u32,
    height: u32,
}

impl RenderViewState {
    /// Builds the state of a view from its configuration.
    ///
    /// `passes` are the registry ids of the configured passes, in order. A zero
    /// width or height in the configuration is replaced by the surface's.
    pub fn new(
        id: RenderViewId,
        config: &RenderViewConfig,
        passes: Vec<RenderPassId>,
        surface: Extent2D,
    ) -> Result<Self, ConfigError> {
        if passes.is_empty() {
            return Err(ConfigError::EmptyPassList {
                view: config.name.clone(),
            });
        }
        let projection_matrix_source = config.resolved_projection_matrix_source();
        let projection_params = config
            .projection
            .unwrap_or_else(|| ProjectionParams::default_for(projection_matrix_source));
        let width = if config.width == 0 {
            surface.width
        } else {
            config.width
        };
        let height = if config.height == 0 {
            surface.height
        } else {
            config.height
        };

        let mut state = Self {
            id,
            name: config.name.clone(),
            kind: config.view_type,
            view_matrix_source: config.resolved_view_matrix_source(),
            projection_matrix_source,
            projection_params,
            projection: Mat4::IDENTITY,
            passes,
            custom_shader_name: config.custom_shader_name.clone(),
            shader: None,
            width,
            height,
        };
        state.recompute_projection();
        Ok(state)
    }

    /// The view identifier.
    pub fn id(&self) -> RenderViewId {
        self.id
    }

    /// The unique view name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The view kind.
    pub fn kind(&self) -> RenderViewKind {
        self.kind
    }

    /// Which camera supplies the view matrix.
    pub fn view_matrix_source(&self) -> ViewMatrixSource {
        self.view_matrix_source
    }

    /// Which projection is used.
    pub fn projection_matrix_source(&self) -> ProjectionMatrixSource {
        self.projection_matrix_source
    }

    /// The projection parameters in use.
    pub fn projection_params(&self) -> ProjectionParams {
        self.projection_params
    }

    /// The current projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// The view's passes, in execution order. Never empty.
    pub fn passes(&self) -> &[RenderPassId] {
        &self.passes
    }

    /// The custom shader override, if any.
    pub fn custom_shader_name(&self) -> Option<&str> {
        self.custom_shader_name.as_deref()
    }

    /// The custom shader if set, else the kind's built-in.
    pub fn shader_name(&self) -> &str {
        self.custom_shader_name
            .as_deref()
            .unwrap_or_else(|| self.kind.builtin_shader_name())
    }

    /// The shader resolved by `on_create`, if it ran.
    pub fn shader(&self) -> Option<ShaderId> {
        self.shader
    }

    /// Records the resolved shader.
    pub fn set_shader(&mut self, shader: Option<ShaderId>) {
        self.shader = shader;
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current extent.
    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }

    /// Resolves the view's shader on the backend and records it. Returns
    /// `false` when the backend does not know it.
    pub fn resolve_shader(&mut self, backend: &mut dyn RendererBackend) -> bool {
        match backend.resolve_shader(self.shader_name()) {
            Some(shader) => {
                self.shader = Some(shader);
                log::debug!(
                    "Render view '{}' uses shader '{}' ({shader:?})",
                    self.name,
                    self.shader_name()
                );
                true
            }
            None => {
                log::warn!(
                    "Render view '{}': shader '{}' not found",
                    self.name,
                    self.shader_name()
                );
                false
            }
        }
    }

    /// Updates the extent, recomputes the projection, and resizes every pass
    /// of the view in order against the already resized `backend`.
    ///
    /// Stops at the first pass whose attachments cannot be resolved; that pass
    /// keeps its previous targets.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        registry: &mut RenderPassRegistry,
        backend: &dyn RendererBackend,
    ) -> Result<(), ConfigError> {
        self.width = width;
        self.height = height;
        self.recompute_projection();
        for id in &self.passes {
            if let Some(pass) = registry.get_mut(*id) {
                pass.resize(width, height, backend)?;
            }
        }
        Ok(())
    }

    /// Hands the pass ids back, leaving the view without passes.
    ///
    /// Used on destruction so the owner can release them from the registry.
    pub fn take_passes(&mut self) -> Vec<RenderPassId> {
        std::mem::take(&mut self.passes)
    }

    fn recompute_projection(&mut self) {
        self.projection = self
            .projection_params
            .matrix(self.projection_matrix_source, self.extent());
    }
}

/// Counts the packets a view built and has not destroyed yet.
#[derive(Debug, Default)]
pub struct PacketCounter(AtomicUsize);

impl PacketCounter {
    /// Records a built packet.
    pub fn built(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a destroyed packet.
    pub fn destroyed(&self) {
        // Saturate: destroying a foreign packet must not wrap the count.
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Packets built and not yet destroyed.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// A render view strategy.
///
/// The renderer calls these hooks on the render thread:
/// `on_create` once at registration, then every frame `on_build_packet`,
/// `on_render` and `on_destroy_packet`, `on_resize` when the surface changes,
/// and `on_destroy` when the view or the renderer goes away.
///
/// A strategy only has to build and render its packets. Shader resolution,
/// resizing and packet accounting have default implementations over
/// [`RenderViewState`] and [`PacketCounter`].
pub trait RenderView: Send + Sync {
    /// A short, static name for logs.
    fn strategy_name(&self) -> &'static str;

    /// The shared view state.
    fn state(&self) -> &RenderViewState;

    /// The shared view state, mutably.
    fn state_mut(&mut self) -> &mut RenderViewState;

    /// The counter of packets built by this view.
    fn packet_counter(&self) -> &PacketCounter;

    /// The view identifier.
    fn id(&self) -> RenderViewId {
        self.state().id()
    }

    /// The view name.
    fn name(&self) -> &str {
        self.state().name()
    }

    /// The view kind.
    fn kind(&self) -> RenderViewKind {
        self.state().kind()
    }

    /// Allocates view-local backend state. Returning `false` keeps the view
    /// out of the active set.
    fn on_create(&mut self, backend: &mut dyn RendererBackend) -> bool {
        self.state_mut().resolve_shader(backend)
    }

    /// Releases view-local state. Safe after a partial `on_create` and safe to
    /// call more than once.
    fn on_destroy(&mut self) -> Result<(), RenderError> {
        self.state_mut().set_shader(None);
        Ok(())
    }

    /// Updates the view's extent and resizes its passes, keeping their order.
    /// `backend` has already been resized.
    fn on_resize(
        &mut self,
        width: u32,
        height: u32,
        passes: &mut RenderPassRegistry,
        backend: &dyn RendererBackend,
    ) -> Result<(), RenderError> {
        self.state_mut()
            .resize(width, height, passes, backend)
            .map_err(RenderError::from)
    }

    /// Builds this frame's packet. Fails with a shape mismatch when `data`
    /// belongs to another kind of view.
    fn on_build_packet(&self, data: &ViewPacketData) -> Result<RenderViewPacket, RenderError>;

    /// Releases a packet built by this view.
    fn on_destroy_packet(&self, packet: RenderViewPacket) {
        drop(packet);
        self.packet_counter().destroyed();
    }

    /// Executes the view's passes for one frame. Returns `false` on any
    /// submission failure.
    fn on_render(
        &self,
        packet: &RenderViewPacket,
        passes: &RenderPassRegistry,
        backend: &mut dyn RendererBackend,
        frame_number: u64,
        render_target_index: usize,
    ) -> bool;

    /// Packets built and not yet destroyed.
    fn outstanding_packets(&self) -> usize {
        self.packet_counter().get()
    }
}
