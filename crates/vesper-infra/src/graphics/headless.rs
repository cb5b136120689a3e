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

//! A GPU-less [`RendererBackend`] that records what it is asked to do.
//!
//! Every call that reaches the backend is appended to a [`BackendJournal`].
//! The journal is a shared handle: clone it before handing the backend to a
//! renderer and inspect it afterwards.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use vesper_core::math::Extent2D;
use vesper_core::renderer::shader::BUILTIN_SHADERS;
use vesper_core::renderer::{
    BackendError, BackendType, DrawCommand, RenderPass, RendererBackend,
};
use vesper_core::resource::{GeometryHandle, ShaderId, SkyboxHandle, TextureHandle};

/// One call recorded by the [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// `initialize` succeeded.
    Initialize {
        /// The application name passed in.
        app_name: String,
    },
    /// `shutdown` ran.
    Shutdown,
    /// The surface was resized.
    Resized {
        /// New width.
        width: u16,
        /// New height.
        height: u16,
    },
    /// A frame was opened.
    BeginFrame {
        /// Zero-based count of frames begun so far.
        frame: u64,
        /// The frame-in-flight index selected for it.
        image_index: usize,
    },
    /// The open frame was closed.
    EndFrame {
        /// The frame being closed.
        frame: u64,
    },
    /// A render pass was opened.
    BeginRenderPass {
        /// The pass name.
        pass: String,
        /// The target it renders into.
        target_index: usize,
    },
    /// The open render pass was closed.
    EndRenderPass {
        /// The pass name.
        pass: String,
    },
    /// Globals were bound.
    BindGlobals {
        /// The bound shader.
        shader: ShaderId,
    },
    /// A geometry was drawn.
    DrawGeometry {
        /// The geometry handle.
        geometry: GeometryHandle,
    },
    /// A skybox was drawn.
    DrawSkybox {
        /// The skybox handle.
        skybox: SkyboxHandle,
    },
}

/// Shared, append-only record of [`BackendEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct BackendJournal {
    events: Arc<Mutex<Vec<BackendEvent>>>,
}

impl BackendJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&self, event: BackendEvent) {
        self.events.lock().push(event);
    }

    /// A snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<BackendEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Settings of a [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessConfig {
    /// Initial surface width.
    pub width: u32,
    /// Initial surface height.
    pub height: u32,
    /// Number of frames in flight, and so of render targets per pass.
    pub frames_in_flight: usize,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frames_in_flight: 3,
        }
    }
}

/// A [`RendererBackend`] with no device behind it.
///
/// It enforces the same call ordering a real backend would (no pass outside a
/// frame, no draw outside a pass) and reports violations as recoverable
/// errors.
#[derive(Debug)]
pub struct HeadlessBackend {
    config: HeadlessConfig,
    extent: Extent2D,
    journal: BackendJournal,
    shaders: HashMap<String, ShaderId>,
    colour_attachments: Vec<TextureHandle>,
    depth_attachments: Vec<TextureHandle>,
    initialized: bool,
    frame_open: bool,
    open_pass: Option<String>,
    frames_begun: u64,
    image_index: usize,
}

impl HeadlessBackend {
    /// Creates a backend with its own journal.
    pub fn new(config: HeadlessConfig) -> Self {
        Self::with_journal(config, BackendJournal::new())
    }

    /// Creates a backend recording into an existing journal.
    pub fn with_journal(config: HeadlessConfig, journal: BackendJournal) -> Self {
        Self {
            config,
            extent: Extent2D::new(config.width, config.height),
            journal,
            shaders: HashMap::new(),
            colour_attachments: Vec::new(),
            depth_attachments: Vec::new(),
            initialized: false,
            frame_open: false,
            open_pass: None,
            frames_begun: 0,
            image_index: 0,
        }
    }

    /// A handle onto this backend's journal.
    pub fn journal(&self) -> BackendJournal {
        self.journal.clone()
    }

    /// Makes a shader resolvable by name, returning its id.
    pub fn add_shader(&mut self, name: impl Into<String>) -> ShaderId {
        let next = ShaderId(self.shaders.len() as u32);
        *self.shaders.entry(name.into()).or_insert(next)
    }

    /// Whether `initialize` has succeeded and `shutdown` has not run since.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn create_attachments(&mut self) {
        let count = self.config.frames_in_flight.max(1);
        self.colour_attachments = (0..count).map(|_| TextureHandle::new()).collect();
        self.depth_attachments = (0..count).map(|_| TextureHandle::new()).collect();
    }

    fn require_frame(&self, operation: &str) -> Result<(), BackendError> {
        if !self.initialized {
            return Err(BackendError::recoverable(format!(
                "{operation} called on an uninitialized backend"
            )));
        }
        if !self.frame_open {
            return Err(BackendError::recoverable(format!(
                "{operation} called outside of a frame"
            )));
        }
        Ok(())
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl RendererBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn initialize(&mut self, app_name: &str) -> Result<(), BackendError> {
        if self.initialized {
            return Err(BackendError::recoverable("backend already initialized"));
        }
        self.create_attachments();
        let count = self.frames_in_flight();
        for name in BUILTIN_SHADERS {
            self.add_shader(name);
        }
        self.initialized = true;
        log::info!(
            "Headless backend initialized for '{}' ({}x{}, {} frames in flight)",
            app_name,
            self.extent.width,
            self.extent.height,
            count
        );
        self.journal.record(BackendEvent::Initialize {
            app_name: app_name.to_owned(),
        });
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        if !self.initialized {
            return Ok(());
        }
        self.colour_attachments.clear();
        self.depth_attachments.clear();
        self.initialized = false;
        self.frame_open = false;
        self.open_pass = None;
        log::info!("Headless backend shut down");
        self.journal.record(BackendEvent::Shutdown);
        Ok(())
    }

    fn resized(&mut self, width: u16, height: u16) -> Result<(), BackendError> {
        self.extent = Extent2D::new(width as u32, height as u32);
        // Like a swapchain recreate: the old images are gone.
        if self.initialized {
            self.create_attachments();
        }
        log::debug!("Headless surface resized to {width}x{height}");
        self.journal.record(BackendEvent::Resized { width, height });
        Ok(())
    }

    fn begin_frame(&mut self, _delta_time: f64) -> Result<(), BackendError> {
        if !self.initialized {
            return Err(BackendError::recoverable(
                "begin_frame called on an uninitialized backend",
            ));
        }
        if self.frame_open {
            return Err(BackendError::recoverable("a frame is already open"));
        }
        self.image_index = (self.frames_begun % self.colour_attachments.len() as u64) as usize;
        self.frame_open = true;
        self.journal.record(BackendEvent::BeginFrame {
            frame: self.frames_begun,
            image_index: self.image_index,
        });
        Ok(())
    }

    fn end_frame(&mut self, _delta_time: f64) -> Result<(), BackendError> {
        self.require_frame("end_frame")?;
        if let Some(pass) = &self.open_pass {
            return Err(BackendError::recoverable(format!(
                "end_frame called while pass '{pass}' is open"
            )));
        }
        self.frame_open = false;
        self.journal.record(BackendEvent::EndFrame {
            frame: self.frames_begun,
        });
        self.frames_begun += 1;
        Ok(())
    }

    fn surface_extent(&self) -> Extent2D {
        self.extent
    }

    fn frames_in_flight(&self) -> usize {
        self.config.frames_in_flight.max(1)
    }

    fn image_index(&self) -> usize {
        self.image_index
    }

    fn window_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.colour_attachments.get(index).copied()
    }

    fn depth_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.depth_attachments.get(index).copied()
    }

    fn resolve_shader(&mut self, name: &str) -> Option<ShaderId> {
        self.shaders.get(name).copied()
    }

    fn begin_renderpass(
        &mut self,
        pass: &RenderPass,
        target_index: usize,
    ) -> Result<(), BackendError> {
        self.require_frame("begin_renderpass")?;
        if let Some(open) = &self.open_pass {
            return Err(BackendError::recoverable(format!(
                "cannot begin pass '{}' while pass '{open}' is open",
                pass.name()
            )));
        }
        if pass.target(target_index).is_none() {
            return Err(BackendError::recoverable(format!(
                "pass '{}' has no render target {target_index}",
                pass.name()
            )));
        }
        self.open_pass = Some(pass.name().to_owned());
        self.journal.record(BackendEvent::BeginRenderPass {
            pass: pass.name().to_owned(),
            target_index,
        });
        Ok(())
    }

    fn end_renderpass(&mut self, pass: &RenderPass) -> Result<(), BackendError> {
        match self.open_pass.take() {
            Some(open) if open == pass.name() => {
                self.journal.record(BackendEvent::EndRenderPass { pass: open });
                Ok(())
            }
            other => {
                self.open_pass = other;
                Err(BackendError::recoverable(format!(
                    "pass '{}' is not the open pass",
                    pass.name()
                )))
            }
        }
    }

    fn submit(&mut self, command: DrawCommand<'_>) -> Result<(), BackendError> {
        if self.open_pass.is_none() {
            return Err(BackendError::recoverable(
                "draw command submitted outside of a render pass",
            ));
        }
        let event = match command {
            DrawCommand::Globals { shader, .. } => BackendEvent::BindGlobals { shader },
            DrawCommand::Geometry(data) => BackendEvent::DrawGeometry {
                geometry: data.geometry,
            },
            DrawCommand::Skybox(skybox) => BackendEvent::DrawSkybox { skybox },
        };
        self.journal.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_core::math::Vec4;
    use vesper_core::renderer::{RenderPassConfig, RenderPassId, RenderTargetConfig};

    fn pass_for(backend: &HeadlessBackend) -> RenderPass {
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1280.0, 720.0));
        let targets = RenderTargetConfig::default()
            .build_targets("main", backend, backend.surface_extent(), Default::default())
            .unwrap();
        RenderPass::create(RenderPassId::new(0, 0), &config, targets).unwrap()
    }

    #[test]
    fn test_attachments_exist_only_after_initialize() {
        let mut backend = HeadlessBackend::default();
        assert!(backend.window_attachment(0).is_none());
        backend.initialize("test").unwrap();
        assert!(backend.window_attachment(2).is_some());
        assert!(backend.depth_attachment(2).is_some());
        assert!(backend.window_attachment(3).is_none());
    }

    #[test]
    fn test_resize_recreates_attachments() {
        let mut backend = HeadlessBackend::default();
        backend.resized(640, 480).unwrap();
        assert!(backend.window_attachment(0).is_none());

        backend.initialize("test").unwrap();
        let colour = backend.window_attachment(1);
        let depth = backend.depth_attachment(1);
        backend.resized(800, 600).unwrap();

        assert_eq!(backend.surface_extent(), Extent2D::new(800, 600));
        assert!(backend.window_attachment(1).is_some());
        assert_ne!(backend.window_attachment(1), colour);
        assert_ne!(backend.depth_attachment(1), depth);
        assert!(backend.window_attachment(3).is_none());
    }

    #[test]
    fn test_builtin_shaders_resolve() {
        let mut backend = HeadlessBackend::default();
        assert!(backend.resolve_shader("Shader.Builtin.UI").is_none());
        backend.initialize("test").unwrap();
        for name in BUILTIN_SHADERS {
            assert!(backend.resolve_shader(name).is_some(), "{name} missing");
        }
        assert!(backend.resolve_shader("Shader.Custom").is_none());
    }

    #[test]
    fn test_image_index_cycles_through_frames_in_flight() {
        let mut backend = HeadlessBackend::default();
        backend.initialize("test").unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            backend.begin_frame(0.0).unwrap();
            seen.push(backend.image_index());
            backend.end_frame(0.0).unwrap();
        }
        assert_eq!(seen, [0, 1, 2, 0]);
    }

    #[test]
    fn test_ordering_violations_are_rejected() {
        let mut backend = HeadlessBackend::default();
        assert!(backend.begin_frame(0.0).is_err());
        backend.initialize("test").unwrap();
        let pass = pass_for(&backend);

        assert!(backend.begin_renderpass(&pass, 0).is_err());
        backend.begin_frame(0.0).unwrap();
        assert!(backend.begin_frame(0.0).is_err());
        assert!(backend.submit(DrawCommand::Skybox(SkyboxHandle::new())).is_err());
        assert!(backend.begin_renderpass(&pass, 7).is_err());

        backend.begin_renderpass(&pass, 0).unwrap();
        assert!(backend.end_frame(0.0).is_err());
        backend.end_renderpass(&pass).unwrap();
        backend.end_frame(0.0).unwrap();
    }

    #[test]
    fn test_journal_is_shared() {
        let backend = HeadlessBackend::default();
        let journal = backend.journal();
        let mut boxed: Box<dyn RendererBackend> = Box::new(backend);
        boxed.initialize("shared").unwrap();
        boxed.resized(800, 600).unwrap();
        assert_eq!(
            journal.events(),
            vec![
                BackendEvent::Initialize {
                    app_name: "shared".into()
                },
                BackendEvent::Resized {
                    width: 800,
                    height: 600
                },
            ]
        );
    }
}
