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

//! Defines the Renderer, the central orchestrator of the render-view pipeline.

use super::stats::FrameStats;
use parking_lot::Mutex;
use std::sync::OnceLock;
use vesper_core::math::{Extent2D, Rect};
use vesper_core::renderer::pass::validate_pass_links;
use vesper_core::renderer::{
    BackendError, BackendType, ConfigError, FrameError, FrameStage, LifecycleError, RenderError,
    RenderPacket, RenderPass, RenderPassConfig, RenderPassId, RenderPassRegistry, RenderView,
    RenderViewConfig, RenderViewId, RenderViewPacket, RenderViewState, RendererBackend,
    RendererConfig,
};
use vesper_lanes::create_view;

/// Builds the backend on first initialization.
pub type BackendFactory =
    Box<dyn FnOnce() -> Result<Box<dyn RendererBackend>, BackendError> + Send>;

/// The lifecycle of a [`Renderer`].
///
/// `Uninitialized → Ready → (FrameBegun → Ready)* → Shutdown`.
/// `DeviceLost` is entered from any live state when the backend reports an
/// unrecoverable error.
///
/// Ending a frame is not a resting state: `end_frame` returns straight to
/// `Ready`, and `draw_frame` releases the frame's packets before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// `initialize` has not succeeded.
    Uninitialized,
    /// Initialized and outside of any frame.
    Ready,
    /// A frame is open on the backend.
    FrameBegun,
    /// The backend reported an unrecoverable error. Only shutdown is allowed.
    DeviceLost,
    /// Shut down for good.
    Shutdown,
}

/// The frame orchestrator.
///
/// One `Renderer` owns exactly one backend, every registered view and every
/// pass those views use. It is an explicit context object: create one, share it
/// by reference, and shut it down when done.
///
/// [`initialize`](Self::initialize) is the only method callable from several
/// threads at once. Every other method runs on the render thread and takes
/// `&mut self`.
pub struct Renderer {
    // Consumed by the first `initialize` call.
    factory: Mutex<Option<BackendFactory>>,
    // Outcome of the one and only initialization attempt.
    init: OnceLock<Result<(), String>>,
    // The active backend, present once initialization succeeded.
    backend: Mutex<Option<Box<dyn RendererBackend>>>,
    // Lifecycle after initialization. `Uninitialized` reads as `Ready` once
    // `init` holds a success.
    state: RendererState,
    // Views in creation order.
    views: Vec<Box<dyn RenderView>>,
    // Every live pass, referenced by id from the views.
    passes: RenderPassRegistry,
    // Monotonic; view ids are never handed out twice.
    next_view_id: u32,
    frame_number: u64,
    last_frame_stats: Option<FrameStats>,
}

impl Renderer {
    /// Creates a renderer that will build its backend with `factory` on first
    /// initialization.
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn RendererBackend>, BackendError> + Send + 'static,
    {
        Self {
            factory: Mutex::new(Some(Box::new(factory))),
            init: OnceLock::new(),
            backend: Mutex::new(None),
            state: RendererState::Uninitialized,
            views: Vec::new(),
            passes: RenderPassRegistry::new(),
            next_view_id: 0,
            frame_number: 0,
            last_frame_stats: None,
        }
    }

    /// Creates a renderer over an already constructed backend.
    pub fn with_backend<B>(backend: B) -> Self
    where
        B: RendererBackend + 'static,
    {
        Self::new(move || Ok(Box::new(backend) as Box<dyn RendererBackend>))
    }

    // --- Lifecycle ---

    /// Constructs and initializes the backend, exactly once.
    ///
    /// Concurrent callers block until the first attempt completes and all see
    /// its outcome. After a success further calls are no-ops; after a failure
    /// they return the same error and nothing is retried.
    pub fn initialize(&self, app_name: &str) -> Result<(), RenderError> {
        if self.state == RendererState::Shutdown {
            return Err(LifecycleError::AlreadyShutdown.into());
        }

        let outcome = self.init.get_or_init(|| {
            let factory = self
                .factory
                .lock()
                .take()
                .ok_or_else(|| "no backend factory available".to_owned())?;
            let mut backend = factory().map_err(|e| e.to_string())?;
            backend.initialize(app_name).map_err(|e| e.to_string())?;
            log::info!(
                "Renderer initialized for '{app_name}' with the {} backend",
                backend.backend_type()
            );
            *self.backend.lock() = Some(backend);
            Ok(())
        });

        outcome.clone().map_err(|msg| {
            log::error!("Renderer initialization failed: {msg}");
            RenderError::InitializationFailed(msg)
        })
    }

    /// Destroys every view in reverse creation order, releasing their passes,
    /// then shuts the backend down. Calling it again does nothing.
    pub fn shutdown(&mut self) -> Result<(), RenderError> {
        if self.state == RendererState::Shutdown {
            return Ok(());
        }

        let mut backend = self.backend.get_mut().take();

        if self.state == RendererState::FrameBegun {
            if let Some(backend) = backend.as_mut() {
                if let Err(e) = backend.end_frame(0.0) {
                    log::warn!("Failed to close the open frame during shutdown: {e}");
                }
            }
        }

        while let Some(mut view) = self.views.pop() {
            if let Err(e) = view.on_destroy() {
                log::warn!("Render view '{}' failed to destroy: {e}", view.name());
            }
            for id in view.state_mut().take_passes() {
                self.passes.release(id);
            }
            log::debug!("Render view '{}' destroyed", view.name());
        }

        self.state = RendererState::Shutdown;

        if let Some(mut backend) = backend {
            backend.shutdown()?;
        }
        log::info!("Renderer shut down after {} frames", self.frame_number);
        Ok(())
    }

    // --- Views ---

    /// Builds the passes of a view, creates its lane, and runs `on_create`.
    ///
    /// `pass_configs` may contain more passes than the view uses; only the ones
    /// named in `view_config.passes` are created. Any failure aborts this view
    /// only and releases the passes created for it.
    pub fn register_view(
        &mut self,
        view_config: &RenderViewConfig,
        pass_configs: &[RenderPassConfig],
    ) -> Result<RenderViewId, RenderError> {
        self.ensure_outside_frame()?;

        if self.views.iter().any(|v| v.name() == view_config.name) {
            return Err(ConfigError::DuplicateView {
                view: view_config.name.clone(),
            }
            .into());
        }
        if view_config.passes.is_empty() {
            return Err(ConfigError::EmptyPassList {
                view: view_config.name.clone(),
            }
            .into());
        }

        let selected = view_config
            .passes
            .iter()
            .map(|p| {
                pass_configs
                    .iter()
                    .find(|c| c.name == p.name)
                    .ok_or_else(|| ConfigError::UnknownPass {
                        view: view_config.name.clone(),
                        pass: p.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        validate_pass_links(selected.iter().copied())?;

        let id = RenderViewId(self.next_view_id);
        let next_view_id = self
            .next_view_id
            .checked_add(1)
            .ok_or(ConfigError::ViewIdsExhausted)?;

        let backend = self
            .backend
            .get_mut()
            .as_deref_mut()
            .ok_or(LifecycleError::NotInitialized)?;
        let surface = backend.surface_extent();

        let mut pass_ids = Vec::with_capacity(selected.len());
        for config in &selected {
            match register_pass(&mut self.passes, config, &*backend, surface) {
                Ok(id) => pass_ids.push(id),
                Err(e) => {
                    release_all(&mut self.passes, &pass_ids);
                    return Err(e.into());
                }
            }
        }

        let state = match RenderViewState::new(id, view_config, pass_ids.clone(), surface) {
            Ok(state) => state,
            Err(e) => {
                release_all(&mut self.passes, &pass_ids);
                return Err(e.into());
            }
        };

        let mut view = create_view(state);
        if !view.on_create(backend) {
            if let Err(e) = view.on_destroy() {
                log::warn!("Render view '{}' failed to clean up: {e}", view_config.name);
            }
            release_all(&mut self.passes, &pass_ids);
            log::warn!("Render view '{}' could not be created", view_config.name);
            return Err(RenderError::ViewCreationFailed {
                view: view_config.name.clone(),
            });
        }

        self.next_view_id = next_view_id;
        log::debug!(
            "Registered {} view '{}' ({}x{}) with passes {:?}",
            view.strategy_name(),
            view.name(),
            view.state().width(),
            view.state().height(),
            view_config.passes.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );
        self.views.push(view);
        Ok(id)
    }

    /// Destroys one view and releases its passes.
    pub fn remove_view(&mut self, name: &str) -> Result<(), RenderError> {
        self.ensure_outside_frame()?;
        let index = self
            .views
            .iter()
            .position(|v| v.name() == name)
            .ok_or_else(|| RenderError::UnknownView(name.to_owned()))?;
        let mut view = self.views.remove(index);
        let destroyed = view.on_destroy();
        for id in view.state_mut().take_passes() {
            self.passes.release(id);
        }
        log::debug!("Render view '{name}' removed");
        destroyed
    }

    /// Registers every view of `config` in order.
    ///
    /// A view that fails is skipped and reported; the others still load.
    pub fn load_config(&mut self, config: &RendererConfig) -> Vec<(String, RenderError)> {
        let mut failures = Vec::new();
        for view in &config.views {
            if let Err(e) = self.register_view(view, &config.passes) {
                log::warn!("Skipping render view '{}': {e}", view.name);
                failures.push((view.name.clone(), e));
            }
        }
        log::info!(
            "Loaded {} of {} render views",
            config.views.len() - failures.len(),
            config.views.len()
        );
        failures
    }

    // --- Frame protocol ---

    /// Opens a frame on the backend. Only valid from `Ready`.
    pub fn begin_frame(&mut self, delta_time: f64) -> Result<(), RenderError> {
        self.ensure_outside_frame()?;
        let result = self.backend_mut()?.begin_frame(delta_time);
        match result {
            Ok(()) => {
                self.state = RendererState::FrameBegun;
                log::trace!("Frame {} begun", self.frame_number);
                Ok(())
            }
            Err(e) => Err(self.backend_failure(e)),
        }
    }

    /// Closes the open frame and returns to `Ready`.
    ///
    /// A backend failure loses the frame. The renderer stays usable unless the
    /// failure was unrecoverable.
    pub fn end_frame(&mut self, delta_time: f64) -> Result<(), RenderError> {
        match self.current_state() {
            RendererState::FrameBegun => {}
            other => return Err(lifecycle_error(other).into()),
        }
        let result = self.backend_mut()?.end_frame(delta_time);
        self.state = RendererState::Ready;
        log::trace!("Frame {} ended", self.frame_number);
        self.frame_number += 1;
        result.map_err(|e| self.backend_failure(e))
    }

    /// Draws one frame: build every packet, begin, render every view in packet
    /// order, end, release every packet.
    ///
    /// A view that fails to build or render does not stop the others, and the
    /// frame is always ended once begun. The first such failure is then
    /// reported as a [`FrameError`]. A backend failure to begin aborts the
    /// frame without ending it.
    pub fn draw_frame(&mut self, packet: &RenderPacket) -> Result<FrameStats, RenderError> {
        self.ensure_outside_frame()?;
        let frame_number = self.frame_number;
        let mut first_failure: Option<(FrameStage, RenderError)> = None;
        let mut stats = FrameStats {
            frame_number,
            delta_time: packet.delta_time,
            ..Default::default()
        };

        // Build.
        let mut built: Vec<(usize, RenderViewPacket)> = Vec::with_capacity(packet.views.len());
        for input in &packet.views {
            let stage = FrameStage::BuildPacket(input.view.clone());
            let Some(index) = self.views.iter().position(|v| v.name() == input.view) else {
                log::warn!("Frame {frame_number}: no render view named '{}'", input.view);
                stats.views_failed += 1;
                first_failure.get_or_insert((stage, RenderError::UnknownView(input.view.clone())));
                continue;
            };
            match self.views[index].on_build_packet(&input.data) {
                Ok(view_packet) => {
                    stats.geometry_count += view_packet.geometry_count();
                    built.push((index, view_packet));
                }
                Err(e) => {
                    log::warn!(
                        "Frame {frame_number}: render view '{}' failed to build its packet: {e}",
                        input.view
                    );
                    stats.views_failed += 1;
                    first_failure.get_or_insert((stage, e));
                }
            }
        }
        stats.packets_built = built.len();

        // Begin.
        if let Err(e) = self.begin_frame(packet.delta_time) {
            self.destroy_packets(built);
            log::error!("Frame {frame_number} could not begin: {e}");
            return Err(FrameError {
                frame_number,
                stage: FrameStage::BeginFrame,
                source: Box::new(e),
            }
            .into());
        }

        // Render.
        {
            let backend = self
                .backend
                .get_mut()
                .as_deref_mut()
                .ok_or(LifecycleError::NotInitialized)?;
            let render_target_index = backend.image_index();
            stats.render_target_index = render_target_index;

            for (index, view_packet) in &built {
                let view = &self.views[*index];
                if view.on_render(
                    view_packet,
                    &self.passes,
                    backend,
                    frame_number,
                    render_target_index,
                ) {
                    stats.views_rendered += 1;
                } else {
                    log::warn!(
                        "Frame {frame_number}: render view '{}' failed to render",
                        view.name()
                    );
                    stats.views_failed += 1;
                    first_failure.get_or_insert((
                        FrameStage::RenderView(view.name().to_owned()),
                        RenderError::ViewRenderFailed {
                            view: view.name().to_owned(),
                        },
                    ));
                }
            }
        }

        // End.
        let ended = self.end_frame(packet.delta_time);
        self.destroy_packets(built);

        if let Err(e) = ended {
            log::error!("Frame {frame_number} could not end: {e}");
            return Err(FrameError {
                frame_number,
                stage: FrameStage::EndFrame,
                source: Box::new(e),
            }
            .into());
        }

        self.last_frame_stats = Some(stats.clone());
        match first_failure {
            None => Ok(stats),
            Some((stage, source)) => {
                log::error!("Frame {frame_number} failed during {stage}: {source}");
                Err(FrameError {
                    frame_number,
                    stage,
                    source: Box::new(source),
                }
                .into())
            }
        }
    }

    /// Propagates a surface resize: the backend first, so it can rebuild its
    /// swapchain, then every view in creation order, so their synced targets
    /// bind the new images.
    ///
    /// A pass whose attachments cannot be resolved keeps its previous targets.
    /// The other views are still resized and the first failure is returned.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.ensure_outside_frame()?;
        let result = self
            .backend_mut()?
            .resized(clamp_to_u16(width), clamp_to_u16(height));
        if let Err(e) = result {
            return Err(self.backend_failure(e));
        }

        let backend = self
            .backend
            .get_mut()
            .as_deref()
            .ok_or(LifecycleError::NotInitialized)?;
        let mut first_failure = None;
        for view in &mut self.views {
            if let Err(e) = view.on_resize(width, height, &mut self.passes, backend) {
                log::warn!("Render view '{}' failed to resize: {e}", view.name());
                first_failure.get_or_insert(e);
            }
        }
        log::debug!("Renderer resized to {width}x{height}");
        first_failure.map_or(Ok(()), Err)
    }

    // --- Inspection ---

    /// The current lifecycle state.
    pub fn state(&self) -> RendererState {
        self.current_state()
    }

    /// The number of frames ended so far, and so the number of the next frame.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// The graphics API of the active backend, once initialized.
    pub fn backend_type(&self) -> Option<BackendType> {
        self.backend.lock().as_ref().map(|b| b.backend_type())
    }

    /// The surface size reported by the backend, once initialized.
    pub fn surface_extent(&self) -> Option<Extent2D> {
        self.backend.lock().as_ref().map(|b| b.surface_extent())
    }

    /// Looks up a view by name.
    pub fn view(&self, name: &str) -> Option<&dyn RenderView> {
        self.views
            .iter()
            .find(|v| v.name() == name)
            .map(|v| &**v)
    }

    /// Names of the registered views, in creation order.
    pub fn view_names(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.name()).collect()
    }

    /// Looks up a live pass by name.
    pub fn pass(&self, name: &str) -> Option<&RenderPass> {
        self.passes.find(name).and_then(|id| self.passes.get(id))
    }

    /// The number of live passes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Packets built and not yet destroyed, over every view.
    pub fn outstanding_packets(&self) -> usize {
        self.views.iter().map(|v| v.outstanding_packets()).sum()
    }

    /// Statistics of the last frame that reached `end_frame` successfully.
    pub fn last_frame_stats(&self) -> Option<&FrameStats> {
        self.last_frame_stats.as_ref()
    }

    // --- Internals ---

    fn current_state(&self) -> RendererState {
        match self.state {
            RendererState::Uninitialized if self.is_initialized() => RendererState::Ready,
            state => state,
        }
    }

    fn is_initialized(&self) -> bool {
        matches!(self.init.get(), Some(Ok(())))
    }

    fn ensure_outside_frame(&self) -> Result<(), LifecycleError> {
        match self.current_state() {
            RendererState::Ready => Ok(()),
            other => Err(lifecycle_error(other)),
        }
    }

    fn backend_mut(&mut self) -> Result<&mut (dyn RendererBackend + 'static), LifecycleError> {
        self.backend
            .get_mut()
            .as_deref_mut()
            .ok_or(LifecycleError::NotInitialized)
    }

    fn backend_failure(&mut self, error: BackendError) -> RenderError {
        if !error.recoverable {
            log::error!("Graphics device lost: {}", error.message);
            self.state = RendererState::DeviceLost;
        }
        error.into()
    }

    fn destroy_packets(&self, built: Vec<(usize, RenderViewPacket)>) {
        for (index, packet) in built {
            self.views[index].on_destroy_packet(packet);
        }
    }
}

fn lifecycle_error(state: RendererState) -> LifecycleError {
    match state {
        RendererState::Uninitialized => LifecycleError::NotInitialized,
        RendererState::FrameBegun => LifecycleError::FrameAlreadyBegun,
        RendererState::DeviceLost => LifecycleError::DeviceLost,
        RendererState::Shutdown => LifecycleError::AlreadyShutdown,
        RendererState::Ready => LifecycleError::FrameNotBegun,
    }
}

fn register_pass(
    registry: &mut RenderPassRegistry,
    config: &RenderPassConfig,
    backend: &dyn RendererBackend,
    surface: Extent2D,
) -> Result<RenderPassId, ConfigError> {
    let targets = config.target.build_targets(
        &config.name,
        backend,
        surface,
        Rect::from_vec4(config.render_area),
    )?;
    registry.register(config, targets)
}

fn release_all(registry: &mut RenderPassRegistry, ids: &[RenderPassId]) {
    for id in ids {
        registry.release(*id);
    }
}

fn clamp_to_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_core::math::Vec4;
    use vesper_core::renderer::RenderViewKind;
    use vesper_infra::{HeadlessBackend, HeadlessConfig};

    fn headless_renderer() -> Renderer {
        let renderer = Renderer::with_backend(HeadlessBackend::new(HeadlessConfig::default()));
        renderer.initialize("renderer-tests").unwrap();
        renderer
    }

    fn world_view(name: &str) -> (RenderViewConfig, Vec<RenderPassConfig>) {
        let pass = format!("{name}.main");
        (
            RenderViewConfig::new(name, RenderViewKind::World, [pass.as_str()]),
            vec![RenderPassConfig::new(pass, Vec4::new(0.0, 0.0, 1280.0, 720.0))],
        )
    }

    #[test]
    fn test_lifecycle_error_mapping() {
        assert_eq!(
            lifecycle_error(RendererState::Uninitialized),
            LifecycleError::NotInitialized
        );
        assert_eq!(
            lifecycle_error(RendererState::FrameBegun),
            LifecycleError::FrameAlreadyBegun
        );
        assert_eq!(
            lifecycle_error(RendererState::Shutdown),
            LifecycleError::AlreadyShutdown
        );
        assert_eq!(
            lifecycle_error(RendererState::Ready),
            LifecycleError::FrameNotBegun
        );
    }

    #[test]
    fn test_clamp_to_u16() {
        assert_eq!(clamp_to_u16(800), 800);
        assert_eq!(clamp_to_u16(70_000), u16::MAX);
    }

    #[test]
    fn test_failed_factory_is_not_retried() {
        let renderer = Renderer::new(|| Err(BackendError::fatal("no adapter")));
        let first = renderer.initialize("app").unwrap_err().to_string();
        let second = renderer.initialize("app").unwrap_err().to_string();
        assert_eq!(first, second);
        assert_eq!(renderer.state(), RendererState::Uninitialized);
    }

    #[test]
    fn test_end_frame_returns_straight_to_ready() {
        let mut renderer = headless_renderer();
        renderer.begin_frame(0.016).unwrap();
        assert_eq!(renderer.state(), RendererState::FrameBegun);

        renderer.end_frame(0.016).unwrap();
        assert_eq!(renderer.state(), RendererState::Ready);
        assert!(matches!(
            renderer.end_frame(0.016),
            Err(RenderError::Lifecycle(LifecycleError::FrameNotBegun))
        ));

        renderer.begin_frame(0.016).unwrap();
        renderer.end_frame(0.016).unwrap();
        assert_eq!(renderer.frame_number(), 2);
    }

    #[test]
    fn test_view_ids_are_not_recycled() {
        let mut renderer = headless_renderer();
        let (config, passes) = world_view("a");
        let first = renderer.register_view(&config, &passes).unwrap();
        renderer.remove_view("a").unwrap();
        let second = renderer.register_view(&config, &passes).unwrap();
        assert_ne!(first, second);

        renderer.next_view_id = u32::MAX - 1;
        let (config, passes) = world_view("b");
        assert_eq!(
            renderer.register_view(&config, &passes).unwrap(),
            RenderViewId(u32::MAX - 1)
        );

        let (config, passes) = world_view("c");
        let err = renderer.register_view(&config, &passes).unwrap_err();
        assert!(
            matches!(err, RenderError::Config(ConfigError::ViewIdsExhausted)),
            "got {err}"
        );
        assert!(renderer.view("c").is_none());
        assert_eq!(renderer.pass_count(), 2, "no pass leaks from the refused view");
    }
}
