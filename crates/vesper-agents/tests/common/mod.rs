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

//! Shared fixtures for the renderer integration tests: a fault-injecting
//! wrapper around the headless backend and a small two-view configuration.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use vesper_agents::Renderer;
use vesper_core::math::{Extent2D, Mat4, Vec3, Vec4};
use vesper_core::renderer::{
    AttachmentKind, BackendError, BackendType, CameraSnapshot, DrawCommand, MeshInstance,
    RenderPass, RenderPassConfig, RenderTargetAttachmentConfig, RenderTargetConfig,
    RenderViewConfig, RenderViewKind, RendererBackend, RendererConfig, SkyboxPacketData,
    ViewPacketData, WorldPacketData,
};
use vesper_core::resource::{GeometryHandle, ShaderId, SkyboxHandle, TextureHandle};
use vesper_infra::{BackendEvent, BackendJournal, HeadlessBackend, HeadlessConfig};

#[derive(Debug, Default)]
struct FaultPlan {
    // One-shot failures.
    begin_frame: Option<BackendError>,
    end_frame: Option<BackendError>,
    // Fails every `begin_renderpass` for this pass until cleared.
    pass: Option<String>,
}

/// Handle used by a test to inject failures into a [`FaultyBackend`].
#[derive(Debug, Clone, Default)]
pub struct Faults(Arc<Mutex<FaultPlan>>);

impl Faults {
    pub fn fail_next_begin_frame(&self, error: BackendError) {
        self.0.lock().begin_frame = Some(error);
    }

    pub fn fail_next_end_frame(&self, error: BackendError) {
        self.0.lock().end_frame = Some(error);
    }

    pub fn fail_pass(&self, name: &str) {
        self.0.lock().pass = Some(name.to_owned());
    }

    pub fn clear(&self) {
        *self.0.lock() = FaultPlan::default();
    }
}

/// The colour and depth attachments a [`FaultyBackend`] currently exposes,
/// per frame in flight. Refreshed on initialize and on every resize.
#[derive(Debug, Clone, Default)]
pub struct SwapchainImages(Arc<Mutex<Vec<(Option<TextureHandle>, Option<TextureHandle>)>>>);

impl SwapchainImages {
    pub fn colour(&self, index: usize) -> Option<TextureHandle> {
        self.0.lock().get(index).and_then(|images| images.0)
    }

    pub fn depth(&self, index: usize) -> Option<TextureHandle> {
        self.0.lock().get(index).and_then(|images| images.1)
    }

    fn capture(&self, backend: &HeadlessBackend) {
        *self.0.lock() = (0..backend.frames_in_flight())
            .map(|i| (backend.window_attachment(i), backend.depth_attachment(i)))
            .collect();
    }
}

/// A [`HeadlessBackend`] that fails on demand.
///
/// A failing `end_frame` still closes the frame on the inner backend, like a
/// real device that drops the frame.
pub struct FaultyBackend {
    inner: HeadlessBackend,
    faults: Faults,
    images: SwapchainImages,
}

impl FaultyBackend {
    pub fn new(inner: HeadlessBackend, faults: Faults, images: SwapchainImages) -> Self {
        Self {
            inner,
            faults,
            images,
        }
    }
}

impl RendererBackend for FaultyBackend {
    fn backend_type(&self) -> BackendType {
        self.inner.backend_type()
    }

    fn initialize(&mut self, app_name: &str) -> Result<(), BackendError> {
        self.inner.initialize(app_name)?;
        self.images.capture(&self.inner);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        self.inner.shutdown()
    }

    fn resized(&mut self, width: u16, height: u16) -> Result<(), BackendError> {
        self.inner.resized(width, height)?;
        self.images.capture(&self.inner);
        Ok(())
    }

    fn begin_frame(&mut self, delta_time: f64) -> Result<(), BackendError> {
        if let Some(error) = self.faults.0.lock().begin_frame.take() {
            return Err(error);
        }
        self.inner.begin_frame(delta_time)
    }

    fn end_frame(&mut self, delta_time: f64) -> Result<(), BackendError> {
        let result = self.inner.end_frame(delta_time);
        match self.faults.0.lock().end_frame.take() {
            Some(error) => Err(error),
            None => result,
        }
    }

    fn surface_extent(&self) -> Extent2D {
        self.inner.surface_extent()
    }

    fn frames_in_flight(&self) -> usize {
        self.inner.frames_in_flight()
    }

    fn image_index(&self) -> usize {
        self.inner.image_index()
    }

    fn window_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.inner.window_attachment(index)
    }

    fn depth_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.inner.depth_attachment(index)
    }

    fn resolve_shader(&mut self, name: &str) -> Option<ShaderId> {
        self.inner.resolve_shader(name)
    }

    fn begin_renderpass(
        &mut self,
        pass: &RenderPass,
        target_index: usize,
    ) -> Result<(), BackendError> {
        if self.faults.0.lock().pass.as_deref() == Some(pass.name()) {
            return Err(BackendError::recoverable(format!(
                "injected failure in pass '{}'",
                pass.name()
            )));
        }
        self.inner.begin_renderpass(pass, target_index)
    }

    fn end_renderpass(&mut self, pass: &RenderPass) -> Result<(), BackendError> {
        self.inner.end_renderpass(pass)
    }

    fn submit(&mut self, command: DrawCommand<'_>) -> Result<(), BackendError> {
        self.inner.submit(command)
    }
}

pub struct Harness {
    pub renderer: Renderer,
    pub journal: BackendJournal,
    pub faults: Faults,
    pub images: SwapchainImages,
}

/// An initialized renderer over a faulty headless backend, with no views.
pub fn harness() -> Harness {
    let backend = HeadlessBackend::new(HeadlessConfig::default());
    let journal = backend.journal();
    let faults = Faults::default();
    let images = SwapchainImages::default();
    let renderer = Renderer::with_backend(FaultyBackend::new(
        backend,
        faults.clone(),
        images.clone(),
    ));
    renderer.initialize("vesper-tests").expect("headless init");
    Harness {
        renderer,
        journal,
        faults,
        images,
    }
}

/// An initialized renderer with the [`demo_config`] views loaded.
pub fn demo_harness() -> Harness {
    let mut harness = harness();
    let failures = harness.renderer.load_config(&demo_config());
    assert!(failures.is_empty(), "demo config must load: {failures:?}");
    harness.journal.clear();
    harness
}

/// A world view over `shadow → main` and a skybox view over `sky`.
///
/// `shadow` renders into a fixed 2048² depth target; the others follow the
/// window.
pub fn demo_config() -> RendererConfig {
    let full = Vec4::new(0.0, 0.0, 1280.0, 720.0);
    RendererConfig {
        app_name: "vesper-tests".into(),
        passes: vec![
            RenderPassConfig::new("shadow", Vec4::new(0.0, 0.0, 2048.0, 2048.0))
                .with_links("none", "main")
                .with_target(RenderTargetConfig {
                    attachments: vec![RenderTargetAttachmentConfig {
                        kind: AttachmentKind::Depth,
                        source: Default::default(),
                    }],
                    sync_to_window_size: false,
                }),
            RenderPassConfig::new("main", full).with_links("shadow", "none"),
            RenderPassConfig::new("sky", full),
            RenderPassConfig::new("ui", full),
        ],
        views: vec![
            RenderViewConfig::new("world", RenderViewKind::World, ["shadow", "main"]),
            RenderViewConfig::new("skybox", RenderViewKind::Skybox, ["sky"]),
        ],
    }
}

pub fn world_data(meshes: usize) -> ViewPacketData {
    ViewPacketData::World(WorldPacketData {
        scene_camera: CameraSnapshot::look_at(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO),
        light_camera: None,
        ambient_colour: Vec4::new(0.2, 0.2, 0.2, 1.0),
        meshes: (0..meshes)
            .map(|i| MeshInstance {
                model: Mat4::from_translation(Vec3::new(i as f32 * 2.0, 0.0, 0.0)),
                geometry: GeometryHandle::new(),
            })
            .collect(),
    })
}

pub fn skybox_data() -> ViewPacketData {
    ViewPacketData::Skybox(SkyboxPacketData {
        scene_camera: CameraSnapshot::look_at(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO),
        skybox: SkyboxHandle::new(),
    })
}

/// The pass names of every `BeginRenderPass` event, in order.
pub fn begun_passes(journal: &BackendJournal) -> Vec<String> {
    journal
        .events()
        .into_iter()
        .filter_map(|e| match e {
            BackendEvent::BeginRenderPass { pass, .. } => Some(pass),
            _ => None,
        })
        .collect()
}

/// Position of the first event matching `predicate`.
pub fn position_of(
    journal: &BackendJournal,
    predicate: impl Fn(&BackendEvent) -> bool,
) -> Option<usize> {
    journal.events().iter().position(predicate)
}
