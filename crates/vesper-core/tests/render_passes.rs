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

//! Pass and target construction against a minimal backend.

use vesper_core::math::{Extent2D, Rect};
use vesper_core::renderer::{
    AttachmentKind, AttachmentSource, BackendError, BackendType, ConfigError, DrawCommand,
    ProjectionMatrixSource, ProjectionParams, RenderPass, RenderPassRegistry,
    RenderTargetAttachmentConfig, RenderTargetConfig, RenderViewConfig, RenderViewId,
    RenderViewKind, RenderViewState, RendererBackend, RendererConfig,
};
use vesper_core::resource::{ShaderId, TextureHandle};

/// Exposes its attachments and nothing else. A resize swaps them for new
/// ones, like a swapchain recreate.
struct StubBackend {
    colour: Vec<TextureHandle>,
    depth: Vec<TextureHandle>,
}

impl StubBackend {
    fn new(frames: usize, with_depth: bool) -> Self {
        Self {
            colour: (0..frames).map(|_| TextureHandle::new()).collect(),
            depth: if with_depth {
                (0..frames).map(|_| TextureHandle::new()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

impl RendererBackend for StubBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }
    fn initialize(&mut self, _app_name: &str) -> Result<(), BackendError> {
        Ok(())
    }
    fn shutdown(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
    fn resized(&mut self, _width: u16, _height: u16) -> Result<(), BackendError> {
        *self = Self::new(self.colour.len(), !self.depth.is_empty());
        Ok(())
    }
    fn begin_frame(&mut self, _delta_time: f64) -> Result<(), BackendError> {
        Ok(())
    }
    fn end_frame(&mut self, _delta_time: f64) -> Result<(), BackendError> {
        Ok(())
    }
    fn surface_extent(&self) -> Extent2D {
        Extent2D::new(1280, 720)
    }
    fn frames_in_flight(&self) -> usize {
        self.colour.len()
    }
    fn image_index(&self) -> usize {
        0
    }
    fn window_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.colour.get(index).copied()
    }
    fn depth_attachment(&self, index: usize) -> Option<TextureHandle> {
        self.depth.get(index).copied()
    }
    fn resolve_shader(&mut self, _name: &str) -> Option<ShaderId> {
        None
    }
    fn begin_renderpass(
        &mut self,
        _pass: &RenderPass,
        _target_index: usize,
    ) -> Result<(), BackendError> {
        Ok(())
    }
    fn end_renderpass(&mut self, _pass: &RenderPass) -> Result<(), BackendError> {
        Ok(())
    }
    fn submit(&mut self, _command: DrawCommand<'_>) -> Result<(), BackendError> {
        Ok(())
    }
}

const CONFIG: &str = r#"{
    "app_name": "passes",
    "passes": [
        {
            "name": "shadow",
            "next_name": "main",
            "render_area": [0.0, 0.0, 1024.0, 1024.0],
            "clear_flags": 2,
            "target": {
                "attachments": [{ "kind": "depth" }],
                "sync_to_window_size": false
            }
        },
        {
            "name": "main",
            "prev_name": "shadow",
            "render_area": [0.0, 0.0, 1280.0, 720.0],
            "clear_colour": [0.1, 0.1, 0.2, 1.0],
            "clear_flags": 3
        }
    ]
}"#;

fn build_registry(backend: &StubBackend) -> RenderPassRegistry {
    let config = RendererConfig::from_json_str(CONFIG).unwrap();
    let mut registry = RenderPassRegistry::new();
    for pass in &config.passes {
        let targets = pass
            .target
            .build_targets(
                &pass.name,
                backend,
                backend.surface_extent(),
                Rect::from_vec4(pass.render_area),
            )
            .unwrap();
        registry.register(pass, targets).unwrap();
    }
    registry
}

#[test]
fn test_default_targets_use_backend_attachments_per_frame() {
    let backend = StubBackend::new(2, true);
    let targets = RenderTargetConfig::default()
        .build_targets(
            "main",
            &backend,
            Extent2D::new(1280, 720),
            Rect::new(0.0, 0.0, 1280.0, 720.0),
        )
        .unwrap();

    assert_eq!(targets.len(), 2);
    for (i, target) in targets.iter().enumerate() {
        assert_eq!(target.attachments(), &[backend.colour[i], backend.depth[i]]);
        assert!(target.sync_to_window_size());
    }
}

#[test]
fn test_missing_depth_attachment_is_reported() {
    let backend = StubBackend::new(2, false);
    let err = RenderTargetConfig::default()
        .build_targets(
            "main",
            &backend,
            Extent2D::new(1280, 720),
            Rect::new(0.0, 0.0, 1280.0, 720.0),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnresolvedAttachment {
            pass: "main".into(),
            target_index: 0,
            kind: AttachmentKind::Depth,
        }
    );
}

#[test]
fn test_explicit_texture_is_shared_by_every_target() {
    let backend = StubBackend::new(3, false);
    let texture = TextureHandle::new();
    let config = RenderTargetConfig {
        attachments: vec![RenderTargetAttachmentConfig {
            kind: AttachmentKind::Colour,
            source: AttachmentSource::Texture(texture),
        }],
        sync_to_window_size: false,
    };
    let targets = config
        .build_targets(
            "picking",
            &backend,
            Extent2D::new(1280, 720),
            Rect::new(0.0, 0.0, 256.0, 256.0),
        )
        .unwrap();

    assert_eq!(targets.len(), 3);
    assert!(targets.iter().all(|t| t.attachments() == [texture]));
    assert!(targets.iter().all(|t| (t.width(), t.height()) == (256, 256)));
}

#[test]
fn test_passes_from_config_follow_resizes() {
    let mut backend = StubBackend::new(3, true);
    let mut registry = build_registry(&backend);
    let shadow = registry.find("shadow").unwrap();
    let main = registry.find("main").unwrap();
    let shadow_depth = backend.depth.clone();

    assert_eq!(registry.get(main).unwrap().prev_name(), Some("shadow"));
    assert_eq!(registry.get(shadow).unwrap().prev_name(), None);

    let sizes = [(800, 600), (1, 1), (3840, 2160), (1280, 720)];
    for (generation, (width, height)) in sizes.into_iter().enumerate() {
        backend.resized(width as u16, height as u16).unwrap();
        for pass in [shadow, main] {
            registry
                .get_mut(pass)
                .unwrap()
                .resize(width, height, &backend)
                .unwrap();
        }

        let main_pass = registry.get(main).unwrap();
        assert_eq!(
            main_pass.render_area(),
            Rect::new(0.0, 0.0, width as f32, height as f32)
        );
        for (i, target) in main_pass.targets().iter().enumerate() {
            assert_eq!((target.width(), target.height()), (width, height));
            assert_eq!(target.generation() as usize, generation + 1);
            assert_eq!(target.attachments(), [backend.colour[i], backend.depth[i]]);
        }

        let shadow_pass = registry.get(shadow).unwrap();
        assert_eq!(
            shadow_pass.render_area(),
            Rect::new(0.0, 0.0, 1024.0, 1024.0)
        );
        for (i, target) in shadow_pass.targets().iter().enumerate() {
            assert_eq!((target.width(), target.height()), (1024, 1024));
            assert_eq!(target.generation(), 0);
            assert_eq!(target.attachments(), [shadow_depth[i]]);
        }
    }
}

#[test]
fn test_failed_resize_leaves_the_pass_untouched() {
    let mut backend = StubBackend::new(2, true);
    let mut registry = build_registry(&backend);
    let main = registry.find("main").unwrap();
    let before = registry.get(main).unwrap().targets().to_vec();

    // The recreated swapchain has no depth buffer.
    backend.depth.clear();
    let err = registry
        .get_mut(main)
        .unwrap()
        .resize(800, 600, &backend)
        .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::UnresolvedAttachment {
            kind: AttachmentKind::Depth,
            ..
        }
    ));
    let pass = registry.get(main).unwrap();
    assert_eq!(pass.targets(), before.as_slice());
    assert_eq!(pass.render_area(), Rect::new(0.0, 0.0, 1280.0, 720.0));
}

#[test]
fn test_view_resize_recomputes_projection_and_passes() {
    let mut backend = StubBackend::new(2, true);
    let mut registry = build_registry(&backend);
    let main = registry.find("main").unwrap();
    let config = RenderViewConfig::new("world", RenderViewKind::World, ["main"]);
    let mut state =
        RenderViewState::new(RenderViewId(0), &config, vec![main], Extent2D::new(1280, 720))
            .unwrap();
    let before = state.projection();

    backend.resized(800, 800).unwrap();
    state.resize(800, 800, &mut registry, &backend).unwrap();

    assert_eq!(state.extent(), Extent2D::new(800, 800));
    assert_ne!(state.projection(), before);
    let expected = ProjectionParams::default_for(ProjectionMatrixSource::Perspective)
        .matrix(ProjectionMatrixSource::Perspective, Extent2D::new(800, 800));
    assert_eq!(state.projection(), expected);

    let pass = registry.get(main).unwrap();
    assert_eq!(pass.render_area(), Rect::new(0.0, 0.0, 800.0, 800.0));
    assert_eq!(pass.target(1).unwrap().attachments()[0], backend.colour[1]);
}

#[test]
fn test_released_pass_ids_never_resolve_again() {
    let backend = StubBackend::new(1, true);
    let config = RendererConfig::from_json_str(CONFIG).unwrap();
    let mut registry = build_registry(&backend);

    let old = registry.find("main").unwrap();
    assert!(registry.release(old).is_some());
    assert!(registry.get(old).is_none());
    assert!(registry.release(old).is_none());

    let main = config.pass("main").unwrap();
    let targets = main
        .target
        .build_targets(
            "main",
            &backend,
            backend.surface_extent(),
            Rect::from_vec4(main.render_area),
        )
        .unwrap();
    let new = registry.register(main, targets).unwrap();
    assert_ne!(new, old);
    assert_eq!(new.index(), old.index());
    assert!(registry.get(old).is_none());
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.capacity(), 2);

    let duplicate = registry.register(main, Vec::new()).unwrap_err();
    assert_eq!(
        duplicate,
        ConfigError::DuplicatePass {
            pass: "main".into()
        }
    );
}
