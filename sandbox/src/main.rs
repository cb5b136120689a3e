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

// Vesper Sandbox
// Drives a skybox, a world and a UI view over the headless backend.

use anyhow::{Context, Result};
use vesper_agents::Renderer;
use vesper_core::math::{Mat4, Vec3, Vec4};
use vesper_core::renderer::{
    CameraSnapshot, MeshInstance, RenderPacket, RendererBackend, RendererConfig, SkyboxPacketData,
    UiPacketData, ViewPacketData, WorldPacketData,
};
use vesper_core::resource::{GeometryHandle, SkyboxHandle};
use vesper_infra::{init_logging, HeadlessBackend, HeadlessConfig, LoggingConfig};

const DEFAULT_CONFIG: &str = include_str!("../config/renderer.json");
const FRAME_COUNT: u32 = 120;
const DELTA_TIME: f64 = 1.0 / 60.0;

fn load_config() -> Result<RendererConfig> {
    match std::env::args().nth(1) {
        Some(path) => RendererConfig::from_json_file(&path)
            .with_context(|| format!("loading renderer configuration from '{path}'")),
        None => RendererConfig::from_json_str(DEFAULT_CONFIG)
            .context("parsing the built-in renderer configuration"),
    }
}

struct Scene {
    cubes: Vec<GeometryHandle>,
    skybox: SkyboxHandle,
    quad: GeometryHandle,
}

impl Scene {
    fn new() -> Self {
        Self {
            cubes: (0..4).map(|_| GeometryHandle::new()).collect(),
            skybox: SkyboxHandle::new(),
            quad: GeometryHandle::new(),
        }
    }

    /// Builds the packet for one frame, orbiting the camera around the cubes.
    fn packet(&self, time: f32) -> RenderPacket {
        let eye = Vec3::new(10.0 * time.cos(), 4.0, 10.0 * time.sin());
        let camera = CameraSnapshot::look_at(eye, Vec3::ZERO);

        let meshes = self
            .cubes
            .iter()
            .enumerate()
            .map(|(i, geometry)| MeshInstance {
                model: Mat4::from_rotation_y(time + i as f32)
                    * Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)),
                geometry: *geometry,
            })
            .collect();

        RenderPacket::new(DELTA_TIME)
            .with_view(
                "skybox",
                ViewPacketData::Skybox(SkyboxPacketData {
                    scene_camera: camera,
                    skybox: self.skybox,
                }),
            )
            .with_view(
                "world",
                ViewPacketData::World(WorldPacketData {
                    scene_camera: camera,
                    light_camera: None,
                    ambient_colour: Vec4::new(0.25, 0.25, 0.25, 1.0),
                    meshes,
                }),
            )
            .with_view(
                "ui",
                ViewPacketData::Ui(UiPacketData {
                    ui_camera: None,
                    meshes: vec![MeshInstance {
                        model: Mat4::from_scale(Vec3::new(200.0, 50.0, 1.0)),
                        geometry: self.quad,
                    }],
                }),
            )
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = load_config()?;
    let app_name = config.app_name.clone();

    let mut renderer = Renderer::new(|| {
        Ok(Box::new(HeadlessBackend::new(HeadlessConfig::default())) as Box<dyn RendererBackend>)
    });
    renderer.initialize(&app_name)?;

    for (view, error) in renderer.load_config(&config) {
        log::warn!("View '{view}' was not loaded: {error}");
    }
    log::info!("Views: {:?}", renderer.view_names());

    let scene = Scene::new();
    for frame in 0..FRAME_COUNT {
        if frame == FRAME_COUNT / 2 {
            renderer.on_resize(800, 600)?;
        }
        let time = frame as f32 * DELTA_TIME as f32;
        match renderer.draw_frame(&scene.packet(time)) {
            Ok(stats) if frame % 30 == 0 => log::info!(
                "Frame {}: {} views, {} geometries, target {}",
                stats.frame_number,
                stats.views_rendered,
                stats.geometry_count,
                stats.render_target_index
            ),
            Ok(_) => {}
            Err(e) if e.is_device_lost() => return Err(e.into()),
            Err(e) => log::warn!("{e}"),
        }
    }

    renderer.shutdown()?;
    log::info!("Sandbox finished after {} frames", renderer.frame_number());
    Ok(())
}
