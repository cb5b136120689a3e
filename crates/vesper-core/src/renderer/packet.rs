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

//! Per-frame data: what the application submits and what views produce.
//!
//! The application hands a [`RenderPacket`] to the renderer. Each entry names a
//! view and carries [`ViewPacketData`] for it. The view turns that into a
//! [`RenderViewPacket`], which lives exactly as long as the frame.

use super::view::{RenderViewId, RenderViewKind, ViewMatrixSource};
use crate::math::{Mat4, Vec3, Vec4};
use crate::resource::{GeometryHandle, SkyboxHandle};

/// A camera as seen by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    /// World-to-view transform.
    pub view: Mat4,
    /// Camera position in world space.
    pub position: Vec3,
}

impl CameraSnapshot {
    /// A camera at the origin with an identity view matrix.
    pub const IDENTITY: Self = Self {
        view: Mat4::IDENTITY,
        position: Vec3::ZERO,
    };

    /// A camera at `position` looking at `target`, with +Y up.
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self {
            view: Mat4::look_at_rh(position, target, Vec3::Y),
            position,
        }
    }
}

/// One drawable instance submitted by the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    /// Model-to-world transform.
    pub model: Mat4,
    /// The geometry to draw.
    pub geometry: GeometryHandle,
}

/// Input of a world view.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPacketData {
    /// The main scene camera.
    pub scene_camera: CameraSnapshot,
    /// The light camera, for views configured to render from it.
    pub light_camera: Option<CameraSnapshot>,
    /// Ambient light colour.
    pub ambient_colour: Vec4,
    /// Instances to draw. No culling is applied.
    pub meshes: Vec<MeshInstance>,
}

/// Input of a UI view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiPacketData {
    /// The UI camera. Identity when absent.
    pub ui_camera: Option<CameraSnapshot>,
    /// UI meshes to draw.
    pub meshes: Vec<MeshInstance>,
}

/// Input of a skybox view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxPacketData {
    /// The main scene camera.
    pub scene_camera: CameraSnapshot,
    /// The skybox to draw.
    pub skybox: SkyboxHandle,
}

/// The data a view builds its packet from. One variant per view kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPacketData {
    /// Data for a world view.
    World(WorldPacketData),
    /// Data for a UI view.
    Ui(UiPacketData),
    /// Data for a skybox view.
    Skybox(SkyboxPacketData),
}

impl ViewPacketData {
    /// The view kind this data is meant for.
    pub fn kind(&self) -> RenderViewKind {
        match self {
            ViewPacketData::World(_) => RenderViewKind::World,
            ViewPacketData::Ui(_) => RenderViewKind::Ui,
            ViewPacketData::Skybox(_) => RenderViewKind::Skybox,
        }
    }

    /// The camera this data provides for `source`, if any.
    ///
    /// A UI camera source always resolves: data without a UI camera yields the
    /// identity camera.
    pub fn camera(&self, source: ViewMatrixSource) -> Option<CameraSnapshot> {
        match (self, source) {
            (ViewPacketData::World(d), ViewMatrixSource::SceneCamera) => Some(d.scene_camera),
            (ViewPacketData::World(d), ViewMatrixSource::LightCamera) => d.light_camera,
            (ViewPacketData::Skybox(d), ViewMatrixSource::SceneCamera) => Some(d.scene_camera),
            (ViewPacketData::Ui(d), ViewMatrixSource::UiCamera) => {
                Some(d.ui_camera.unwrap_or(CameraSnapshot::IDENTITY))
            }
            (_, ViewMatrixSource::UiCamera) => Some(CameraSnapshot::IDENTITY),
            _ => None,
        }
    }
}

/// The view entry of a [`RenderPacket`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPacketInput {
    /// Name of the registered view.
    pub view: String,
    /// The data for that view.
    pub data: ViewPacketData,
}

/// Everything the application submits for one frame.
///
/// Views are rendered in the order they appear here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPacket {
    /// Seconds since the previous frame.
    pub delta_time: f64,
    /// Per-view inputs, in render order.
    pub views: Vec<ViewPacketInput>,
}

impl RenderPacket {
    /// Creates an empty packet.
    pub fn new(delta_time: f64) -> Self {
        Self {
            delta_time,
            views: Vec::new(),
        }
    }

    /// Appends a view entry.
    pub fn with_view(mut self, view: impl Into<String>, data: ViewPacketData) -> Self {
        self.views.push(ViewPacketInput {
            view: view.into(),
            data,
        });
        self
    }
}

/// One draw of a geometry with its transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryRenderData {
    /// Model-to-world transform.
    pub model: Mat4,
    /// The geometry to draw.
    pub geometry: GeometryHandle,
}

impl From<&MeshInstance> for GeometryRenderData {
    fn from(mesh: &MeshInstance) -> Self {
        Self {
            model: mesh.model,
            geometry: mesh.geometry,
        }
    }
}

/// Kind-specific payload of a [`RenderViewPacket`].
///
/// World and UI views carry their mesh list as the packet's `geometries` and
/// need nothing extra.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExtendedData {
    /// Nothing extra.
    #[default]
    Empty,
    /// The skybox of a skybox view.
    Skybox(SkyboxHandle),
}

/// What a view renders in one frame.
///
/// Built by `on_build_packet`, read by `on_render`, and consumed by
/// `on_destroy_packet`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderViewPacket {
    /// The view that built this packet.
    pub view: RenderViewId,
    /// World-to-view transform.
    pub view_matrix: Mat4,
    /// Projection transform.
    pub projection_matrix: Mat4,
    /// Camera position in world space.
    pub view_position: Vec3,
    /// Ambient light colour.
    pub ambient_colour: Vec4,
    /// Geometry to draw.
    pub geometries: Vec<GeometryRenderData>,
    /// Shader override of the view, if any.
    pub custom_shader_name: Option<String>,
    /// Kind-specific payload.
    pub extended_data: ExtendedData,
}

impl RenderViewPacket {
    /// Number of geometries in the packet.
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_camera_defaults_to_identity() {
        let data = ViewPacketData::Ui(UiPacketData::default());
        assert_eq!(
            data.camera(ViewMatrixSource::UiCamera),
            Some(CameraSnapshot::IDENTITY)
        );
        assert_eq!(data.camera(ViewMatrixSource::SceneCamera), None);
    }

    #[test]
    fn test_light_camera_is_optional() {
        let camera = CameraSnapshot::look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        let data = ViewPacketData::World(WorldPacketData {
            scene_camera: camera,
            light_camera: None,
            ambient_colour: Vec4::splat(0.25),
            meshes: vec![],
        });
        assert_eq!(data.kind(), RenderViewKind::World);
        assert_eq!(data.camera(ViewMatrixSource::SceneCamera), Some(camera));
        assert_eq!(data.camera(ViewMatrixSource::LightCamera), None);
    }

    #[test]
    fn test_render_packet_keeps_submission_order() {
        let sky = SkyboxPacketData {
            scene_camera: CameraSnapshot::IDENTITY,
            skybox: SkyboxHandle::new(),
        };
        let packet = RenderPacket::new(0.016)
            .with_view("skybox", ViewPacketData::Skybox(sky))
            .with_view("ui", ViewPacketData::Ui(UiPacketData::default()));
        let names: Vec<_> = packet.views.iter().map(|v| v.view.as_str()).collect();
        assert_eq!(names, ["skybox", "ui"]);
    }
}
