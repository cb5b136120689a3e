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

//! Implements the skybox view strategy.
//!
//! The packet carries the full scene camera view matrix. Stripping the
//! translation so the cube stays centred on the camera is the backend's job,
//! since it depends on how the skybox shader consumes the matrix.

use super::common::{execute_passes, resolve_camera, shape_mismatch};
use vesper_core::math::Vec4;
use vesper_core::renderer::{
    DrawCommand, ExtendedData, PacketCounter, RenderError, RenderPassRegistry, RenderView,
    RenderViewPacket, RenderViewState, RendererBackend, ViewPacketData,
};

/// A lane drawing a single skybox behind the scene.
#[derive(Debug)]
pub struct SkyboxViewLane {
    state: RenderViewState,
    packets: PacketCounter,
}

impl SkyboxViewLane {
    /// Creates a new `SkyboxViewLane` over prepared view state.
    pub fn new(state: RenderViewState) -> Self {
        Self {
            state,
            packets: PacketCounter::default(),
        }
    }
}

impl RenderView for SkyboxViewLane {
    fn strategy_name(&self) -> &'static str {
        "Skybox"
    }

    fn state(&self) -> &RenderViewState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RenderViewState {
        &mut self.state
    }

    fn packet_counter(&self) -> &PacketCounter {
        &self.packets
    }

    fn on_build_packet(&self, data: &ViewPacketData) -> Result<RenderViewPacket, RenderError> {
        let ViewPacketData::Skybox(skybox) = data else {
            return Err(shape_mismatch(&self.state, data));
        };
        let camera = resolve_camera(&self.state, data)?;

        let packet = RenderViewPacket {
            view: self.state.id(),
            view_matrix: camera.view,
            projection_matrix: self.state.projection(),
            view_position: camera.position,
            ambient_colour: Vec4::ONE,
            geometries: Vec::new(),
            custom_shader_name: self.state.custom_shader_name().map(str::to_owned),
            extended_data: ExtendedData::Skybox(skybox.skybox),
        };
        self.packets.built();
        Ok(packet)
    }

    fn on_render(
        &self,
        packet: &RenderViewPacket,
        passes: &RenderPassRegistry,
        backend: &mut dyn RendererBackend,
        _frame_number: u64,
        render_target_index: usize,
    ) -> bool {
        // An empty payload renders nothing but still runs the passes (clears).
        let skybox = match packet.extended_data {
            ExtendedData::Skybox(handle) => Some(handle),
            _ => None,
        };
        execute_passes(
            &self.state,
            packet,
            passes,
            backend,
            render_target_index,
            |backend| match skybox {
                Some(handle) => backend.submit(DrawCommand::Skybox(handle)),
                None => Ok(()),
            },
        )
    }
}
