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

//! Implements the UI view strategy: screen-space meshes under an orthographic
//! projection, seen through the UI camera.

use super::common::{draw_geometries, execute_passes, resolve_camera, shape_mismatch};
use vesper_core::math::Vec4;
use vesper_core::renderer::{
    ExtendedData, GeometryRenderData, PacketCounter, RenderError, RenderPassRegistry, RenderView,
    RenderViewPacket, RenderViewState, RendererBackend, ViewPacketData,
};

/// A lane rendering UI meshes.
#[derive(Debug)]
pub struct UiViewLane {
    state: RenderViewState,
    packets: PacketCounter,
}

impl UiViewLane {
    /// Creates a new `UiViewLane` over prepared view state.
    pub fn new(state: RenderViewState) -> Self {
        Self {
            state,
            packets: PacketCounter::default(),
        }
    }
}

impl RenderView for UiViewLane {
    fn strategy_name(&self) -> &'static str {
        "UI"
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
        let ViewPacketData::Ui(ui) = data else {
            return Err(shape_mismatch(&self.state, data));
        };
        let camera = resolve_camera(&self.state, data)?;

        let packet = RenderViewPacket {
            view: self.state.id(),
            view_matrix: camera.view,
            projection_matrix: self.state.projection(),
            view_position: camera.position,
            // UI is unlit.
            ambient_colour: Vec4::ONE,
            geometries: ui.meshes.iter().map(GeometryRenderData::from).collect(),
            custom_shader_name: self.state.custom_shader_name().map(str::to_owned),
            extended_data: ExtendedData::Empty,
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
        execute_passes(
            &self.state,
            packet,
            passes,
            backend,
            render_target_index,
            |backend| draw_geometries(packet, backend),
        )
    }
}
