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

//! Plumbing shared by every view lane.

use vesper_core::renderer::{
    BackendError, CameraSnapshot, DrawCommand, RenderError, RenderPassRegistry, RenderViewPacket,
    RenderViewState, RendererBackend, ShapeMismatchError, ViewPacketData,
};

/// The error a view returns when handed data meant for another kind of view.
pub(crate) fn shape_mismatch(state: &RenderViewState, data: &ViewPacketData) -> RenderError {
    ShapeMismatchError {
        view: state.name().to_owned(),
        expected: state.kind(),
        received: data.kind(),
    }
    .into()
}

/// The camera for the view's configured view matrix source.
pub(crate) fn resolve_camera(
    state: &RenderViewState,
    data: &ViewPacketData,
) -> Result<CameraSnapshot, RenderError> {
    data.camera(state.view_matrix_source())
        .ok_or_else(|| RenderError::MissingCamera {
            view: state.name().to_owned(),
            source: state.view_matrix_source(),
        })
}

/// Runs every pass of the view in order: begin the pass on the selected
/// target, bind the globals, let `draw` record the view's commands, end the
/// pass.
///
/// Returns `false` at the first failure. A pass that was begun is still ended
/// so the backend is left outside of any pass.
pub(crate) fn execute_passes<F>(
    state: &RenderViewState,
    packet: &RenderViewPacket,
    passes: &RenderPassRegistry,
    backend: &mut dyn RendererBackend,
    render_target_index: usize,
    mut draw: F,
) -> bool
where
    F: FnMut(&mut dyn RendererBackend) -> Result<(), BackendError>,
{
    let Some(shader) = state.shader() else {
        log::warn!("Render view '{}' rendered before creation", state.name());
        return false;
    };

    for id in state.passes() {
        let Some(pass) = passes.get(*id) else {
            log::warn!(
                "Render view '{}' references released pass {id:?}",
                state.name()
            );
            return false;
        };

        if let Err(e) = backend.begin_renderpass(pass, render_target_index) {
            log::warn!(
                "Render view '{}': failed to begin pass '{}': {e}",
                state.name(),
                pass.name()
            );
            return false;
        }

        let recorded = backend
            .submit(DrawCommand::Globals {
                shader,
                projection: packet.projection_matrix,
                view: packet.view_matrix,
                view_position: packet.view_position,
                ambient_colour: packet.ambient_colour,
            })
            .and_then(|()| draw(&mut *backend));

        let ended = backend.end_renderpass(pass);

        if let Err(e) = recorded.and(ended) {
            log::warn!(
                "Render view '{}': pass '{}' failed: {e}",
                state.name(),
                pass.name()
            );
            return false;
        }
    }
    true
}

/// Submits one geometry draw per packet geometry.
pub(crate) fn draw_geometries(
    packet: &RenderViewPacket,
    backend: &mut dyn RendererBackend,
) -> Result<(), BackendError> {
    packet
        .geometries
        .iter()
        .try_for_each(|geometry| backend.submit(DrawCommand::Geometry(geometry)))
}
