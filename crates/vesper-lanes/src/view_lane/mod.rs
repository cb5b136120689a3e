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

//! Render view lanes: one strategy per view kind.
//!
//! Every lane implements [`RenderView`] over a shared
//! [`RenderViewState`]. They differ in the packet data they accept, how they
//! fill the packet, and what they draw inside each pass:
//!
//! | lane              | accepts                   | draws                    |
//! |-------------------|---------------------------|--------------------------|
//! | [`WorldViewLane`] | `ViewPacketData::World`   | one draw per mesh        |
//! | [`UiViewLane`]    | `ViewPacketData::Ui`      | one draw per UI mesh     |
//! | [`SkyboxViewLane`]| `ViewPacketData::Skybox`  | the skybox               |

mod common;
mod skybox;
mod ui;
mod world;

pub use skybox::SkyboxViewLane;
pub use ui::UiViewLane;
pub use world::WorldViewLane;

use vesper_core::renderer::{RenderView, RenderViewKind, RenderViewState};

/// Creates the lane matching the state's view kind.
pub fn create_view(state: RenderViewState) -> Box<dyn RenderView> {
    match state.kind() {
        RenderViewKind::World => Box::new(WorldViewLane::new(state)),
        RenderViewKind::Ui => Box::new(UiViewLane::new(state)),
        RenderViewKind::Skybox => Box::new(SkyboxViewLane::new(state)),
    }
}
