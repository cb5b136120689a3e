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

//! # Vesper Lanes
//!
//! Swappable render view strategies. Each lane turns per-frame view data into a
//! packet and drives the view's passes on a backend. Lanes hold no frame
//! policy of their own; the `Renderer` in `vesper-agents` decides when they run.

#![warn(missing_docs)]

pub mod view_lane;

pub use view_lane::{create_view, SkyboxViewLane, UiViewLane, WorldViewLane};
