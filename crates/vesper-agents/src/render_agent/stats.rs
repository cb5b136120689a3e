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

//! Statistics for the frame orchestrator.

/// A summary of one `draw_frame` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// A sequential counter for drawn frames.
    pub frame_number: u64,
    /// The delta time the frame was drawn with, in seconds.
    pub delta_time: f64,
    /// The frame-in-flight index the views rendered into.
    pub render_target_index: usize,
    /// The number of views whose packet was built.
    pub packets_built: usize,
    /// The number of views that rendered successfully.
    pub views_rendered: usize,
    /// The number of views that failed to build or render.
    pub views_failed: usize,
    /// The total number of geometries across all packets.
    pub geometry_count: usize,
}
