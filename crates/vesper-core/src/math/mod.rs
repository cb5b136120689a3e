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

//! Math value types used by the render contracts.
//!
//! Vectors and matrices are treated as plain values owned by an external math
//! library (`glam`); this module only re-exports them and adds the handful of
//! rendering-specific shapes the pipeline passes around.
//!
//! All angular functions operate in **radians** unless stated otherwise.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

pub use std::f32::consts::PI;

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use vesper_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// A two-dimensional pixel extent, typically a surface or view size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `1.0` when the height is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// An axis-aligned rectangle in pixels, stored as `(x, y, width, height)`.
///
/// This is the shape of a render pass's render area. It is built from the
/// `vec4` used by the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal size.
    pub width: f32,
    /// Vertical size.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Interprets a `vec4` as `(x, y, width, height)`.
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Returns the rectangle packed back into a `vec4`.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.width, self.height)
    }

    /// A rectangle is degenerate when either side is not strictly positive.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 10.0).is_degenerate());
        assert!(!Rect::new(5.0, 5.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_rect_vec4_roundtrip_keeps_layout() {
        let rect = Rect::from_vec4(Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect.to_vec4(), Vec4::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_extent_aspect_ratio() {
        assert_eq!(Extent2D::new(800, 400).aspect_ratio(), 2.0);
        assert_eq!(Extent2D::new(800, 0).aspect_ratio(), 1.0);
    }
}
