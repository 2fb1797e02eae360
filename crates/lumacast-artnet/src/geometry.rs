//! Fixture sample rectangles
//!
//! A fixture declaration covers a bounding box of the frame. The box is shared by
//! every repeated instance of the fixture, so a [`RectangleSolver`] decides which
//! part of the box each instance samples. Solvers must be pure: the same
//! `(box, index, count)` always yields the same rectangle.

use glam::Vec2;

use crate::config::FixtureBox;

/// An oriented rectangle in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub center: Vec2,
    pub half_size: Vec2,
    /// Radians, clockwise in y-down pixel space
    pub rotation: f32,
}

impl Rectangle {
    /// Axis-aligned rectangle from its top-left corner and size
    pub fn from_corner(x: f32, y: f32, width: f32, height: f32) -> Self {
        let half_size = Vec2::new(width, height) * 0.5;
        Self {
            center: Vec2::new(x, y) + half_size,
            half_size,
            rotation: 0.0,
        }
    }

    /// Whether a point lies inside (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        let local = Vec2::from_angle(-self.rotation).rotate(point - self.center);
        local.x.abs() <= self.half_size.x && local.y.abs() <= self.half_size.y
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let (sin, cos) = self.rotation.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent = Vec2::new(
            self.half_size.x * cos + self.half_size.y * sin,
            self.half_size.x * sin + self.half_size.y * cos,
        );
        (self.center - extent, self.center + extent)
    }
}

/// Turns a fixture box plus instance index into the rectangle that instance samples.
pub trait RectangleSolver {
    fn compute_rectangle(&self, fixture_box: &FixtureBox, index: usize, count: usize)
        -> Rectangle;
}

/// Splits the box into `count` equal slices along its own x axis.
///
/// Slice `i` keeps the full box height and the box rotation; slice 0 is at the
/// box's left edge before rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripSolver;

impl RectangleSolver for StripSolver {
    fn compute_rectangle(
        &self,
        fixture_box: &FixtureBox,
        index: usize,
        count: usize,
    ) -> Rectangle {
        let count = count.max(1) as f32;
        let size = Vec2::new(fixture_box.width, fixture_box.height);
        let box_center = Vec2::new(fixture_box.x, fixture_box.y) + size * 0.5;
        let rotation = fixture_box.rotation.to_radians();

        let slice_width = fixture_box.width / count;
        let offset = Vec2::new(
            -fixture_box.width * 0.5 + (index as f32 + 0.5) * slice_width,
            0.0,
        );

        Rectangle {
            center: box_center + Vec2::from_angle(rotation).rotate(offset),
            half_size: Vec2::new(slice_width, fixture_box.height) * 0.5,
            rotation,
        }
    }
}
