//! A moving point (particle or node) and its pure motion step.

use glam::DVec2;

use crate::surface::Extent;

/// One particle or node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    /// Fill opacity in [0, 1]. Node-graph points keep 1.0 and use the
    /// shared gradient instead.
    pub opacity: f64,
}

impl Point {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, opacity: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

/// Moves `point` one step and reflects it off the edges of `bounds`.
///
/// After `position += velocity`, a component whose coordinate lies outside
/// `[0, size]` and is still heading outward has its velocity negated. The
/// position is not clamped, so a point may sit up to one step outside the
/// surface for a frame. Speed is never changed.
///
/// A point that is outside but already heading back (e.g. after the surface
/// shrank) is left alone rather than flipped every frame. This differs on
/// purpose from an unconditional flip, which would trap such a point outside.
pub fn advance(point: Point, bounds: Extent) -> Point {
    let size = bounds.as_dvec2();
    let position = point.position + point.velocity;
    let velocity = DVec2::new(
        reflect(position.x, point.velocity.x, size.x),
        reflect(position.y, point.velocity.y, size.y),
    );
    Point {
        position,
        velocity,
        ..point
    }
}

fn reflect(coord: f64, v: f64, max: f64) -> f64 {
    if (coord < 0.0 && v < 0.0) || (coord > max && v > 0.0) {
        -v
    } else {
        v
    }
}
