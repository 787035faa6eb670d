//! The animated point field: a fixed set of points, advanced and drawn once
//! per frame.
//!
//! A field never gains or loses points after creation. Resizing changes the
//! bounds the points reflect off (and, in node-graph mode, the gradient span)
//! but leaves every point where it is.

use glam::DVec2;

use crate::config::{ColorScheme, FieldConfig, Mode};
use crate::gradient::LinearGradient;
use crate::point::{advance, Point};
use crate::prng::Xorshift64;
use crate::surface::{Extent, Fill, Surface};

/// A line drawn between two nearby nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub alpha: f64,
}

/// The complete set of animated points for one surface.
#[derive(Debug, Clone)]
pub struct AnimatedField {
    extent: Extent,
    points: Vec<Point>,
    config: FieldConfig,
    gradient: Option<LinearGradient>,
    frames: u64,
}

impl AnimatedField {
    /// Scatters points over `extent` using `rng`.
    ///
    /// The point count comes from `config.count` resolved against
    /// `viewport_width`. Each point draws x, y, vx, vy, radius and (particle
    /// mode) opacity from `rng`, in that order. A zero-sized extent puts every
    /// point at the origin.
    pub fn new(
        config: &FieldConfig,
        extent: Extent,
        viewport_width: u32,
        rng: &mut Xorshift64,
    ) -> Self {
        let count = config.count.resolve(viewport_width);
        let size = extent.as_dvec2();
        let points = (0..count)
            .map(|_| {
                let position =
                    DVec2::new(rng.next_range(0.0, size.x), rng.next_range(0.0, size.y));
                let velocity =
                    DVec2::new(rng.next_centered(config.speed), rng.next_centered(config.speed));
                let radius = config.radius.sample(rng);
                let opacity = match config.mode {
                    Mode::Particles => config.opacity.sample(rng),
                    Mode::NodeGraph => 1.0,
                };
                Point::new(position, velocity, radius, opacity)
            })
            .collect();
        Self::from_points(config, extent, points)
    }

    /// Builds a field around explicit points.
    pub fn from_points(config: &FieldConfig, extent: Extent, points: Vec<Point>) -> Self {
        let gradient = match config.color {
            ColorScheme::Gradient { start, end } => {
                Some(LinearGradient::diagonal(extent, start, end))
            }
            ColorScheme::Flat { .. } => None,
        };
        Self {
            extent,
            points,
            config: *config,
            gradient,
            frames: 0,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The configuration this field was built from.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// The shared node fill, present only for gradient color schemes.
    pub fn gradient(&self) -> Option<&LinearGradient> {
        self.gradient.as_ref()
    }

    /// Number of completed ticks.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Adopts new surface bounds. Points keep their position and velocity.
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        if let Some(gradient) = self.gradient.as_mut() {
            *gradient = gradient.respan(extent);
        }
    }

    /// Every unordered pair closer than the edge threshold.
    ///
    /// Empty in particle mode. This is O(n²); the presets stay at or below
    /// 80 nodes.
    pub fn edges(&self) -> Vec<Edge> {
        if self.config.mode != Mode::NodeGraph {
            return Vec::new();
        }
        let mut edges = Vec::new();
        for (a, pa) in self.points.iter().enumerate() {
            for (offset, pb) in self.points[a + 1..].iter().enumerate() {
                let distance = pa.position.distance(pb.position);
                if let Some(alpha) = self.config.edges.alpha_at(distance) {
                    edges.push(Edge {
                        a,
                        b: a + 1 + offset,
                        distance,
                        alpha,
                    });
                }
            }
        }
        edges
    }

    fn fill_for(&self, point: &Point) -> Fill {
        match (self.config.color, self.gradient) {
            (_, Some(gradient)) => Fill::Gradient(gradient),
            (ColorScheme::Flat { color }, None) => Fill::Solid(color.with_alpha(point.opacity)),
            (ColorScheme::Gradient { start, .. }, None) => {
                Fill::Solid(start.with_alpha(point.opacity))
            }
        }
    }

    /// Renders one frame and advances every point by one step.
    ///
    /// Clears the surface, strokes edges (node-graph mode), then for each
    /// point fills its circle at the current position and moves it. The
    /// frame therefore shows positions from before this step.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        surface.clear();

        let style = self.config.edges;
        for edge in self.edges() {
            surface.stroke_line(
                self.points[edge.a].position,
                self.points[edge.b].position,
                style.color.with_alpha(edge.alpha),
                style.width,
            );
        }

        let bounds = self.extent;
        for i in 0..self.points.len() {
            let point = self.points[i];
            surface.fill_circle(point.position, point.radius, &self.fill_for(&point));
            self.points[i] = advance(point, bounds);
        }

        self.frames += 1;
    }
}
