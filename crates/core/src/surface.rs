//! The 2D drawing surface a field renders onto.
//!
//! [`Surface`] is the seam between the animation and whatever actually puts
//! pixels on screen: a browser canvas (wasm crate), a CPU raster (engines
//! crate), or the in-memory [`Recorder`] used by tests.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::gradient::LinearGradient;

/// Pixel dimensions of a surface or viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }
}

/// How a circle is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    Gradient(LinearGradient),
}

/// A 2D drawing surface with canvas-like immediate-mode primitives.
///
/// Object-safe, so fields can draw through `&mut dyn Surface`.
pub trait Surface {
    /// Current pixel size of the drawing buffer.
    fn extent(&self) -> Extent;

    /// Size of the box the surface is laid out in. Fields sized to their
    /// container read this; viewport-sized fields ask the host instead.
    fn container_extent(&self) -> Extent;

    /// Resizes the drawing buffer. Existing content may be discarded.
    fn set_extent(&mut self, extent: Extent);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Strokes a straight segment.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f64);

    /// Fills a full circle.
    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &Fill);
}

/// One recorded call on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetExtent(Extent),
    Clear,
    Line {
        from: DVec2,
        to: DVec2,
        color: Rgba,
        width: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        fill: Fill,
    },
}

/// In-memory surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    extent: Extent,
    container: Extent,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    /// A recorder laid out in a container of the given size. The drawing
    /// buffer starts at the canvas default of 300x150 until resized.
    pub fn new(container: Extent) -> Self {
        Self {
            extent: Extent::new(300, 150),
            container,
            commands: Vec::new(),
        }
    }

    /// Changes the container box, as a page relayout would.
    pub fn set_container(&mut self, container: Extent) {
        self.container = container;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded history and clears it.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands recorded since the last `Clear`, i.e. the current frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl Surface for Recorder {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn container_extent(&self) -> Extent {
        self.container
    }

    fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
        self.commands.push(DrawCommand::SetExtent(extent));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &Fill) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: *fill,
        });
    }
}
