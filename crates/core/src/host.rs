//! Running a field inside a host environment.
//!
//! A [`Host`] supplies the things a page gives an animation: a way to find a
//! surface by id, the viewport size, a "call me before the next repaint"
//! primitive, and resize notifications. [`start`] wires an
//! [`AnimatedField`] to those and returns a [`StopHandle`].
//!
//! Everything is single-threaded. Frame and resize callbacks run between
//! ticks, never during one, so shared state lives in `Rc<RefCell<_>>`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::{FieldConfig, Sizing};
use crate::field::AnimatedField;
use crate::prng::Xorshift64;
use crate::surface::{Extent, Surface};

/// The environment a field runs in.
pub trait Host {
    type Surface: Surface + 'static;

    /// Looks up a drawing surface by its document id.
    fn find_surface(&self, id: &str) -> Option<Self::Surface>;

    /// Current viewport size.
    fn viewport(&self) -> Extent;

    /// Runs `frame` once, right before the next repaint.
    fn request_frame(&self, frame: Box<dyn FnOnce()>);

    /// Calls `listener` after every viewport resize.
    fn on_resize(&self, listener: Box<dyn FnMut()>);
}

/// Stops a running field. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Rc<Cell<bool>>,
}

impl StopHandle {
    /// Ends the frame loop at the next scheduled frame and mutes the resize
    /// listener. Idempotent.
    pub fn stop(&self) {
        if !self.stopped.replace(true) {
            log::debug!("field stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

struct Running<S> {
    field: AnimatedField,
    surface: S,
    sizing: Sizing,
}

impl<S: Surface> Running<S> {
    fn resize(&mut self, viewport: Extent) {
        let extent = measure(self.sizing, &self.surface, viewport);
        self.surface.set_extent(extent);
        self.field.resize(extent);
        log::debug!("field resized to {}x{}", extent.width, extent.height);
    }
}

fn measure(sizing: Sizing, surface: &impl Surface, viewport: Extent) -> Extent {
    match sizing {
        Sizing::Container => surface.container_extent(),
        Sizing::Viewport => viewport,
    }
}

/// Creates a field on surface `surface_id` and starts animating it.
///
/// If the host has no such surface the field is disabled: a warning is
/// logged, nothing is drawn, no frame is requested, no listener is
/// registered, and `None` is returned. This is not an error.
///
/// Otherwise the surface is sized per `config.sizing`, points are scattered
/// from `seed`, a resize listener is registered, and the first frame is
/// requested. Every frame ticks the field once and requests the next one
/// until the returned handle is stopped or the host is dropped. Calling this
/// twice for the same surface runs two independent animations.
pub fn start<H: Host + 'static>(
    host: &Rc<H>,
    surface_id: &str,
    config: &FieldConfig,
    seed: u64,
) -> Option<StopHandle> {
    let Some(mut surface) = host.find_surface(surface_id) else {
        log::warn!("surface '{surface_id}' not found; field disabled");
        return None;
    };

    let viewport = host.viewport();
    let extent = measure(config.sizing, &surface, viewport);
    surface.set_extent(extent);

    let mut rng = Xorshift64::new(seed);
    let field = AnimatedField::new(config, extent, viewport.width, &mut rng);
    log::debug!(
        "field on '{surface_id}' started: {:?}, {} points, {}x{}",
        config.mode,
        field.points().len(),
        extent.width,
        extent.height
    );

    let state = Rc::new(RefCell::new(Running {
        field,
        surface,
        sizing: config.sizing,
    }));
    let handle = StopHandle::default();

    {
        let weak_host = Rc::downgrade(host);
        let state = Rc::clone(&state);
        let handle = handle.clone();
        host.on_resize(Box::new(move || {
            if handle.is_stopped() {
                return;
            }
            if let Some(host) = weak_host.upgrade() {
                state.borrow_mut().resize(host.viewport());
            }
        }));
    }

    schedule(&**host, Rc::downgrade(host), state, handle.clone());
    Some(handle)
}

fn schedule<H: Host + 'static>(
    host: &H,
    weak_host: Weak<H>,
    state: Rc<RefCell<Running<H::Surface>>>,
    handle: StopHandle,
) {
    host.request_frame(Box::new(move || {
        if handle.is_stopped() {
            return;
        }
        let Some(host) = weak_host.upgrade() else {
            log::debug!("host dropped; field loop ended");
            return;
        };
        {
            let mut running = state.borrow_mut();
            let Running { field, surface, .. } = &mut *running;
            field.tick(surface);
            log::trace!("frame {}", field.frames());
        }
        schedule(&*host, weak_host, state, handle);
    }));
}
