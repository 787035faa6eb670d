#![deny(unsafe_code)]
//! Browser bindings for neural-flow.
//!
//! [`CanvasSurface`] draws through a `CanvasRenderingContext2d`, and
//! [`WebHost`] drives frames with `requestAnimationFrame` and listens for
//! window resizes. At load the autostart presets are mounted on their canvas
//! ids; pages can start more fields with [`start_field`] and stop them with
//! the returned [`FieldHandle`].

use std::rc::Rc;

use glam::DVec2;
use neural_flow_core::{
    Extent, FieldConfig, Fill, Host, LinearGradient, Rgba, StopHandle, Surface, Xorshift64,
};
use neural_flow_engines::Preset;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    gradient: Option<(LinearGradient, CanvasGradient)>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            gradient: None,
        })
    }

    /// The cached `CanvasGradient` for `g`, rebuilt when its span changes.
    fn canvas_gradient(&mut self, g: &LinearGradient) -> Result<CanvasGradient, JsValue> {
        if let Some((key, cached)) = &self.gradient {
            if key == g {
                return Ok(cached.clone());
            }
        }
        let cg = self
            .ctx
            .create_linear_gradient(g.from.x, g.from.y, g.to.x, g.to.y);
        cg.add_color_stop(0.0, &g.start.to_hex())?;
        cg.add_color_stop(1.0, &g.end.to_hex())?;
        self.gradient = Some((*g, cg.clone()));
        Ok(cg)
    }
}

impl Surface for CanvasSurface {
    fn extent(&self) -> Extent {
        Extent::new(self.canvas.width(), self.canvas.height())
    }

    fn container_extent(&self) -> Extent {
        Extent::new(
            self.canvas.offset_width().max(0) as u32,
            self.canvas.offset_height().max(0) as u32,
        )
    }

    fn set_extent(&mut self, extent: Extent) {
        self.canvas.set_width(extent.width);
        self.canvas.set_height(extent.height);
    }

    fn clear(&mut self) {
        let size = self.extent().as_dvec2();
        self.ctx.clear_rect(0.0, 0.0, size.x, size.y);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &Fill) {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Fill::Gradient(g) => match self.canvas_gradient(g) {
                Ok(cg) => self.ctx.set_fill_style_canvas_gradient(&cg),
                Err(e) => {
                    log::warn!("gradient rejected: {e:?}");
                    self.ctx.set_fill_style_str(&g.start.to_hex());
                }
            },
        }
        self.ctx.begin_path();
        if let Err(e) = self
            .ctx
            .arc(center.x, center.y, radius.max(0.0), 0.0, std::f64::consts::TAU)
        {
            log::warn!("arc failed: {e:?}");
            return;
        }
        self.ctx.fill();
    }
}

/// The page: canvas lookup, viewport, frame scheduling and resize events.
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }
}

fn js_dimension(v: Result<JsValue, JsValue>) -> u32 {
    v.ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |f| f.max(0.0) as u32)
}

impl Host for WebHost {
    type Surface = CanvasSurface;

    fn find_surface(&self, id: &str) -> Option<CanvasSurface> {
        let canvas = self
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        CanvasSurface::new(canvas)
            .map_err(|e| log::warn!("canvas '{id}' has no 2d context: {e:?}"))
            .ok()
    }

    fn viewport(&self) -> Extent {
        Extent::new(
            js_dimension(self.window.inner_width()),
            js_dimension(self.window.inner_height()),
        )
    }

    fn request_frame(&self, frame: Box<dyn FnOnce()>) {
        let cb = Closure::once_into_js(move || frame());
        if let Err(e) = self.window.request_animation_frame(cb.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
    }

    fn on_resize(&self, listener: Box<dyn FnMut()>) {
        let cb = Closure::<dyn FnMut()>::wrap(listener);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
        {
            log::error!("resize listener rejected: {e:?}");
        }
        // listeners live as long as the page
        cb.forget();
    }
}

/// A running field. Call `stop()` to end its animation.
#[wasm_bindgen]
pub struct FieldHandle {
    stop: StopHandle,
    _host: Rc<WebHost>,
}

#[wasm_bindgen]
impl FieldHandle {
    pub fn stop(&self) {
        self.stop.stop();
    }

    #[wasm_bindgen(getter)]
    pub fn stopped(&self) -> bool {
        self.stop.is_stopped()
    }
}

fn random_seed() -> u64 {
    Xorshift64::from_unit(js_sys::Math::random()).next_u64()
}

fn mount(host: &Rc<WebHost>, canvas_id: &str, config: &FieldConfig) -> Option<FieldHandle> {
    neural_flow_core::host::start(host, canvas_id, config, random_seed()).map(|stop| FieldHandle {
        stop,
        _host: Rc::clone(host),
    })
}

/// Starts `preset` on the canvas with id `canvas_id`.
///
/// `params_json` is an optional JSON object of config overrides. Returns
/// `undefined` when the canvas does not exist; throws on an unknown preset or
/// invalid overrides.
#[wasm_bindgen]
pub fn start_field(
    canvas_id: &str,
    preset: &str,
    params_json: Option<String>,
) -> Result<Option<FieldHandle>, JsValue> {
    let preset = Preset::from_name(preset).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = match params_json {
        Some(raw) => {
            let params: serde_json::Value =
                serde_json::from_str(&raw).map_err(|e| JsValue::from_str(&e.to_string()))?;
            preset
                .config
                .with_overrides(&params)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => preset.config,
    };
    let host = Rc::new(WebHost::new()?);
    Ok(mount(&host, canvas_id, &config))
}

/// Names of all registered presets.
#[wasm_bindgen]
pub fn preset_names() -> Vec<JsValue> {
    Preset::list_presets()
        .iter()
        .map(|p| JsValue::from_str(p.name))
        .collect()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let host = Rc::new(WebHost::new()?);
    for preset in Preset::autostart() {
        let Some(canvas_id) = preset.surface_id else {
            continue;
        };
        if preset.start_delay_ms == 0 {
            autostart(&host, preset, canvas_id);
            continue;
        }
        let delayed = Rc::clone(&host);
        let cb = Closure::once_into_js(move || autostart(&delayed, preset, canvas_id));
        host.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                preset.start_delay_ms as i32,
            )?;
    }
    Ok(())
}

fn autostart(host: &Rc<WebHost>, preset: &'static Preset, canvas_id: &str) {
    if let Some(handle) = mount(host, canvas_id, &preset.config) {
        log::info!("{} started on #{canvas_id}", preset.name);
        // autostarted fields run for the life of the page
        std::mem::forget(handle);
    }
}
