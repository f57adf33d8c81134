use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::assets::{LoadEvent, ModelLoad};
use crate::config::{CAMERA_SETTINGS, MODEL_PATH, SCENE_SETTINGS, TOUCH_SENSITIVITY_BOOST};
use crate::render::frame_loop::{Frame, FrameLoop, LoopControl};
use crate::render::renderer::gpu::GpuState;
use crate::render::web_gpu::init_wgpu;
use crate::viewer::{ModelStatus, ViewerState};

use super::utils::{WebGPUNotSupportedMsg, add_camera_orbit, add_listener, container_size, is_desktop};

pub(crate) const CONTAINER_ID: &str = "box1";
pub(crate) const CANVAS_ID: &str = "cake-canvas";

// sizing is inline: `container_size` reads the laid-out box, so it must not
// depend on the stylesheet having loaded
pub(crate) const CONTAINER_STYLE: &str =
    "position: relative; width: 100%; height: 100vh; overflow: hidden; touch-action: none; user-select: none;";
pub(crate) const CANVAS_STYLE: &str = "display: block; width: 100%; height: 100%;";
const OVERLAY_STYLE: &str = "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; pointer-events: none;";
const TITLE_STYLE: &str = "position: absolute; top: 1rem; left: 0; right: 0; text-align: center; pointer-events: none;";
const HINT_STYLE: &str = "position: absolute; left: 0; right: 0; bottom: 1rem; display: flex; justify-content: center; pointer-events: none;";
const NOTE_STYLE: &str = "position: absolute; left: 0.5rem; bottom: 0.5rem; pointer-events: none;";

/// What the frame loop drives: the shared viewer state plus the GPU side.
struct Viewer {
    state: Rc<RefCell<ViewerState>>,
    gpu: GpuState,
    canvas: HtmlCanvasElement,
    load: ModelLoad,
}

impl Viewer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gpu.resize(width, height);
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.resize(width, height);
        }
    }
}

impl Frame for Viewer {
    fn frame(&mut self, _now_ms: f64) -> LoopControl {
        // the component was unmounted
        if !self.canvas.is_connected() {
            self.load.cancel();
            return LoopControl::Stop;
        }

        let Ok(mut state) = self.state.try_borrow_mut() else {
            return LoopControl::Continue;
        };

        state.tick();
        if let Err(e) = self.gpu.render(&state.camera, &state.scene) {
            log::error!("render failed: {e:#}");
        }

        LoopControl::Continue
    }
}

#[derive(Clone, Copy)]
struct ViewerSignals {
    gpu_support: RwSignal<bool>,
    show_hint: RwSignal<bool>,
    status: RwSignal<ModelStatus>,
    progress: RwSignal<Option<f64>>,
}

fn element_by_id<T: JsCast>(id: &str) -> Result<T> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| anyhow!("no document"))?
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("#{id} not in DOM yet"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("#{id} has the wrong element type"))
}

async fn start_viewer(signals: ViewerSignals) -> Result<()> {
    let container: HtmlElement = element_by_id(CONTAINER_ID)?;
    let canvas: HtmlCanvasElement = element_by_id(CANVAS_ID)?;

    let (width, height) = container_size(&container);
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));

    let gpu = match init_wgpu(&canvas).await {
        Ok(gpu) => gpu,
        Err(e) => {
            signals.gpu_support.set(false);
            return Err(e.context("WGPU init failed"));
        }
    };

    let camera_settings = if is_desktop() {
        CAMERA_SETTINGS
    } else {
        CAMERA_SETTINGS.with_rotation_boost(TOUCH_SENSITIVITY_BOOST)
    };

    let state = Rc::new(RefCell::new(ViewerState::new(
        camera_settings,
        SCENE_SETTINGS,
        width,
        height,
    )));

    let st = state.clone();
    let load = ModelLoad::spawn(MODEL_PATH, move |event| match event {
        LoadEvent::Progress(p) => {
            if let Some(pct) = p.percent() {
                log::info!("loading progress: {pct:.2}%");
                signals.progress.set(Some(pct));
            }
        }
        LoadEvent::Loaded(model) => {
            let mut s = st.borrow_mut();
            s.apply_load(Ok(model));
            signals.status.set(s.status());
        }
        LoadEvent::Failed(e) => {
            let mut s = st.borrow_mut();
            s.apply_load(Err(e));
            signals.status.set(s.status());
        }
    });

    add_camera_orbit(&state, &container, signals.show_hint)?;

    let viewer = Rc::new(RefCell::new(Viewer {
        state,
        gpu,
        canvas,
        load,
    }));

    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let v = viewer.clone();
    add_listener(&window, "resize", move |_: web_sys::Event| {
        let (w, h) = container_size(&container);
        if let Ok(mut viewer) = v.try_borrow_mut() {
            viewer.resize(w, h);
        }
    })?;

    FrameLoop::start(viewer)
}

#[component]
pub fn CakeViewer() -> impl IntoView {
    let signals = ViewerSignals {
        gpu_support: RwSignal::new(true),
        show_hint: RwSignal::new(true),
        status: RwSignal::new(ModelStatus::Loading),
        progress: RwSignal::new(None),
    };

    Effect::new(move |_| {
        spawn_local(async move {
            // wait until the <canvas> actually exists
            TimeoutFuture::new(0).await;

            if let Err(e) = start_viewer(signals).await {
                log::error!("{e:#}");
            }
        });
    });

    let ViewerSignals { gpu_support, show_hint, status, progress } = signals;

    view! {
        <div id=CONTAINER_ID class="group select-none bg-surface" style=CONTAINER_STYLE>
          <Show
            when=move || gpu_support.get()
            fallback=move || view! { <WebGPUNotSupportedMsg/> }
          >

          <canvas id=CANVAS_ID style=CANVAS_STYLE></canvas>

          <h1 class="text-3xl font-bold text-text" style=TITLE_STYLE>"Happy Birthday!"</h1>

          <Show when=move || status.get() == ModelStatus::Loading>
              <div class="text-text text-sm" style=OVERLAY_STYLE>
                <p>
                  "Loading cake… "
                  {move || progress.get().map(|p| format!("{p:.0}%")).unwrap_or_default()}
                </p>
              </div>
          </Show>

          <Show when=move || status.get() == ModelStatus::Failed>
              <p class="text-xs text-text/70" style=NOTE_STYLE>
                "The cake could not be loaded, showing a placeholder."
              </p>
          </Show>

          <Show when=move || show_hint.get()>
              <div id="hint"
                   class="text-text text-sm transition-opacity duration-500 group-hover:opacity-0"
                   style=HINT_STYLE>
                <p>"Click & drag to spin the cake ✋"</p>
              </div>
          </Show>

          </Show>
        </div>
    }
}
