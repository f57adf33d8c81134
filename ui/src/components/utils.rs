use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use glam::Vec2;
use leptos::prelude::*;
use wasm_bindgen::{JsCast, convert::FromWasmAbi, prelude::Closure};
use web_sys::{EventTarget, HtmlElement, PointerEvent};

use crate::render::renderer::camera_input::Cursor;
use crate::viewer::ViewerState;

/// true on PCs with a mouse/track-pad, false on touch devices
pub fn is_desktop() -> bool {
    let Some(win) = web_sys::window() else {
        return true;
    };
    // media query: fine pointer => mouse/trackpad
    if let Ok(Some(mql)) = win.match_media("(pointer: fine)") {
        if mql.matches() {
            return true;
        }
    }
    // fallback: no touch points => desktop
    win.navigator().max_touch_points() == 0
}

#[component]
pub fn WebGPUNotSupportedMsg() -> impl IntoView {
    view! {
        <div class="max-w-md mx-auto bg-blue-50 border border-blue-200 rounded-lg p-6 shadow-sm text-blue-800">
          <h2 class="text-xl font-semibold mb-2">"WebGPU Not Supported"</h2>
          <p class="mb-4 leading-relaxed">
            "The cake is drawn with " <span class="font-bold">"WebGPU"</span>
            ", which this browser could not start."
          </p>
          <p class="text-sm text-blue-700">
            "Try a recent Chrome, Edge or Opera, or enable "
            <i>"chrome://flags/#enable-unsafe-webgpu"</i>"."
          </p>
        </div>
    }
}

pub fn add_listener<T, F>(target: &impl AsRef<EventTarget>, ty: &str, f: F) -> Result<()>
where
    T: 'static + JsCast + FromWasmAbi,
    F: 'static + FnMut(T),
{
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(_)>);
    target
        .as_ref()
        .add_event_listener_with_callback(ty, cb.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("failed to add {ty} listener: {e:?}"))?;
    // listeners live as long as the page
    cb.forget();
    Ok(())
}

pub fn set_cursor(element: &HtmlElement, cursor: Cursor) {
    if let Err(e) = element.style().set_property("cursor", cursor.as_css()) {
        log::warn!("failed to set cursor: {e:?}");
    }
}

/// Layout size of the host container in CSS pixels.
pub fn container_size(container: &HtmlElement) -> (u32, u32) {
    (
        container.offset_width().max(0) as u32,
        container.offset_height().max(0) as u32,
    )
}

fn pointer_pos(e: &PointerEvent) -> Vec2 {
    Vec2::new(e.client_x() as f32, e.client_y() as f32)
}

/// Drag-to-orbit: press on the viewport, release anywhere.
///
/// Only the pointer that started the drag steers it. A cancelled touch or
/// lost capture ends the drag the same way a release does.
pub fn add_camera_orbit(
    state: &Rc<RefCell<ViewerState>>,
    container: &HtmlElement,
    show_hint: RwSignal<bool>,
) -> Result<()> {
    set_cursor(container, Cursor::Grab);

    let el = container.clone();
    let st = state.clone();
    add_listener(container, "pointerdown", move |e: PointerEvent| {
        if e.button() != 0 {
            return;
        }

        if show_hint.get_untracked() {
            show_hint.set(false);
        }

        if let Ok(mut s) = st.try_borrow_mut() {
            s.pointer_down(e.pointer_id(), pointer_pos(&e));
            if s.drives(e.pointer_id()) {
                let _ = el.set_pointer_capture(e.pointer_id());
            }
            set_cursor(&el, s.cursor());
        }

        // prevent default so the page doesn't select text or scroll
        e.prevent_default();
    })?;

    let st = state.clone();
    add_listener(container, "pointermove", move |e: PointerEvent| {
        if let Ok(mut s) = st.try_borrow_mut() {
            if !s.drives(e.pointer_id()) {
                return;
            }
            s.pointer_move(e.pointer_id(), pointer_pos(&e));
        }
        e.prevent_default();
    })?;

    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let el = container.clone();
    let st = state.clone();
    add_listener(&window, "pointerup", move |e: PointerEvent| {
        let _ = el.release_pointer_capture(e.pointer_id());

        if let Ok(mut s) = st.try_borrow_mut() {
            s.pointer_up(e.pointer_id());
            set_cursor(&el, s.cursor());
        }
    })?;

    for ty in ["pointercancel", "lostpointercapture"] {
        let el = container.clone();
        let st = state.clone();
        add_listener(container, ty, move |e: PointerEvent| {
            if let Ok(mut s) = st.try_borrow_mut() {
                s.pointer_cancel(e.pointer_id());
                set_cursor(&el, s.cursor());
            }
        })?;
    }

    Ok(())
}
