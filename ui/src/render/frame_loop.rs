//! Per-frame scheduling.
//!
//! Anything implementing [`Frame`] can be driven at the display's refresh rate
//! by [`FrameLoop::start`]. The next frame is requested only after the current
//! one returns, so a frame never runs re-entrantly, and the loop ends as soon
//! as a frame returns [`LoopControl::Stop`].

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub trait Frame {
    /// `now_ms` is the host's high-resolution timestamp for this frame.
    fn frame(&mut self, now_ms: f64) -> LoopControl;
}

type RafClosure = Closure<dyn FnMut(f64)>;

pub struct FrameLoop;

impl FrameLoop {
    /// Drive `target` with `requestAnimationFrame` until it asks to stop.
    pub fn start<T: Frame + 'static>(target: Rc<RefCell<T>>) -> Result<()> {
        // we store the RAF callback so it can re-schedule itself each frame
        let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            let control = match target.try_borrow_mut() {
                Ok(mut t) => t.frame(now_ms),
                // an event handler still holds it; try again next frame
                Err(_) => LoopControl::Continue,
            };

            if control == LoopControl::Stop {
                log::debug!("frame loop stopped");
                // break the self-reference once this call has returned
                let f = f.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    f.borrow_mut().take();
                });
                return;
            }

            if let Err(e) = request_frame(&f) {
                log::error!("{e:#}");
            }
        }) as Box<dyn FnMut(f64)>));

        request_frame(&g)
    }
}

fn request_frame(f: &Rc<RefCell<Option<RafClosure>>>) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let guard = f.borrow();
    let cb = guard.as_ref().ok_or_else(|| anyhow!("frame callback already released"))?;
    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("requestAnimationFrame failed: {e:?}"))?;
    Ok(())
}
