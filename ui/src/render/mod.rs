pub mod renderer;

#[cfg(feature = "web")]
pub mod frame_loop;
#[cfg(feature = "web")]
pub mod web_gpu;
