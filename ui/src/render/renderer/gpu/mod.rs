pub mod utils;
pub mod gpu_state;
pub mod surface_context;
pub mod resource_context;

pub use gpu_state::GpuState;
