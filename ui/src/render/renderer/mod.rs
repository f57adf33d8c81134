pub mod bounds;
pub mod camera;
pub mod camera_input;
pub mod orbit;
pub mod uniform;
pub mod vertex;

#[cfg(feature = "web")]
pub mod gpu;
#[cfg(feature = "web")]
pub mod mesh;
