pub mod debug;
pub mod opts;
pub mod raycaster;
