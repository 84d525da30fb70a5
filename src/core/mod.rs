//! Core coordinate types and camera glue

pub mod coordinates;
pub mod orbit_camera;
pub mod space;
