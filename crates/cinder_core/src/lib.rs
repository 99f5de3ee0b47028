//! Asset handling for the cinder path tracer.
//!
//! This crate owns everything that touches the filesystem:
//!
//! - **Image decode**: rasters decoded into linear float RGB buffers
//!   suitable for texture sampling.
//! - **Wavefront import**: OBJ/MTL files parsed into meshes of triangles
//!   with material descriptions.
//! - **PPM output**: the framebuffer writer.

pub mod image;
pub mod obj;
pub mod ppm;

pub use crate::image::{load_image, Image, ImageError};
pub use obj::{import_obj, ObjError, ObjMaterial, ObjMesh, ObjModel, ObjTriangle, ObjVertex};
pub use ppm::{linear_to_gamma, PpmWriter};
