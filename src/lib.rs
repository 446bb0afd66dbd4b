//! Doku fractal ray marcher
//!
//! Renders the zero set of a power-8 spherical escape-time potential by marching
//! one ray per pixel from an orbiting camera. Every pixel is an independent pure
//! computation, evaluated in parallel on a rayon pool into a fixed-size square
//! target that is then letterboxed into the output surface.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod composite;
pub mod config;
pub mod error;
pub mod field;
pub mod fps;
pub mod interval;
pub mod output;
pub mod ray;
pub mod renderer;
pub mod shading;
pub mod solver;

pub use camera::{CameraFrame, OrbitCamera};
pub use config::RenderConfig;
pub use error::SetupError;
pub use field::{Mandelbulb, ScalarField};
pub use renderer::{Phase, Renderer};
pub use solver::{Hit, SolverLimits};
