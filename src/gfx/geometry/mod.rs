//! # Procedural Geometry Generation
//!
//! Functions that generate common scene props as [`ModelData`] records,
//! so demos run without external model files. The wireframe helpers
//! (floor grid, axis cross) are the usual scene furniture; the solid
//! shapes (cone, sphere) are test models for lighting and blending.

pub mod primitives;

pub use primitives::*;
