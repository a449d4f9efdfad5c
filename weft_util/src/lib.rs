//! Reference collaborators for the `weft` resolution runtime.
//!
//! These are deliberately small implementations of the runtime's
//! collaborator contracts — a map-backed flat injector and a node-injector
//! tree — used by the runtime's own tests and suitable for small embedders.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

pub mod registry;
pub mod tree;

pub use registry::{StaticInjector, StaticInjectorBuilder};
pub use tree::NodeTree;
