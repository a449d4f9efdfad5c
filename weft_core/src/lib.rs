//! Core types and traits for the `weft` resolution runtime.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

pub mod context;
pub mod erased;
pub mod error;
pub mod flags;
pub mod injector;
pub mod token;
pub mod value;

pub use context::{InjectorContext, ScopedInjector};
pub use erased::Erased;
pub use error::{Error, NotFound, Result};
pub use flags::InjectFlags;
pub use injector::{Injector, NodeId, NotFoundValue, ViewResolver};
pub use token::{Token, TokenKey, resolve_forward_ref};
pub use value::Value;
