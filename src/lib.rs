//! Context-sensitive dependency resolution for a component runtime.
//!
//! The same conceptual operation — "resolve this token" — behaves
//! differently depending on where it executes: during view construction it
//! walks the node-injector tree from the current frame; outside any view it
//! resolves against the flat injector context, falling back to a root
//! limp-mode hook when the context is intentionally injector-less.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use weft::{InjectFlags, InjectorContext, ScopedInjector, Token, inject};
//! use weft_util::StaticInjector;
//!
//! #[derive(Clone, Debug, PartialEq, Eq)]
//! struct Greeting(&'static str);
//!
//! let injector = StaticInjector::builder()
//!     .with_type(Greeting("hello"))
//!     .build();
//! let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));
//!
//! let got = inject(&Token::of::<Greeting>(), InjectFlags::DEFAULT)?.unwrap();
//! assert_eq!(got.extract::<Greeting>(), Some(Greeting("hello")));
//! # Ok::<(), weft::Error>(())
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
pub(crate) mod macros;

pub mod compare;
pub mod definition;
pub mod inject;
pub mod instruction;
pub mod switch;
pub mod view;

pub use weft_core::context::{
    InjectorContext, ScopedInjector, current_injector, set_current_injector,
};
pub use weft_core::erased::Erased;
pub use weft_core::error::{Error, NotFound, Result, catch_injector_error, format_error};
pub use weft_core::flags::InjectFlags;
pub use weft_core::injector::{Injector, NodeId, NotFoundValue, ViewResolver};
pub use weft_core::token::{Token, TokenKey, resolve_forward_ref};
pub use weft_core::value::Value;

pub use compare::structurally_equal;
pub use definition::{BehaviorDef, ComponentDef, Definition, copy_inherited_fields};
pub use inject::{ParamAnnotation, ParamDep, inject, inject_args, inject_injector_only, inject_typed};
pub use instruction::{invalid_factory, invalid_factory_dep, view_inject};
pub use view::{ViewFrame, ViewGuard, current_view, enter_view};
