//! Injector - Component Registry and Constructor Injection for Reinhardt
//!
//! The injector keeps one registry of components keyed by type identifier,
//! a table binding interfaces to the types that implement them, and a builder
//! that constructs pending types on first lookup by resolving their constructor
//! parameters recursively.
//!
//! # Features
//!
//! - **Lazy Construction**: Types are declared up front and built on first lookup
//! - **Interface Bindings**: One interface can resolve to several implementations
//! - **Multi-Instance Slots**: Registering a second instance of a type keeps both
//! - **Cycle Detection**: Binding loops and constructor loops fail with a readable path
//! - **Pluggable Metadata**: Constructor signatures come from a [`TypeIntrospector`]
//!
//! # Quick Start
//!
//! ```rust
//! use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
//! use reinhardt_injector::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Circle;
//! #[derive(Default)]
//! struct Square;
//!
//! let catalog = TypeCatalog::new();
//! catalog
//!     .register_all([
//!         TypeDescriptor::interface("Shape"),
//!         TypeDescriptor::of::<Circle>("Circle").implements("Shape").default_constructor(),
//!         TypeDescriptor::of::<Square>("Square").implements("Shape").default_constructor(),
//!     ])
//!     .unwrap();
//!
//! let injector = Injector::new(catalog);
//! injector.add_binding("Shape", "Circle").unwrap();
//! injector.add_binding("Shape", "Square").unwrap();
//!
//! let shapes = injector.get_components("Shape").unwrap();
//! assert_eq!(shapes.len(), 2);
//! assert!(shapes[0].is::<Circle>());
//! assert!(shapes[1].is::<Square>());
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [injector]
//! auto_add = true
//! auto_bind_interfaces = false
//! strict_many = false
//! max_depth = 100
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │            Injector              │
//! │    - Registration dispatch       │
//! │    - get_component/components    │
//! │    - Constructor injection       │
//! └────────────────┬─────────────────┘
//!                  │
//!     ┌────────────┼────────────┐
//!     │            │            │
//! ┌───▼───┐   ┌────▼───┐   ┌────▼───────┐
//! │Binding│   │Registry│   │    Type    │
//! │ Table │   │        │   │Introspector│
//! └───────┘   └────────┘   └────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod binding;
mod builder;
pub mod catalog;
pub mod config;
mod cycle_detection;
pub mod error;
mod injector;
pub mod introspect;
pub mod key;
pub mod registry;
pub mod visualization;

pub use binding::{BindingTable, BindingTarget, Reference};
pub use config::{InjectorConfig, InjectorConfigBuilder};
pub use cycle_detection::MAX_RESOLUTION_DEPTH;
pub use error::{DiError, DiResult};
pub use injector::{Injector, InjectorBuilder};
pub use introspect::{Instance, Parameter, TypeIntrospector};
pub use key::TypeKey;
pub use registry::{ComponentRegistry, EntryState, RegistrationInput, RegistryEntry};

/// Re-export commonly used types.
pub mod prelude {
	pub use crate::binding::{BindingTarget, Reference};
	pub use crate::catalog::{Arguments, TypeCatalog, TypeDescriptor};
	pub use crate::config::InjectorConfig;
	pub use crate::error::{DiError, DiResult};
	pub use crate::injector::{Injector, InjectorBuilder};
	pub use crate::introspect::{Instance, Parameter, TypeIntrospector};
	pub use crate::key::TypeKey;
	pub use crate::registry::{EntryState, RegistrationInput};
}
