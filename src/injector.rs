//! Component registry module.
//!
//! This module provides the injector that registers components, binds
//! interfaces to implementations and constructs types on first lookup.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_components::injector::catalog::{TypeCatalog, TypeDescriptor};
//! use reinhardt_components::injector::{EntryState, Injector, TypeKey};
//!
//! #[derive(Default)]
//! struct Circle;
//!
//! let catalog = TypeCatalog::new();
//! catalog
//!     .register(TypeDescriptor::of::<Circle>("Circle").default_constructor())
//!     .unwrap();
//!
//! let injector = Injector::new(catalog);
//! injector.bind_interface("Shape", "Circle").unwrap();
//!
//! let shape = injector.get_component("Shape").unwrap();
//! assert!(shape.is::<Circle>());
//! assert_eq!(injector.entry_state(&TypeKey::new("Circle")), Some(EntryState::Single));
//! ```

#[cfg(feature = "injector")]
pub use reinhardt_injector::*;
