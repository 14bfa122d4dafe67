//! # Reinhardt Components
//!
//! A component registry with interface bindings and constructor injection.
//!
//! Types are declared to the registry, optionally bound to the interfaces they
//! implement, and constructed on first lookup. Constructor parameters are
//! resolved recursively through the same registry, so each type is built once
//! and shared by every component that depends on it.
//!
//! ## Feature Flags
//!
//! - `injector` (default) - The registry and constructor-injection engine
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_components::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Logger;
//!
//! struct Service {
//!     logger: Arc<Logger>,
//! }
//!
//! let catalog = TypeCatalog::new();
//! catalog
//!     .register_all([
//!         TypeDescriptor::of::<Logger>("Logger").default_constructor(),
//!         TypeDescriptor::of::<Service>("Service")
//!             .param("logger", "Logger")
//!             .constructor(|args| Ok(Service { logger: args.get::<Logger>(0)? })),
//!     ])
//!     .unwrap();
//!
//! let injector = Injector::new(catalog);
//! injector.add_type("Service").unwrap();
//!
//! let service = injector.get::<Service>().unwrap();
//! assert!(Arc::ptr_eq(&service.logger, &injector.get::<Logger>().unwrap()));
//! ```

#[cfg(feature = "injector")]
pub mod injector;

#[cfg(feature = "injector")]
pub use reinhardt_injector::{
	DiError, DiResult, Injector, InjectorBuilder, InjectorConfig, Instance, TypeIntrospector,
	TypeKey,
};

/// Re-export commonly used types.
pub mod prelude {
	#[cfg(feature = "injector")]
	pub use reinhardt_injector::prelude::*;
}

#[cfg(all(test, feature = "injector"))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[derive(Default)]
	struct Clock;

	#[rstest]
	fn test_facade_reexports_engine() {
		// Arrange
		let catalog = TypeCatalog::new();
		catalog
			.register(TypeDescriptor::of::<Clock>("Clock").default_constructor())
			.unwrap();
		let injector = Injector::new(catalog);

		// Act
		let clock = crate::injector::Injector::get_component(&injector, "Clock");

		// Assert
		assert!(clock.unwrap().is::<Clock>());
		assert_eq!(
			injector.entry_state(&TypeKey::new("Clock")),
			Some(EntryState::Single)
		);
	}
}
