//! Injector error types.
//!
//! Every variant is a configuration or programming error surfaced to the
//! caller of the top-level operation. None of them is transient.

use crate::key::TypeKey;
use thiserror::Error;

/// Result type for injector operations.
pub type DiResult<T> = Result<T, DiError>;

/// Component registry and resolution errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiError {
	/// A bare type was registered twice.
	#[error("component already registered: {0}")]
	DuplicateRegistration(TypeKey),

	/// The reference is not a type identifier, an instance or a list of them.
	#[error("unresolvable reference: {0}")]
	UnresolvableReference(String),

	/// A binding chain revisits a type identifier.
	#[error("cyclic binding detected for '{key}'\n  Path: {path}")]
	CyclicBinding {
		/// Interface where the cycle was found.
		key: TypeKey,
		/// Binding path (format: A -> B -> A).
		path: String,
	},

	/// A singular lookup matched more than one component.
	#[error("ambiguous resolution for '{key}': {reason}")]
	AmbiguousResolution {
		/// Requested type identifier.
		key: TypeKey,
		/// What made the lookup ambiguous.
		reason: String,
	},

	/// A singular lookup found no registration and auto-add is disabled.
	#[error("component not registered: {0}")]
	UnregisteredComponent(TypeKey),

	/// The type cannot be constructed directly.
	#[error("type '{0}' is not instantiable (abstract or interface-only)")]
	NotInstantiable(TypeKey),

	/// A constructor parameter carries no injectable type.
	#[error("parameter #{index} ({name}) of '{owner}' has no declared type")]
	UntypedDependency {
		/// Type whose constructor declares the parameter.
		owner: TypeKey,
		/// Zero-based parameter position.
		index: usize,
		/// Parameter name, or `_` when unnamed.
		name: String,
	},

	/// Direct or indirect self-referential construction.
	#[error(
		"circular dependency detected: {key}\n  Path: {path}\nThis forms a cycle that cannot be resolved."
	)]
	CyclicDependency {
		/// Type whose construction re-entered itself.
		key: TypeKey,
		/// Construction path (format: A -> B -> A).
		path: String,
	},

	/// `bind_interface` was given a value with no derivable type identifier.
	#[error("invalid binding target for interface '{interface}': {reason}")]
	InvalidBindingTarget {
		/// Interface being bound.
		interface: TypeKey,
		/// Why the target was rejected.
		reason: String,
	},

	/// Construction went deeper than the configured limit.
	#[error(
		"maximum resolution depth exceeded: {0}\nThis likely indicates an extremely deep dependency chain."
	)]
	MaxDepthExceeded(usize),

	/// A constructor reported a failure.
	#[error("constructor of '{key}' failed: {message}")]
	ConstructorFailed {
		/// Type being constructed.
		key: TypeKey,
		/// Message returned by the constructor.
		message: String,
	},

	/// A constructor argument does not have the requested Rust type.
	#[error("argument #{index} is not a {expected}")]
	ArgumentMismatch {
		/// Zero-based argument position.
		index: usize,
		/// Requested Rust type name.
		expected: &'static str,
	},

	/// A type descriptor was added to a catalog twice.
	#[error("type descriptor already registered: {0}")]
	DuplicateDescriptor(TypeKey),

	/// A second key was registered for a Rust type that already has one.
	#[error("rust type of '{key}' is already registered as '{existing}'")]
	DuplicateRustType {
		/// Key being registered.
		key: TypeKey,
		/// Key that already owns the Rust type.
		existing: TypeKey,
	},

	/// A typed lookup could not map or downcast a Rust type.
	#[error("type mismatch: {0}")]
	TypeMismatch(String),

	/// Configuration could not be parsed.
	#[error("configuration error: {0}")]
	Config(String),
}

impl DiError {
	/// Convenience constructor for failures raised inside constructors.
	pub fn constructor(key: impl Into<TypeKey>, message: impl Into<String>) -> Self {
		Self::ConstructorFailed {
			key: key.into(),
			message: message.into(),
		}
	}
}

impl From<toml::de::Error> for DiError {
	fn from(err: toml::de::Error) -> Self {
		Self::Config(err.to_string())
	}
}
