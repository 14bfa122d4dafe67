//! Type identifiers used as registry and binding-table keys.

use std::fmt;
use std::sync::Arc;

/// Opaque, comparable token naming a concrete type or an interface.
///
/// Keys are cheap to clone (a shared string) and are used as map keys by the
/// binding table, the component registry and the resolution stack.
///
/// # Examples
///
/// ```
/// use reinhardt_injector::TypeKey;
///
/// let shape = TypeKey::new("Shape");
/// assert_eq!(shape.as_str(), "Shape");
/// assert_eq!(shape, TypeKey::from("Shape"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
	/// Creates a key from any string-like name.
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	/// Derives a key from the Rust type name of `T`.
	///
	/// ```
	/// use reinhardt_injector::TypeKey;
	///
	/// struct Logger;
	/// assert!(TypeKey::of::<Logger>().as_str().ends_with("Logger"));
	/// ```
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::new(std::any::type_name::<T>())
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeKey({})", self.0)
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TypeKey {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for TypeKey {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}

impl From<&TypeKey> for TypeKey {
	fn from(key: &TypeKey) -> Self {
		key.clone()
	}
}

impl AsRef<str> for TypeKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Joins keys into an arrow-separated path (`A -> B -> A`).
pub(crate) fn format_path<'a>(keys: impl IntoIterator<Item = &'a TypeKey>) -> String {
	keys.into_iter()
		.map(TypeKey::as_str)
		.collect::<Vec<_>>()
		.join(" -> ")
}
