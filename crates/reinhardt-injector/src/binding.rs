//! Interface bindings and reference resolution.
//!
//! A binding maps an interface key to an ordered, non-unique list of type
//! keys. Bound keys may themselves be bound further, which is how decorator
//! style override chains are expressed:
//!
//! ```text
//! Shape ──► Circle
//!       └─► Decorated ──► Square
//! ```
//!
//! Resolution follows these chains depth-first and keeps the bind order.

use crate::error::{DiError, DiResult};
use crate::introspect::{Instance, TypeIntrospector};
use crate::key::{TypeKey, format_path};
use std::collections::HashMap;

/// Input accepted by [`BindingTable::resolve`].
#[derive(Clone)]
pub enum Reference {
	/// A type identifier.
	Type(TypeKey),
	/// A live instance, replaced by its runtime type identifier.
	Instance(Instance),
	/// An ordered list, resolved element by element and flattened.
	List(Vec<Reference>),
}

impl Reference {
	/// Shorthand for [`Reference::Type`].
	pub fn ty(key: impl Into<TypeKey>) -> Self {
		Self::Type(key.into())
	}
}

impl From<TypeKey> for Reference {
	fn from(key: TypeKey) -> Self {
		Self::Type(key)
	}
}

impl From<&str> for Reference {
	fn from(key: &str) -> Self {
		Self::Type(TypeKey::new(key))
	}
}

impl From<Instance> for Reference {
	fn from(instance: Instance) -> Self {
		Self::Instance(instance)
	}
}

impl<R: Into<Reference>> From<Vec<R>> for Reference {
	fn from(items: Vec<R>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

impl std::fmt::Debug for Reference {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Type(key) => f.debug_tuple("Type").field(key).finish(),
			Self::Instance(_) => f.write_str("Instance(..)"),
			Self::List(items) => f.debug_tuple("List").field(items).finish(),
		}
	}
}

/// Value accepted by [`BindingTable::bind_interface`].
#[derive(Clone)]
pub enum BindingTarget {
	/// Bind to a type identifier.
	Type(TypeKey),
	/// Bind to the runtime type of an instance.
	Instance(Instance),
}

impl From<TypeKey> for BindingTarget {
	fn from(key: TypeKey) -> Self {
		Self::Type(key)
	}
}

impl From<&str> for BindingTarget {
	fn from(key: &str) -> Self {
		Self::Type(TypeKey::new(key))
	}
}

impl From<Instance> for BindingTarget {
	fn from(instance: Instance) -> Self {
		Self::Instance(instance)
	}
}

impl std::fmt::Debug for BindingTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Type(key) => f.debug_tuple("Type").field(key).finish(),
			Self::Instance(_) => f.write_str("Instance(..)"),
		}
	}
}

/// Interface-to-implementation table.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
	bindings: HashMap<TypeKey, Vec<TypeKey>>,
}

impl BindingTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `target`'s type identifier to `interface`'s binding list and
	/// returns the bound key.
	pub fn bind_interface(
		&mut self,
		interface: TypeKey,
		target: &BindingTarget,
		introspector: &dyn TypeIntrospector,
	) -> DiResult<TypeKey> {
		let key = match target {
			BindingTarget::Type(key) => key.clone(),
			BindingTarget::Instance(instance) => introspector.type_key_of(instance).ok_or_else(
				|| DiError::InvalidBindingTarget {
					interface: interface.clone(),
					reason: "instance type has no type identifier".to_string(),
				},
			)?,
		};
		self.bind(interface, key.clone());
		Ok(key)
	}

	/// Appends `key` to `interface`'s binding list.
	pub fn bind(&mut self, interface: TypeKey, key: TypeKey) {
		tracing::debug!(%interface, %key, "interface bound");
		self.bindings.entry(interface).or_default().push(key);
	}

	/// Appends `key` unless the exact pair is already bound.
	///
	/// Returns whether a binding was added.
	pub fn bind_once(&mut self, interface: TypeKey, key: TypeKey) -> bool {
		if self.is_bound(&interface, &key) {
			return false;
		}
		self.bind(interface, key);
		true
	}

	/// Whether `interface` is bound directly to `key`.
	pub fn is_bound(&self, interface: &TypeKey, key: &TypeKey) -> bool {
		self.bindings
			.get(interface)
			.is_some_and(|keys| keys.contains(key))
	}

	/// Direct bindings of `interface`, in bind order.
	pub fn get(&self, interface: &TypeKey) -> &[TypeKey] {
		self.bindings
			.get(interface)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Iterates over every `(interface, bound keys)` pair.
	pub fn iter(&self) -> impl Iterator<Item = (&TypeKey, &[TypeKey])> {
		self.bindings
			.iter()
			.map(|(interface, keys)| (interface, keys.as_slice()))
	}

	/// Number of bound interfaces.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Whether no interface is bound.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// Resolves a reference to the final concrete type identifiers.
	///
	/// Lists are flattened in order without deduplication, instances are
	/// replaced by their runtime type identifier and bound keys are followed
	/// until an unbound key is reached.
	pub fn resolve(
		&self,
		reference: &Reference,
		introspector: &dyn TypeIntrospector,
	) -> DiResult<Vec<TypeKey>> {
		let mut resolved = Vec::new();
		self.resolve_into(reference, introspector, &mut resolved)?;
		Ok(resolved)
	}

	/// Resolves a single type identifier.
	pub fn resolve_key(&self, key: &TypeKey) -> DiResult<Vec<TypeKey>> {
		let mut resolved = Vec::new();
		let mut path = Vec::new();
		self.follow(key, &mut path, &mut resolved)?;
		Ok(resolved)
	}

	fn resolve_into(
		&self,
		reference: &Reference,
		introspector: &dyn TypeIntrospector,
		out: &mut Vec<TypeKey>,
	) -> DiResult<()> {
		match reference {
			Reference::List(items) => {
				for item in items {
					self.resolve_into(item, introspector, out)?;
				}
				Ok(())
			}
			Reference::Instance(instance) => {
				let key = introspector.type_key_of(instance).ok_or_else(|| {
					DiError::UnresolvableReference(
						"instance type has no type identifier".to_string(),
					)
				})?;
				self.follow(&key, &mut Vec::new(), out)
			}
			Reference::Type(key) => self.follow(key, &mut Vec::new(), out),
		}
	}

	fn follow(&self, key: &TypeKey, path: &mut Vec<TypeKey>, out: &mut Vec<TypeKey>) -> DiResult<()> {
		if path.contains(key) {
			path.push(key.clone());
			return Err(DiError::CyclicBinding {
				key: key.clone(),
				path: format_path(path.iter()),
			});
		}

		match self.bindings.get(key) {
			Some(bound) if !bound.is_empty() => {
				tracing::trace!(%key, targets = bound.len(), "following binding");
				path.push(key.clone());
				for target in bound {
					self.follow(target, path, out)?;
				}
				path.pop();
				Ok(())
			}
			_ => {
				out.push(key.clone());
				Ok(())
			}
		}
	}
}
