//! Type introspection capability consumed by the injector.
//!
//! The injector never inspects Rust types itself. Everything it needs to know
//! about a type (constructibility, constructor parameters, declared interfaces)
//! comes through [`TypeIntrospector`], which keeps the resolution engine
//! independent from how that information is produced. [`TypeCatalog`] is the
//! table-driven implementation shipped with this crate.
//!
//! [`TypeCatalog`]: crate::catalog::TypeCatalog

use crate::error::DiResult;
use crate::key::TypeKey;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A live component instance.
///
/// Instances are shared: the registry keeps one handle and every caller of
/// `get_component` receives a clone of the same `Arc`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Constructor parameter description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
	/// Parameter name, used in error messages only.
	pub name: Option<String>,
	/// Declared concrete or interface type. `None` means the parameter cannot
	/// be injected.
	pub declared_type: Option<TypeKey>,
}

impl Parameter {
	/// Parameter with a declared type.
	pub fn typed(declared_type: impl Into<TypeKey>) -> Self {
		Self {
			name: None,
			declared_type: Some(declared_type.into()),
		}
	}

	/// Parameter without a declared type.
	pub fn untyped() -> Self {
		Self {
			name: None,
			declared_type: None,
		}
	}

	/// Attaches a name to the parameter.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub(crate) fn display_name(&self) -> String {
		self.name.clone().unwrap_or_else(|| "_".to_string())
	}
}

/// Capability reporting type metadata to the injector.
pub trait TypeIntrospector: Send + Sync {
	/// Whether `key` names a type that can be constructed directly.
	fn is_constructible(&self, key: &TypeKey) -> bool;

	/// Ordered constructor parameters of `key`.
	fn constructor_parameters(&self, key: &TypeKey) -> Vec<Parameter>;

	/// Interfaces `key` declares it implements.
	fn declared_interfaces(&self, key: &TypeKey) -> Vec<TypeKey>;

	/// Runtime type identifier of a live instance, or `None` when the
	/// instance's type is unknown.
	fn type_key_of(&self, instance: &Instance) -> Option<TypeKey>;

	/// Invokes the constructor of `key` with resolved arguments.
	fn invoke_constructor(&self, key: &TypeKey, args: Vec<Instance>) -> DiResult<Instance>;

	/// Maps a Rust `TypeId` to its type identifier, for the typed helpers.
	fn key_for_type_id(&self, _type_id: TypeId) -> Option<TypeKey> {
		None
	}
}

impl<T: TypeIntrospector + ?Sized> TypeIntrospector for Arc<T> {
	fn is_constructible(&self, key: &TypeKey) -> bool {
		(**self).is_constructible(key)
	}

	fn constructor_parameters(&self, key: &TypeKey) -> Vec<Parameter> {
		(**self).constructor_parameters(key)
	}

	fn declared_interfaces(&self, key: &TypeKey) -> Vec<TypeKey> {
		(**self).declared_interfaces(key)
	}

	fn type_key_of(&self, instance: &Instance) -> Option<TypeKey> {
		(**self).type_key_of(instance)
	}

	fn invoke_constructor(&self, key: &TypeKey, args: Vec<Instance>) -> DiResult<Instance> {
		(**self).invoke_constructor(key, args)
	}

	fn key_for_type_id(&self, type_id: TypeId) -> Option<TypeKey> {
		(**self).key_for_type_id(type_id)
	}
}
