//! Table-driven type introspection.
//!
//! Rust has no runtime reflection over constructors, so the metadata the
//! injector needs is declared up front as [`TypeDescriptor`]s and collected in
//! a [`TypeCatalog`]. The catalog then answers the [`TypeIntrospector`] queries.
//!
//! # Example
//!
//! ```
//! use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Logger;
//! struct Service {
//!     logger: Arc<Logger>,
//! }
//!
//! let catalog = TypeCatalog::new();
//! catalog
//!     .register(TypeDescriptor::of::<Logger>("Logger").constructor(|_| Ok(Logger)))
//!     .unwrap();
//! catalog
//!     .register(
//!         TypeDescriptor::of::<Service>("Service")
//!             .param("logger", "Logger")
//!             .constructor(|args| {
//!                 Ok(Service {
//!                     logger: args.get::<Logger>(0)?,
//!                 })
//!             }),
//!     )
//!     .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! ```

use crate::error::{DiError, DiResult};
use crate::introspect::{Instance, Parameter, TypeIntrospector};
use crate::key::TypeKey;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased constructor stored in a descriptor.
pub type Constructor = Arc<dyn Fn(&Arguments) -> DiResult<Instance> + Send + Sync>;

/// Resolved constructor arguments, in parameter order.
#[derive(Clone)]
pub struct Arguments {
	values: Vec<Instance>,
}

impl Arguments {
	/// Wraps resolved instances.
	pub fn new(values: Vec<Instance>) -> Self {
		Self { values }
	}

	/// Returns argument `index` downcast to `T`.
	pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
		self.values
			.get(index)
			.and_then(|value| value.clone().downcast::<T>().ok())
			.ok_or(DiError::ArgumentMismatch {
				index,
				expected: std::any::type_name::<T>(),
			})
	}

	/// Returns argument `index` without downcasting.
	pub fn raw(&self, index: usize) -> Option<&Instance> {
		self.values.get(index)
	}

	/// Number of arguments.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether there are no arguments.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl std::fmt::Debug for Arguments {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Arguments")
			.field("len", &self.values.len())
			.finish()
	}
}

/// Metadata describing one concrete type or interface.
#[derive(Clone)]
pub struct TypeDescriptor {
	key: TypeKey,
	type_id: Option<TypeId>,
	indexed: bool,
	parameters: Vec<Parameter>,
	interfaces: Vec<TypeKey>,
	constructor: Option<Constructor>,
}

impl TypeDescriptor {
	/// Starts a descriptor for the Rust type `T` under `key`.
	pub fn of<T: Any + Send + Sync>(key: impl Into<TypeKey>) -> TypeDescriptorBuilder<T> {
		TypeDescriptorBuilder::new(key.into())
	}

	/// Descriptor for an interface. Interfaces are never constructible.
	pub fn interface(key: impl Into<TypeKey>) -> Self {
		Self {
			key: key.into(),
			type_id: None,
			indexed: false,
			parameters: Vec::new(),
			interfaces: Vec::new(),
			constructor: None,
		}
	}

	/// Type identifier.
	pub fn key(&self) -> &TypeKey {
		&self.key
	}

	/// Rust type backing the descriptor, if any.
	pub fn type_id(&self) -> Option<TypeId> {
		self.type_id
	}

	/// Constructor parameters.
	pub fn parameters(&self) -> &[Parameter] {
		&self.parameters
	}

	/// Whether instances of the Rust type map back to this key.
	pub fn is_indexed(&self) -> bool {
		self.indexed
	}

	/// Declared interfaces.
	pub fn interfaces(&self) -> &[TypeKey] {
		&self.interfaces
	}

	/// Whether a constructor is attached.
	pub fn is_constructible(&self) -> bool {
		self.constructor.is_some()
	}
}

impl std::fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeDescriptor")
			.field("key", &self.key)
			.field("parameters", &self.parameters)
			.field("interfaces", &self.interfaces)
			.field("constructible", &self.is_constructible())
			.finish()
	}
}

/// Builder for descriptors of a concrete Rust type.
pub struct TypeDescriptorBuilder<T> {
	key: TypeKey,
	indexed: bool,
	parameters: Vec<Parameter>,
	interfaces: Vec<TypeKey>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeDescriptorBuilder<T> {
	fn new(key: TypeKey) -> Self {
		Self {
			key,
			indexed: true,
			parameters: Vec::new(),
			interfaces: Vec::new(),
			_marker: PhantomData,
		}
	}

	/// Appends a typed constructor parameter.
	pub fn param(mut self, name: impl Into<String>, declared_type: impl Into<TypeKey>) -> Self {
		self.parameters
			.push(Parameter::typed(declared_type).named(name));
		self
	}

	/// Appends a constructor parameter without a declared type.
	pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
		self.parameters.push(Parameter::untyped().named(name));
		self
	}

	/// Keeps the Rust type out of the instance index.
	///
	/// Use it when one Rust type backs several keys. Instances of an unindexed
	/// type cannot be added directly and the typed lookups do not see it.
	pub fn unindexed(mut self) -> Self {
		self.indexed = false;
		self
	}

	/// Declares an implemented interface.
	pub fn implements(mut self, interface: impl Into<TypeKey>) -> Self {
		self.interfaces.push(interface.into());
		self
	}

	/// Attaches the constructor and finishes the descriptor.
	pub fn constructor<F>(self, constructor: F) -> TypeDescriptor
	where
		F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
	{
		let erased: Constructor =
			Arc::new(move |args: &Arguments| constructor(args).map(|value| Arc::new(value) as Instance));
		TypeDescriptor {
			key: self.key,
			type_id: Some(TypeId::of::<T>()),
			indexed: self.indexed,
			parameters: self.parameters,
			interfaces: self.interfaces,
			constructor: Some(erased),
		}
	}

	/// Finishes the descriptor without a constructor (abstract type).
	///
	/// Instances of an abstract type can still be added directly.
	pub fn abstract_type(self) -> TypeDescriptor {
		TypeDescriptor {
			key: self.key,
			type_id: Some(TypeId::of::<T>()),
			indexed: self.indexed,
			parameters: self.parameters,
			interfaces: self.interfaces,
			constructor: None,
		}
	}
}

impl<T: Any + Send + Sync + Default> TypeDescriptorBuilder<T> {
	/// Uses `Default::default()` as a no-argument constructor.
	pub fn default_constructor(self) -> TypeDescriptor {
		self.constructor(|_| Ok(T::default()))
	}
}

#[derive(Default)]
struct CatalogInner {
	descriptors: HashMap<TypeKey, TypeDescriptor>,
	by_type_id: HashMap<TypeId, TypeKey>,
}

/// Thread-safe table of type descriptors.
#[derive(Clone, Default)]
pub struct TypeCatalog {
	inner: Arc<RwLock<CatalogInner>>,
}

impl TypeCatalog {
	/// Creates an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a descriptor.
	///
	/// Fails with [`DiError::DuplicateDescriptor`] when the key is taken and
	/// with [`DiError::DuplicateRustType`] when an indexed Rust type already
	/// belongs to another key.
	pub fn register(&self, descriptor: TypeDescriptor) -> DiResult<()> {
		let mut inner = self.inner.write();
		if inner.descriptors.contains_key(&descriptor.key) {
			return Err(DiError::DuplicateDescriptor(descriptor.key));
		}
		let indexed_type = descriptor.type_id.filter(|_| descriptor.indexed);
		if let Some(type_id) = indexed_type {
			if let Some(existing) = inner.by_type_id.get(&type_id) {
				return Err(DiError::DuplicateRustType {
					key: descriptor.key,
					existing: existing.clone(),
				});
			}
			inner.by_type_id.insert(type_id, descriptor.key.clone());
		}
		tracing::trace!(key = %descriptor.key, "type descriptor registered");
		inner.descriptors.insert(descriptor.key.clone(), descriptor);
		Ok(())
	}

	/// Adds several descriptors, stopping at the first failure.
	pub fn register_all(
		&self,
		descriptors: impl IntoIterator<Item = TypeDescriptor>,
	) -> DiResult<()> {
		descriptors
			.into_iter()
			.try_for_each(|descriptor| self.register(descriptor))
	}

	/// Returns a copy of the descriptor registered under `key`.
	pub fn descriptor(&self, key: &TypeKey) -> Option<TypeDescriptor> {
		self.inner.read().descriptors.get(key).cloned()
	}

	/// Whether `key` has a descriptor.
	pub fn contains(&self, key: &TypeKey) -> bool {
		self.inner.read().descriptors.contains_key(key)
	}

	/// Key registered for the Rust type `T`.
	pub fn key_of<T: Any>(&self) -> Option<TypeKey> {
		self.inner.read().by_type_id.get(&TypeId::of::<T>()).cloned()
	}

	/// Number of descriptors.
	pub fn len(&self) -> usize {
		self.inner.read().descriptors.len()
	}

	/// Whether the catalog is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.read().descriptors.is_empty()
	}
}

impl std::fmt::Debug for TypeCatalog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.read();
		let mut keys: Vec<_> = inner.descriptors.keys().collect();
		keys.sort();
		f.debug_struct("TypeCatalog").field("types", &keys).finish()
	}
}

impl TypeIntrospector for TypeCatalog {
	fn is_constructible(&self, key: &TypeKey) -> bool {
		self.inner
			.read()
			.descriptors
			.get(key)
			.is_some_and(TypeDescriptor::is_constructible)
	}

	fn constructor_parameters(&self, key: &TypeKey) -> Vec<Parameter> {
		self.inner
			.read()
			.descriptors
			.get(key)
			.map(|d| d.parameters.clone())
			.unwrap_or_default()
	}

	fn declared_interfaces(&self, key: &TypeKey) -> Vec<TypeKey> {
		self.inner
			.read()
			.descriptors
			.get(key)
			.map(|d| d.interfaces.clone())
			.unwrap_or_default()
	}

	fn type_key_of(&self, instance: &Instance) -> Option<TypeKey> {
		let any: &dyn Any = &**instance;
		let type_id = any.type_id();
		self.inner.read().by_type_id.get(&type_id).cloned()
	}

	fn invoke_constructor(&self, key: &TypeKey, args: Vec<Instance>) -> DiResult<Instance> {
		// Clone the constructor out so user code never runs under the catalog lock.
		let constructor = self
			.inner
			.read()
			.descriptors
			.get(key)
			.and_then(|d| d.constructor.clone())
			.ok_or_else(|| DiError::NotInstantiable(key.clone()))?;
		constructor(&Arguments::new(args))
	}

	fn key_for_type_id(&self, type_id: TypeId) -> Option<TypeKey> {
		self.inner.read().by_type_id.get(&type_id).cloned()
	}
}
