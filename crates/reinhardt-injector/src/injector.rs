//! Public injector facade.
//!
//! [`Injector`] combines the binding table, the component registry and the
//! builder behind one re-entrant lock. The lock is held for the whole of each
//! public call, and re-acquired by the same thread when construction recurses
//! into a dependency lookup.

use crate::binding::{BindingTable, BindingTarget, Reference};
use crate::config::InjectorConfig;
use crate::cycle_detection::ResolutionTracker;
use crate::error::{DiError, DiResult};
use crate::introspect::{Instance, TypeIntrospector};
use crate::key::TypeKey;
use crate::registry::{ComponentRegistry, EntryState, RegistrationInput};
use crate::visualization::DependencyGraph;
use parking_lot::ReentrantMutex;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::sync::Arc;

/// Mutable injector state.
#[derive(Debug, Default)]
pub(crate) struct InjectorState {
	pub(crate) bindings: BindingTable,
	pub(crate) registry: ComponentRegistry,
}

/// Everything guarded by the injector lock.
#[derive(Debug, Default)]
pub(crate) struct Shared {
	pub(crate) state: RefCell<InjectorState>,
	pub(crate) tracker: ResolutionTracker,
}

/// Component registry with constructor injection.
///
/// # Example
///
/// ```
/// use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
/// use reinhardt_injector::Injector;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Logger;
///
/// struct Service {
///     logger: Arc<Logger>,
/// }
///
/// let catalog = TypeCatalog::new();
/// catalog
///     .register(TypeDescriptor::of::<Logger>("Logger").default_constructor())
///     .unwrap();
/// catalog
///     .register(
///         TypeDescriptor::of::<Service>("Service")
///             .param("logger", "Logger")
///             .constructor(|args| Ok(Service { logger: args.get::<Logger>(0)? })),
///     )
///     .unwrap();
///
/// let injector = Injector::new(catalog);
/// let service = injector.get::<Service>().unwrap();
/// let logger = injector.get::<Logger>().unwrap();
/// assert!(Arc::ptr_eq(&service.logger, &logger));
/// ```
pub struct Injector {
	config: InjectorConfig,
	introspector: Arc<dyn TypeIntrospector>,
	shared: ReentrantMutex<Shared>,
}

impl Injector {
	/// Creates an injector with the default configuration.
	pub fn new(introspector: impl TypeIntrospector + 'static) -> Self {
		Self::from_parts(Arc::new(introspector), InjectorConfig::default())
	}

	/// Creates an injector with an explicit configuration.
	///
	/// Fails with [`DiError::Config`] when the configuration is invalid.
	pub fn with_config(
		introspector: impl TypeIntrospector + 'static,
		config: InjectorConfig,
	) -> DiResult<Self> {
		Self::builder(introspector).config(config).build()
	}

	/// Creates an injector builder.
	pub fn builder(introspector: impl TypeIntrospector + 'static) -> InjectorBuilder {
		InjectorBuilder::new(Arc::new(introspector))
	}

	/// Active configuration.
	pub fn config(&self) -> &InjectorConfig {
		&self.config
	}

	/// Introspector used for type metadata.
	pub fn introspector(&self) -> &dyn TypeIntrospector {
		&*self.introspector
	}

	/// Registers types and/or instances.
	///
	/// Registering a bare type twice fails with
	/// [`DiError::DuplicateRegistration`]. Registering a second instance of a
	/// type turns its slot into a multi-instance slot.
	pub fn add_component(&self, input: impl Into<RegistrationInput>) -> DiResult<()> {
		let input = input.into();
		let shared = self.shared.lock();
		self.register(&shared, &input)
	}

	/// Declares a type to be constructed on first lookup.
	pub fn add_type(&self, key: impl Into<TypeKey>) -> DiResult<()> {
		self.add_component(RegistrationInput::Type(key.into()))
	}

	/// Adds an owned instance.
	pub fn add_instance<T: Any + Send + Sync>(&self, value: T) -> DiResult<()> {
		self.add_shared(Arc::new(value))
	}

	/// Adds an instance shared with the caller.
	pub fn add_shared<T: Any + Send + Sync>(&self, value: Arc<T>) -> DiResult<()> {
		self.add_component(RegistrationInput::Instance(value))
	}

	/// Appends `target` to `interface`'s binding list.
	///
	/// The target is not registered; see [`Injector::add_binding`].
	pub fn bind_interface(
		&self,
		interface: impl Into<TypeKey>,
		target: impl Into<BindingTarget>,
	) -> DiResult<TypeKey> {
		let (interface, target) = (interface.into(), target.into());
		let shared = self.shared.lock();
		let key = self.binding_key(&interface, &target)?;
		shared.state.borrow_mut().bindings.bind(interface, key.clone());
		Ok(key)
	}

	/// Binds `interface` to `target` and makes sure the target is registered.
	///
	/// A bare type is declared only if it is not registered yet. An instance
	/// is always added.
	pub fn add_binding(
		&self,
		interface: impl Into<TypeKey>,
		target: impl Into<BindingTarget>,
	) -> DiResult<()> {
		let (interface, target) = (interface.into(), target.into());
		let shared = self.shared.lock();
		let key = self.binding_key(&interface, &target)?;
		shared.state.borrow_mut().bindings.bind(interface, key.clone());

		match target {
			BindingTarget::Type(_) => {
				let registered = shared.state.borrow().registry.contains(&key);
				if registered {
					Ok(())
				} else {
					self.register(&shared, &RegistrationInput::Type(key))
				}
			}
			BindingTarget::Instance(instance) => {
				self.register(&shared, &RegistrationInput::Instance(instance))
			}
		}
	}

	/// Resolves a reference through the binding table.
	pub fn resolve(&self, reference: impl Into<Reference>) -> DiResult<Vec<TypeKey>> {
		let reference = reference.into();
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.bindings.resolve(&reference, &*self.introspector)
	}

	/// Returns the single component for `key`, constructing it if needed.
	///
	/// Uses the configured auto-add default.
	pub fn get_component(&self, key: impl Into<TypeKey>) -> DiResult<Instance> {
		self.get_component_with(key, self.config.auto_add)
	}

	/// Returns the single component for `key` with an explicit auto-add flag.
	pub fn get_component_with(&self, key: impl Into<TypeKey>, auto_add: bool) -> DiResult<Instance> {
		let key = key.into();
		let shared = self.shared.lock();
		self.get_single(&shared, &key, auto_add)
	}

	/// Returns every component `key` resolves to, in resolution order.
	///
	/// Uses the configured auto-add default.
	pub fn get_components(&self, key: impl Into<TypeKey>) -> DiResult<Vec<Instance>> {
		self.get_components_with(key, self.config.auto_add)
	}

	/// Returns every component `key` resolves to, with an explicit auto-add
	/// flag.
	pub fn get_components_with(
		&self,
		key: impl Into<TypeKey>,
		auto_add: bool,
	) -> DiResult<Vec<Instance>> {
		let key = key.into();
		let shared = self.shared.lock();
		self.get_many(&shared, &key, auto_add)
	}

	/// Typed variant of [`Injector::get_component`].
	pub fn get<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
		let key = self.key_for::<T>()?;
		let instance = self.get_component(key.clone())?;
		downcast::<T>(&key, instance)
	}

	/// Typed variant of [`Injector::get_components`].
	pub fn get_all<T: Any + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>> {
		let key = self.key_for::<T>()?;
		self.get_components(key.clone())?
			.into_iter()
			.map(|instance| downcast::<T>(&key, instance))
			.collect()
	}

	/// Whether `key` has a registry entry.
	pub fn contains(&self, key: &TypeKey) -> bool {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.registry.contains(key)
	}

	/// Registry state of `key`.
	pub fn entry_state(&self, key: &TypeKey) -> Option<EntryState> {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.registry.state(key)
	}

	/// Direct bindings of `interface`, in bind order.
	pub fn bindings_for(&self, interface: &TypeKey) -> Vec<TypeKey> {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.bindings.get(interface).to_vec()
	}

	/// Registered keys, sorted.
	pub fn registered_keys(&self) -> Vec<TypeKey> {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.registry.keys()
	}

	/// Number of registry entries.
	pub fn len(&self) -> usize {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		state.registry.len()
	}

	/// Whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Snapshot of registrations, bindings and constructor dependencies.
	pub fn dependency_graph(&self) -> DependencyGraph {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		DependencyGraph::from_state(&state, &*self.introspector)
	}

	/// Type identifier a binding target stands for.
	///
	/// Runs before any state borrow, so the introspector may read the injector.
	fn binding_key(&self, interface: &TypeKey, target: &BindingTarget) -> DiResult<TypeKey> {
		match target {
			BindingTarget::Type(key) => Ok(key.clone()),
			BindingTarget::Instance(instance) => self
				.introspector
				.type_key_of(instance)
				.ok_or_else(|| DiError::InvalidBindingTarget {
					interface: interface.clone(),
					reason: "instance type has no type identifier".to_string(),
				}),
		}
	}

	fn from_parts(introspector: Arc<dyn TypeIntrospector>, config: InjectorConfig) -> Self {
		Self {
			config,
			introspector,
			shared: ReentrantMutex::new(Shared::default()),
		}
	}

	fn key_for<T: Any>(&self) -> DiResult<TypeKey> {
		self.introspector
			.key_for_type_id(TypeId::of::<T>())
			.ok_or_else(|| {
				DiError::TypeMismatch(format!(
					"no type identifier known for {}",
					std::any::type_name::<T>()
				))
			})
	}
}

fn downcast<T: Any + Send + Sync>(key: &TypeKey, instance: Instance) -> DiResult<Arc<T>> {
	instance.downcast::<T>().map_err(|_| {
		DiError::TypeMismatch(format!(
			"component resolved for '{}' is not a {}",
			key,
			std::any::type_name::<T>()
		))
	})
}

impl std::fmt::Debug for Injector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let shared = self.shared.lock();
		let state = shared.state.borrow();
		f.debug_struct("Injector")
			.field("config", &self.config)
			.field("components", &state.registry.len())
			.field("bindings", &state.bindings.len())
			.finish()
	}
}

/// Builder for [`Injector`].
pub struct InjectorBuilder {
	introspector: Arc<dyn TypeIntrospector>,
	config: InjectorConfig,
}

impl InjectorBuilder {
	fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
		Self {
			introspector,
			config: InjectorConfig::default(),
		}
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: InjectorConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the auto-add default.
	pub fn auto_add(mut self, enabled: bool) -> Self {
		self.config.auto_add = enabled;
		self
	}

	/// Enables interface auto-binding on registration.
	pub fn auto_bind_interfaces(mut self, enabled: bool) -> Self {
		self.config.auto_bind_interfaces = enabled;
		self
	}

	/// Sets the maximum construction depth.
	pub fn max_depth(mut self, depth: usize) -> Self {
		self.config.max_depth = depth;
		self
	}

	/// Validates the configuration and builds the injector.
	pub fn build(self) -> DiResult<Injector> {
		self.config.validate()?;
		Ok(Injector::from_parts(self.introspector, self.config))
	}
}
