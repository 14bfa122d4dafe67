//! Registration dispatch, lookups and constructor injection.
//!
//! These are the internal operations behind the [`Injector`] facade. Each one
//! receives the already-locked [`Shared`] state. `RefCell` borrows are kept
//! short and are never held while a constructor runs, so a constructor that
//! calls back into the injector re-enters cleanly.

use crate::error::{DiError, DiResult};
use crate::injector::{Injector, Shared};
use crate::introspect::{Instance, Parameter};
use crate::key::{TypeKey, format_path};
use crate::registry::{RegistrationInput, RegistryEntry};

impl Injector {
	/// Dispatches a registration input.
	pub(crate) fn register(&self, shared: &Shared, input: &RegistrationInput) -> DiResult<()> {
		match input {
			RegistrationInput::None => Ok(()),
			RegistrationInput::Many(items) => items
				.iter()
				.try_for_each(|item| self.register(shared, item)),
			RegistrationInput::Type(key) => {
				shared
					.state
					.borrow_mut()
					.registry
					.insert_pending(key.clone())?;
				self.bind_declared_interfaces(shared, key);
				Ok(())
			}
			RegistrationInput::Instance(instance) => {
				let key = self.introspector().type_key_of(instance).ok_or_else(|| {
					DiError::UnresolvableReference(
						"instance type has no type identifier".to_string(),
					)
				})?;
				shared
					.state
					.borrow_mut()
					.registry
					.insert_instance(key.clone(), instance.clone());
				self.bind_declared_interfaces(shared, &key);
				Ok(())
			}
		}
	}

	/// Binds every interface `key` declares to `key`, when auto-binding is on.
	///
	/// Pairs that are already bound are left alone, so registering several
	/// instances of one type does not multiply its bindings.
	pub(crate) fn bind_declared_interfaces(&self, shared: &Shared, key: &TypeKey) {
		if !self.config().auto_bind_interfaces {
			return;
		}
		let interfaces = self.introspector().declared_interfaces(key);
		let mut state = shared.state.borrow_mut();
		for interface in interfaces {
			state.bindings.bind_once(interface, key.clone());
		}
	}

	/// Resolves `key` to exactly one component.
	pub(crate) fn get_single(
		&self,
		shared: &Shared,
		key: &TypeKey,
		auto_add: bool,
	) -> DiResult<Instance> {
		let resolved = shared.state.borrow().bindings.resolve_key(key)?;
		let target = match resolved.as_slice() {
			[target] => target.clone(),
			many => {
				return Err(DiError::AmbiguousResolution {
					key: key.clone(),
					reason: format!("resolves to {} types: {}", many.len(), format_path(many)),
				});
			}
		};

		let entry = shared.state.borrow().registry.get(&target).cloned();
		match entry {
			Some(RegistryEntry::Single(instance)) => {
				tracing::debug!(key = %target, "cached component returned");
				Ok(instance)
			}
			Some(RegistryEntry::Multi(instances)) => Err(DiError::AmbiguousResolution {
				key: key.clone(),
				reason: format!(
					"'{}' holds {} instances, use get_components",
					target,
					instances.len()
				),
			}),
			Some(RegistryEntry::Pending) => self.construct(shared, &target, auto_add),
			None if auto_add => {
				tracing::debug!(key = %target, "auto-adding unregistered component");
				self.register(shared, &RegistrationInput::Type(target.clone()))?;
				self.construct(shared, &target, auto_add)
			}
			None => Err(DiError::UnregisteredComponent(target)),
		}
	}

	/// Resolves `key` to every matching component, flattened in order.
	pub(crate) fn get_many(
		&self,
		shared: &Shared,
		key: &TypeKey,
		auto_add: bool,
	) -> DiResult<Vec<Instance>> {
		let resolved = shared.state.borrow().bindings.resolve_key(key)?;
		let mut components = Vec::with_capacity(resolved.len());

		for target in resolved {
			let entry = shared.state.borrow().registry.get(&target).cloned();
			match entry {
				Some(RegistryEntry::Single(instance)) => components.push(instance),
				Some(RegistryEntry::Multi(instances)) => components.extend(instances),
				Some(RegistryEntry::Pending) => {
					components.push(self.construct(shared, &target, auto_add)?);
				}
				None if auto_add => {
					self.register(shared, &RegistrationInput::Type(target.clone()))?;
					components.push(self.construct(shared, &target, auto_add)?);
				}
				None if self.config().strict_many => {
					return Err(DiError::UnregisteredComponent(target));
				}
				None => {
					// Lenient mode: unlike get_component, a missing entry is skipped.
					tracing::warn!(requested = %key, key = %target, "skipping unregistered component");
				}
			}
		}

		Ok(components)
	}

	/// Constructs a pending type and stores it as its single instance.
	pub(crate) fn construct(
		&self,
		shared: &Shared,
		key: &TypeKey,
		auto_add: bool,
	) -> DiResult<Instance> {
		let _guard = shared.tracker.begin(key, self.config().max_depth)?;
		let introspector = self.introspector();

		if !introspector.is_constructible(key) {
			return Err(DiError::NotInstantiable(key.clone()));
		}

		let parameters = introspector.constructor_parameters(key);
		let dependencies = validate_parameters(key, &parameters)?;

		let mut args = Vec::with_capacity(dependencies.len());
		for dependency in dependencies {
			args.push(self.get_single(shared, dependency, auto_add)?);
		}

		let instance = introspector.invoke_constructor(key, args)?;
		shared
			.state
			.borrow_mut()
			.registry
			.insert_instance(key.clone(), instance.clone());
		tracing::debug!(%key, depth = shared.tracker.depth(), "component constructed");
		Ok(instance)
	}
}

/// Checks every parameter before any dependency is touched and returns the
/// declared types in order.
fn validate_parameters<'a>(owner: &TypeKey, parameters: &'a [Parameter]) -> DiResult<Vec<&'a TypeKey>> {
	parameters
		.iter()
		.enumerate()
		.map(|(index, parameter)| match &parameter.declared_type {
			None => Err(DiError::UntypedDependency {
				owner: owner.clone(),
				index,
				name: parameter.display_name(),
			}),
			Some(declared) if declared == owner => Err(DiError::CyclicDependency {
				key: owner.clone(),
				path: format_path([owner, owner]),
			}),
			Some(declared) => Ok(declared),
		})
		.collect()
}
