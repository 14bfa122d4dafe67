//! Component registry.
//!
//! Each type key maps to one [`RegistryEntry`]. Entries only ever move forward:
//!
//! ```text
//! Pending ──construct──► Single ──add instance──► Multi ──add instance──► Multi
//!                          ▲
//!          add instance ───┘ (from absent)
//! ```

use crate::error::{DiError, DiResult};
use crate::introspect::Instance;
use crate::key::TypeKey;
use std::collections::HashMap;

/// Registry slot for one type key.
#[derive(Clone)]
pub enum RegistryEntry {
	/// Declared but not constructed yet.
	Pending,
	/// Exactly one instance.
	Single(Instance),
	/// Two or more instances, in insertion order.
	Multi(Vec<Instance>),
}

impl RegistryEntry {
	/// State of the entry without its instances.
	pub fn state(&self) -> EntryState {
		match self {
			Self::Pending => EntryState::Pending,
			Self::Single(_) => EntryState::Single,
			Self::Multi(_) => EntryState::Multi,
		}
	}

	/// Instances held by the entry, in insertion order.
	pub fn instances(&self) -> Vec<Instance> {
		match self {
			Self::Pending => Vec::new(),
			Self::Single(instance) => vec![instance.clone()],
			Self::Multi(instances) => instances.clone(),
		}
	}
}

impl std::fmt::Debug for RegistryEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pending => f.write_str("Pending"),
			Self::Single(_) => f.write_str("Single(..)"),
			Self::Multi(instances) => write!(f, "Multi({} instances)", instances.len()),
		}
	}
}

/// Observable state of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
	/// Declared, not constructed.
	Pending,
	/// One instance.
	Single,
	/// Several instances.
	Multi,
}

impl std::fmt::Display for EntryState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pending => write!(f, "pending"),
			Self::Single => write!(f, "single"),
			Self::Multi => write!(f, "multi"),
		}
	}
}

/// Input accepted by `register` / `add_component`.
#[derive(Clone, Default)]
pub enum RegistrationInput {
	/// Nothing to register.
	#[default]
	None,
	/// Register every element, in order.
	Many(Vec<RegistrationInput>),
	/// Declare a type to be constructed on demand.
	Type(TypeKey),
	/// Add a live instance.
	Instance(Instance),
}

impl RegistrationInput {
	/// Shorthand for [`RegistrationInput::Type`].
	pub fn ty(key: impl Into<TypeKey>) -> Self {
		Self::Type(key.into())
	}
}

impl From<TypeKey> for RegistrationInput {
	fn from(key: TypeKey) -> Self {
		Self::Type(key)
	}
}

impl From<&str> for RegistrationInput {
	fn from(key: &str) -> Self {
		Self::Type(TypeKey::new(key))
	}
}

impl From<Instance> for RegistrationInput {
	fn from(instance: Instance) -> Self {
		Self::Instance(instance)
	}
}

impl<R: Into<RegistrationInput>> From<Option<R>> for RegistrationInput {
	fn from(input: Option<R>) -> Self {
		input.map_or(Self::None, Into::into)
	}
}

impl<R: Into<RegistrationInput>> From<Vec<R>> for RegistrationInput {
	fn from(items: Vec<R>) -> Self {
		Self::Many(items.into_iter().map(Into::into).collect())
	}
}

impl std::fmt::Debug for RegistrationInput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::None => f.write_str("None"),
			Self::Many(items) => f.debug_tuple("Many").field(items).finish(),
			Self::Type(key) => f.debug_tuple("Type").field(key).finish(),
			Self::Instance(_) => f.write_str("Instance(..)"),
		}
	}
}

/// Store of pending and constructed components keyed by type.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
	entries: HashMap<TypeKey, RegistryEntry>,
}

impl ComponentRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `key` as pending.
	///
	/// Fails with [`DiError::DuplicateRegistration`] if `key` is present in
	/// any state.
	pub fn insert_pending(&mut self, key: TypeKey) -> DiResult<()> {
		if self.entries.contains_key(&key) {
			return Err(DiError::DuplicateRegistration(key));
		}
		tracing::debug!(%key, "component declared");
		self.entries.insert(key, RegistryEntry::Pending);
		Ok(())
	}

	/// Adds an instance under `key`, promoting `Single` to `Multi`.
	///
	/// Returns the resulting state.
	pub fn insert_instance(&mut self, key: TypeKey, instance: Instance) -> EntryState {
		let entry = self.entries.remove(&key);
		let updated = match entry {
			None | Some(RegistryEntry::Pending) => RegistryEntry::Single(instance),
			Some(RegistryEntry::Single(existing)) => RegistryEntry::Multi(vec![existing, instance]),
			Some(RegistryEntry::Multi(mut instances)) => {
				instances.push(instance);
				RegistryEntry::Multi(instances)
			}
		};
		let state = updated.state();
		tracing::debug!(%key, %state, "component instance added");
		self.entries.insert(key, updated);
		state
	}

	/// Entry for `key`.
	pub fn get(&self, key: &TypeKey) -> Option<&RegistryEntry> {
		self.entries.get(key)
	}

	/// State of `key`'s entry.
	pub fn state(&self, key: &TypeKey) -> Option<EntryState> {
		self.entries.get(key).map(RegistryEntry::state)
	}

	/// Whether `key` has an entry.
	pub fn contains(&self, key: &TypeKey) -> bool {
		self.entries.contains_key(key)
	}

	/// Registered keys, sorted.
	pub fn keys(&self) -> Vec<TypeKey> {
		let mut keys: Vec<_> = self.entries.keys().cloned().collect();
		keys.sort();
		keys
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the registry has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
