//! Injector integration tests
//!
//! These tests verify:
//! 1. Lazy construction shares one instance per type
//! 2. Interface bindings resolve to every implementation, in bind order
//! 3. Multi-instance slots and the singular/plural lookup split
//! 4. Untyped, self-referential and indirect constructor cycles fail
//! 5. Auto-add, strict lookups and auto-binding of declared interfaces

use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
use reinhardt_injector::prelude::*;
use rstest::{fixture, rstest};
use std::any::TypeId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};

#[derive(Default)]
struct Logger;

struct Service {
	logger: Arc<Logger>,
}

#[derive(Default)]
struct Circle;

#[derive(Default)]
struct Square;

struct Plugin {
	name: &'static str,
}

struct Node;

struct Alpha;

struct Beta;

struct Retrying;

struct Flaky;

struct Renderer;

struct Link;

#[fixture]
fn catalog() -> TypeCatalog {
	let catalog = TypeCatalog::new();
	catalog
		.register_all([
			TypeDescriptor::of::<Logger>("Logger").default_constructor(),
			TypeDescriptor::of::<Service>("Service")
				.param("logger", "Logger")
				.constructor(|args| {
					Ok(Service {
						logger: args.get::<Logger>(0)?,
					})
				}),
			TypeDescriptor::interface("Shape"),
			TypeDescriptor::of::<Circle>("Circle")
				.implements("Shape")
				.default_constructor(),
			TypeDescriptor::of::<Square>("Square")
				.implements("Shape")
				.default_constructor(),
			TypeDescriptor::of::<Plugin>("Plugin").abstract_type(),
			TypeDescriptor::of::<Node>("Node")
				.param("next", "Node")
				.constructor(|_| Ok(Node)),
			TypeDescriptor::of::<Alpha>("Alpha")
				.param("beta", "Beta")
				.constructor(|_| Ok(Alpha)),
			TypeDescriptor::of::<Beta>("Beta")
				.param("alpha", "Alpha")
				.constructor(|_| Ok(Beta)),
			TypeDescriptor::interface("Canvas"),
			TypeDescriptor::of::<Renderer>("Renderer")
				.param("canvas", "Canvas")
				.constructor(|_| Ok(Renderer)),
			TypeDescriptor::of::<Retrying>("Retrying")
				.param("logger", "Logger")
				.untyped_param("retries")
				.constructor(|_| Ok(Retrying)),
		])
		.unwrap();
	catalog
}

#[fixture]
fn injector(catalog: TypeCatalog) -> Injector {
	Injector::new(catalog)
}

#[rstest]
fn test_dependency_is_shared_with_direct_lookup(injector: Injector) {
	// Arrange
	injector.add_type("Logger").unwrap();
	injector.add_type("Service").unwrap();

	// Act
	let service = injector.get_component("Service").unwrap();
	let logger = injector.get_component("Logger").unwrap();

	// Assert
	let service = service.downcast::<Service>().unwrap();
	let logger = logger.downcast::<Logger>().unwrap();
	assert!(Arc::ptr_eq(&service.logger, &logger));
	assert_eq!(injector.entry_state(&"Service".into()), Some(EntryState::Single));
	assert_eq!(injector.entry_state(&"Logger".into()), Some(EntryState::Single));
}

#[rstest]
fn test_repeated_lookup_returns_same_instance(injector: Injector) {
	injector.add_type("Logger").unwrap();

	let first = injector.get_component("Logger").unwrap();
	let second = injector.get_component("Logger").unwrap();

	assert!(Arc::ptr_eq(&first, &second));
}

#[rstest]
fn test_interface_resolves_to_all_bindings(injector: Injector) {
	// Arrange
	injector.add_binding("Shape", "Circle").unwrap();
	injector.add_binding("Shape", "Square").unwrap();

	// Act
	let shapes = injector.get_components("Shape").unwrap();

	// Assert
	assert_eq!(shapes.len(), 2);
	assert!(shapes[0].is::<Circle>());
	assert!(shapes[1].is::<Square>());
	assert_eq!(
		injector.resolve("Shape").unwrap(),
		vec![TypeKey::new("Circle"), TypeKey::new("Square")]
	);
}

#[rstest]
fn test_plural_lookup_auto_adds_bound_types(injector: Injector) {
	// Arrange
	injector.bind_interface("Shape", "Circle").unwrap();
	injector.bind_interface("Shape", "Square").unwrap();

	// Act
	let shapes = injector.get_components("Shape").unwrap();

	// Assert
	assert_eq!(shapes.len(), 2);
	assert!(shapes[0].is::<Circle>());
	assert!(shapes[1].is::<Square>());
	assert_eq!(injector.entry_state(&"Circle".into()), Some(EntryState::Single));
	assert_eq!(injector.entry_state(&"Square".into()), Some(EntryState::Single));
}

#[rstest]
fn test_unbound_interface_dependency_is_not_instantiable(injector: Injector) {
	// Act
	let result = injector.get_component("Renderer");

	// Assert
	assert!(matches!(
		result,
		Err(DiError::NotInstantiable(key)) if key.as_str() == "Canvas"
	));
	assert_eq!(injector.entry_state(&"Renderer".into()), Some(EntryState::Pending));
}

#[rstest]
fn test_bound_interface_dependency_is_constructed(injector: Injector) {
	// Arrange
	injector.add_binding("Canvas", "Circle").unwrap();

	// Act
	let renderer = injector.get_component("Renderer");

	// Assert
	assert!(renderer.unwrap().is::<Renderer>());
	assert_eq!(injector.entry_state(&"Circle".into()), Some(EntryState::Single));
}

#[rstest]
fn test_singular_lookup_of_multi_bound_interface_is_ambiguous(injector: Injector) {
	injector.add_binding("Shape", "Circle").unwrap();
	injector.add_binding("Shape", "Square").unwrap();

	let result = injector.get_component("Shape");

	assert!(matches!(result, Err(DiError::AmbiguousResolution { .. })));
}

#[rstest]
fn test_add_binding_keeps_existing_registration(injector: Injector) {
	// Arrange
	injector.add_type("Circle").unwrap();
	let circle = injector.get_component("Circle").unwrap();

	// Act
	injector.add_binding("Shape", "Circle").unwrap();

	// Assert
	let shape = injector.get_component("Shape").unwrap();
	assert!(Arc::ptr_eq(&circle, &shape));
}

#[rstest]
fn test_bind_interface_does_not_register_target(injector: Injector) {
	let key = injector.bind_interface("Shape", "Circle").unwrap();

	assert_eq!(key, TypeKey::new("Circle"));
	assert!(!injector.contains(&key));
	assert_eq!(injector.bindings_for(&"Shape".into()), vec![key]);
}

#[rstest]
fn test_instances_of_same_type_form_multi_slot(injector: Injector) {
	// Arrange
	injector.add_instance(Plugin { name: "first" }).unwrap();
	injector.add_instance(Plugin { name: "second" }).unwrap();
	injector.add_instance(Plugin { name: "third" }).unwrap();

	// Act
	let plugins = injector.get_all::<Plugin>().unwrap();

	// Assert
	let names: Vec<_> = plugins.iter().map(|p| p.name).collect();
	assert_eq!(names, vec!["first", "second", "third"]);
	assert_eq!(injector.entry_state(&"Plugin".into()), Some(EntryState::Multi));
	assert!(matches!(
		injector.get_component("Plugin"),
		Err(DiError::AmbiguousResolution { .. })
	));
}

#[rstest]
fn test_added_instance_is_returned_as_is(injector: Injector) {
	let plugin = Arc::new(Plugin { name: "only" });
	injector.add_shared(plugin.clone()).unwrap();

	let resolved = injector.get::<Plugin>().unwrap();

	assert!(Arc::ptr_eq(&plugin, &resolved));
}

#[rstest]
fn test_registration_list_is_dispatched_in_order(injector: Injector) {
	let first: Instance = Arc::new(Plugin { name: "a" });
	let second: Instance = Arc::new(Plugin { name: "b" });

	injector
		.add_component(vec![
			RegistrationInput::from("Logger"),
			RegistrationInput::from(first),
			RegistrationInput::from(second),
			RegistrationInput::None,
		])
		.unwrap();

	assert_eq!(
		injector.registered_keys(),
		vec![TypeKey::new("Logger"), TypeKey::new("Plugin")]
	);
	assert_eq!(injector.entry_state(&"Plugin".into()), Some(EntryState::Multi));
}

#[rstest]
#[case::pending(false)]
#[case::constructed(true)]
fn test_duplicate_type_registration_fails(injector: Injector, #[case] construct_first: bool) {
	injector.add_type("Logger").unwrap();
	if construct_first {
		injector.get_component("Logger").unwrap();
	}

	let result = injector.add_type("Logger");

	assert!(matches!(
		result,
		Err(DiError::DuplicateRegistration(key)) if key.as_str() == "Logger"
	));
}

#[rstest]
fn test_untyped_parameter_fails_before_dependencies_are_built(injector: Injector) {
	let result = injector.get_component("Retrying");

	match result {
		Err(DiError::UntypedDependency { owner, index, name }) => {
			assert_eq!(owner.as_str(), "Retrying");
			assert_eq!(index, 1);
			assert_eq!(name, "retries");
		}
		other => panic!("Expected UntypedDependency, got {:?}", other.map(|_| ())),
	}
	assert!(!injector.contains(&"Logger".into()));
}

#[rstest]
fn test_self_dependency_is_cyclic(injector: Injector) {
	let result = injector.get_component("Node");

	match result {
		Err(DiError::CyclicDependency { key, path }) => {
			assert_eq!(key.as_str(), "Node");
			assert_eq!(path, "Node -> Node");
		}
		other => panic!("Expected CyclicDependency, got {:?}", other.map(|_| ())),
	}
}

#[rstest]
fn test_indirect_dependency_cycle_is_detected(injector: Injector) {
	// Act
	let result = injector.get_component("Alpha");

	// Assert
	match result {
		Err(DiError::CyclicDependency { path, .. }) => {
			assert_eq!(path, "Alpha -> Beta -> Alpha");
		}
		other => panic!("Expected CyclicDependency, got {:?}", other.map(|_| ())),
	}
	assert_eq!(injector.entry_state(&"Alpha".into()), Some(EntryState::Pending));
	assert_eq!(injector.entry_state(&"Beta".into()), Some(EntryState::Pending));
}

#[rstest]
fn test_cycle_does_not_poison_later_lookups(injector: Injector) {
	assert!(injector.get_component("Alpha").is_err());

	let logger = injector.get_component("Logger");

	assert!(logger.is_ok());
}

#[rstest]
fn test_binding_cycle_is_detected(injector: Injector) {
	injector.bind_interface("Shape", "Outline").unwrap();
	injector.bind_interface("Outline", "Shape").unwrap();

	let result = injector.get_component("Shape");

	match result {
		Err(DiError::CyclicBinding { path, .. }) => assert_eq!(path, "Shape -> Outline -> Shape"),
		other => panic!("Expected CyclicBinding, got {:?}", other.map(|_| ())),
	}
}

#[rstest]
fn test_interface_is_not_instantiable(injector: Injector) {
	injector.add_type("Shape").unwrap();

	let result = injector.get_component("Shape");

	assert!(matches!(result, Err(DiError::NotInstantiable(key)) if key.as_str() == "Shape"));
}

#[rstest]
fn test_abstract_type_is_not_instantiable(injector: Injector) {
	let result = injector.get_component("Plugin");

	assert!(matches!(result, Err(DiError::NotInstantiable(_))));
}

#[rstest]
fn test_unregistered_component_without_auto_add(injector: Injector) {
	let result = injector.get_component_with("Logger", false);

	assert!(matches!(
		result,
		Err(DiError::UnregisteredComponent(key)) if key.as_str() == "Logger"
	));
	assert!(injector.is_empty());
}

#[rstest]
fn test_auto_add_registers_dependencies(injector: Injector) {
	let service = injector.get::<Service>().unwrap();

	assert_eq!(
		injector.registered_keys(),
		vec![TypeKey::new("Logger"), TypeKey::new("Service")]
	);
	assert!(Arc::ptr_eq(&service.logger, &injector.get::<Logger>().unwrap()));
}

#[rstest]
fn test_auto_add_disabled_applies_to_dependencies(injector: Injector) {
	injector.add_type("Service").unwrap();

	let result = injector.get_component_with("Service", false);

	assert!(matches!(
		result,
		Err(DiError::UnregisteredComponent(key)) if key.as_str() == "Logger"
	));
	assert_eq!(injector.entry_state(&"Service".into()), Some(EntryState::Pending));
}

#[rstest]
fn test_plural_lookup_skips_unregistered_types(injector: Injector) {
	// Arrange
	injector.add_binding("Shape", "Circle").unwrap();
	injector.bind_interface("Shape", "Square").unwrap();

	// Act
	let shapes = injector.get_components_with("Shape", false).unwrap();

	// Assert
	assert_eq!(shapes.len(), 1);
	assert!(shapes[0].is::<Circle>());
}

#[rstest]
fn test_strict_plural_lookup_fails_on_unregistered_types(catalog: TypeCatalog) {
	let injector = Injector::with_config(
		catalog,
		InjectorConfig::builder().auto_add(false).strict_many(true).build(),
	)
	.unwrap();
	injector.add_binding("Shape", "Circle").unwrap();
	injector.bind_interface("Shape", "Square").unwrap();

	let result = injector.get_components("Shape");

	assert!(matches!(
		result,
		Err(DiError::UnregisteredComponent(key)) if key.as_str() == "Square"
	));
}

#[rstest]
fn test_declared_interfaces_are_auto_bound(catalog: TypeCatalog) {
	// Arrange
	let injector = Injector::builder(catalog)
		.auto_bind_interfaces(true)
		.build()
		.unwrap();

	// Act
	injector.add_type("Circle").unwrap();
	injector.add_instance(Square).unwrap();
	injector.add_instance(Square).unwrap();

	// Assert
	assert_eq!(
		injector.bindings_for(&"Shape".into()),
		vec![TypeKey::new("Circle"), TypeKey::new("Square")]
	);
	assert_eq!(injector.get_components("Shape").unwrap().len(), 3);
}

#[rstest]
fn test_failed_construction_leaves_entry_pending() {
	// Arrange
	let healthy = Arc::new(AtomicBool::new(false));
	let flag = healthy.clone();
	let catalog = TypeCatalog::new();
	catalog
		.register(TypeDescriptor::of::<Flaky>("Flaky").constructor(move |_| {
			if flag.load(Ordering::SeqCst) {
				Ok(Flaky)
			} else {
				Err(DiError::constructor("Flaky", "backend unavailable"))
			}
		}))
		.unwrap();
	let injector = Injector::new(catalog);
	injector.add_type("Flaky").unwrap();

	// Act
	let first = injector.get_component("Flaky");

	// Assert
	assert!(matches!(first, Err(DiError::ConstructorFailed { .. })));
	assert_eq!(injector.entry_state(&"Flaky".into()), Some(EntryState::Pending));

	// Act: the constructor recovers
	healthy.store(true, Ordering::SeqCst);

	// Assert
	assert!(injector.get::<Flaky>().is_ok());
	assert_eq!(injector.entry_state(&"Flaky".into()), Some(EntryState::Single));
}

#[rstest]
fn test_zero_max_depth_is_rejected(catalog: TypeCatalog) {
	let config = InjectorConfig::builder().max_depth(0).build();

	let with_config = Injector::with_config(catalog.clone(), config);
	let built = Injector::builder(catalog).max_depth(0).build();

	assert!(matches!(with_config, Err(DiError::Config(_))));
	assert!(matches!(built, Err(DiError::Config(_))));
}

#[rstest]
fn test_rust_type_shared_by_two_keys_is_rejected() {
	// Arrange
	let catalog = TypeCatalog::new();
	catalog
		.register(TypeDescriptor::of::<Link>("Head").constructor(|_| Ok(Link)))
		.unwrap();

	// Act
	let second = catalog.register(TypeDescriptor::of::<Link>("Tail").constructor(|_| Ok(Link)));

	// Assert
	assert!(matches!(second, Err(DiError::DuplicateRustType { .. })));

	// Act: an instance built as Head is filed under Head
	let injector = Injector::new(catalog);
	let head = injector
		.get_component("Head")
		.unwrap()
		.downcast::<Link>()
		.unwrap();
	injector.add_shared(head).unwrap();

	// Assert
	assert_eq!(injector.entry_state(&"Head".into()), Some(EntryState::Multi));
	assert_eq!(injector.entry_state(&"Tail".into()), None);
}

#[rstest]
fn test_max_depth_is_enforced(catalog: TypeCatalog) {
	let injector =
		Injector::with_config(catalog, InjectorConfig::builder().max_depth(1).build()).unwrap();

	let result = injector.get_component("Service");

	assert!(matches!(result, Err(DiError::MaxDepthExceeded(2))));
}

#[rstest]
fn test_typed_lookup_of_unknown_rust_type(injector: Injector) {
	struct Unknown;

	let result = injector.get::<Unknown>();

	assert!(matches!(result, Err(DiError::TypeMismatch(_))));
}

#[rstest]
fn test_instance_without_descriptor_is_rejected(injector: Injector) {
	struct Unknown;

	let registered = injector.add_instance(Unknown);
	let bound = injector.bind_interface("Shape", Arc::new(Unknown) as Instance);

	assert!(matches!(registered, Err(DiError::UnresolvableReference(_))));
	assert!(matches!(bound, Err(DiError::InvalidBindingTarget { .. })));
}

#[rstest]
fn test_concurrent_lookups_construct_once() {
	// Arrange
	let constructed = Arc::new(AtomicUsize::new(0));
	let counter = constructed.clone();
	let catalog = TypeCatalog::new();
	catalog
		.register(TypeDescriptor::of::<Logger>("Logger").constructor(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(Logger)
		}))
		.unwrap();
	let injector = Arc::new(Injector::new(catalog));

	// Act
	let handles: Vec<_> = (0..8)
		.map(|_| {
			let injector = Arc::clone(&injector);
			std::thread::spawn(move || injector.get_component("Logger").unwrap())
		})
		.collect();
	let instances: Vec<Instance> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	// Assert
	assert_eq!(constructed.load(Ordering::SeqCst), 1);
	assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
}

#[rstest]
fn test_constructor_may_call_back_into_injector() {
	// Arrange
	let catalog = TypeCatalog::new();
	let injector = Arc::new(Injector::new(catalog.clone()));
	let weak = Arc::downgrade(&injector);
	catalog
		.register_all([
			TypeDescriptor::of::<Logger>("Logger").default_constructor(),
			TypeDescriptor::of::<Service>("Service").constructor(move |_| {
				let injector = weak
					.upgrade()
					.ok_or_else(|| DiError::constructor("Service", "injector dropped"))?;
				Ok(Service {
					logger: injector.get::<Logger>()?,
				})
			}),
		])
		.unwrap();

	// Act
	let service = injector.get::<Service>().unwrap();

	// Assert
	assert!(Arc::ptr_eq(&service.logger, &injector.get::<Logger>().unwrap()));
}

/// Introspector that inspects the injector while mapping instances.
struct InspectingIntrospector {
	catalog: TypeCatalog,
	injector: OnceLock<Weak<Injector>>,
	seen_components: AtomicUsize,
}

impl TypeIntrospector for InspectingIntrospector {
	fn is_constructible(&self, key: &TypeKey) -> bool {
		self.catalog.is_constructible(key)
	}

	fn constructor_parameters(&self, key: &TypeKey) -> Vec<Parameter> {
		self.catalog.constructor_parameters(key)
	}

	fn declared_interfaces(&self, key: &TypeKey) -> Vec<TypeKey> {
		self.catalog.declared_interfaces(key)
	}

	fn type_key_of(&self, instance: &Instance) -> Option<TypeKey> {
		if let Some(injector) = self.injector.get().and_then(Weak::upgrade) {
			self.seen_components.store(injector.len(), Ordering::SeqCst);
		}
		self.catalog.type_key_of(instance)
	}

	fn invoke_constructor(&self, key: &TypeKey, args: Vec<Instance>) -> DiResult<Instance> {
		self.catalog.invoke_constructor(key, args)
	}

	fn key_for_type_id(&self, type_id: TypeId) -> Option<TypeKey> {
		self.catalog.key_for_type_id(type_id)
	}
}

#[rstest]
fn test_instance_binding_lets_introspector_read_injector(catalog: TypeCatalog) {
	// Arrange
	let introspector = Arc::new(InspectingIntrospector {
		catalog,
		injector: OnceLock::new(),
		seen_components: AtomicUsize::new(0),
	});
	let injector = Arc::new(Injector::new(introspector.clone()));
	introspector
		.injector
		.set(Arc::downgrade(&injector))
		.unwrap();
	injector.add_type("Logger").unwrap();

	// Act
	let bound = injector.bind_interface("Shape", Arc::new(Circle) as Instance);
	let added = injector.add_binding("Shape", Arc::new(Square) as Instance);

	// Assert
	assert_eq!(bound.unwrap(), TypeKey::new("Circle"));
	assert!(added.is_ok());
	assert_eq!(
		injector.resolve("Shape").unwrap(),
		vec![TypeKey::new("Circle"), TypeKey::new("Square")]
	);
	assert!(introspector.seen_components.load(Ordering::SeqCst) >= 1);
}
