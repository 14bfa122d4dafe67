use proptest::prelude::*;
use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
use reinhardt_injector::{DiError, EntryState, Injector, InjectorConfig, TypeKey};

struct Tagged(u32);

struct Link;

fn tagged_catalog() -> TypeCatalog {
	let catalog = TypeCatalog::new();
	catalog
		.register(TypeDescriptor::of::<Tagged>("Tagged").abstract_type())
		.unwrap();
	catalog
}

/// `Link0 -> Link1 -> ... -> Link{length - 1}`, all backed by `Link`.
fn chain_catalog(length: usize) -> TypeCatalog {
	let catalog = TypeCatalog::new();
	for i in 0..length {
		let descriptor = TypeDescriptor::of::<Link>(format!("Link{i}")).unindexed();
		let descriptor = if i + 1 < length {
			descriptor.param("next", format!("Link{}", i + 1))
		} else {
			descriptor
		};
		catalog.register(descriptor.constructor(|_| Ok(Link))).unwrap();
	}
	catalog
}

proptest! {
	// Property 1: a slot keeps every instance in insertion order
	#[test]
	fn prop_slot_keeps_insertion_order(tags in prop::collection::vec(any::<u32>(), 1..16)) {
		let injector = Injector::new(tagged_catalog());
		for tag in &tags {
			injector.add_instance(Tagged(*tag)).unwrap();
		}

		let stored: Vec<u32> = injector
			.get_all::<Tagged>()
			.unwrap()
			.iter()
			.map(|t| t.0)
			.collect();

		prop_assert_eq!(&stored, &tags);
		let expected_state = if tags.len() == 1 { EntryState::Single } else { EntryState::Multi };
		prop_assert_eq!(injector.entry_state(&TypeKey::new("Tagged")), Some(expected_state));
	}

	// Property 2: construction depth is bounded by max_depth
	#[test]
	fn prop_depth_limit(length in 1usize..24, max_depth in 1usize..24) {
		let config = InjectorConfig::builder().max_depth(max_depth).build();
		let injector = Injector::with_config(chain_catalog(length), config).unwrap();

		let result = injector.get_component("Link0");

		if length <= max_depth {
			prop_assert!(result.is_ok());
			prop_assert_eq!(injector.len(), length);
		} else {
			let exceeded = matches!(result, Err(DiError::MaxDepthExceeded(depth)) if depth == max_depth + 1);
			prop_assert!(exceeded);
		}
	}
}
