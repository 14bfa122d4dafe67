use proptest::prelude::*;
use reinhardt_injector::catalog::TypeCatalog;
use reinhardt_injector::{BindingTable, DiError, Injector, Reference, TypeKey};

fn target_names(count: usize) -> Vec<String> {
	(0..count).map(|i| format!("Impl{i}")).collect()
}

proptest! {
	// Property 1: bind order is resolution order
	#[test]
	fn prop_resolution_follows_bind_order(count in 1usize..12) {
		let injector = Injector::new(TypeCatalog::new());
		let names = target_names(count);
		for name in &names {
			injector.bind_interface("Iface", name.as_str()).unwrap();
		}

		let resolved = injector.resolve("Iface").unwrap();

		let expected: Vec<TypeKey> = names.iter().map(TypeKey::new).collect();
		prop_assert_eq!(resolved, expected);
	}

	// Property 2: lists are flattened without deduplication
	#[test]
	fn prop_list_resolution_is_not_deduplicated(count in 1usize..8, repeats in 1usize..6) {
		let injector = Injector::new(TypeCatalog::new());
		for name in target_names(count) {
			injector.bind_interface("Iface", name.as_str()).unwrap();
		}
		let reference = Reference::from(vec!["Iface"; repeats]);

		let resolved = injector.resolve(reference).unwrap();

		prop_assert_eq!(resolved.len(), count * repeats);
	}

	// Property 3: a chain resolves to its tail, a back edge makes it cyclic
	#[test]
	fn prop_binding_chain(length in 1usize..20, back_edge in any::<prop::sample::Index>()) {
		let keys: Vec<TypeKey> = (0..=length).map(|i| TypeKey::new(format!("Layer{i}"))).collect();
		let mut table = BindingTable::new();
		for pair in keys.windows(2) {
			table.bind(pair[0].clone(), pair[1].clone());
		}

		prop_assert_eq!(table.resolve_key(&keys[0]).unwrap(), vec![keys[length].clone()]);

		let target = back_edge.get(&keys[..length]).clone();
		table.bind(keys[length].clone(), target);

		let is_cyclic = matches!(table.resolve_key(&keys[0]), Err(DiError::CyclicBinding { .. }));
		prop_assert!(is_cyclic);
	}
}
