//! Dependency graph visualization for development and debugging
//!
//! [`Injector::dependency_graph`](crate::Injector::dependency_graph) takes a
//! snapshot of the registry, the binding table and the constructor parameters
//! reported by the introspector. The snapshot can be rendered in DOT format
//! for Graphviz, or checked for constructor cycles before anything is built.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_injector::catalog::{TypeCatalog, TypeDescriptor};
//! use reinhardt_injector::Injector;
//!
//! #[derive(Default)]
//! struct Circle;
//!
//! let catalog = TypeCatalog::new();
//! catalog
//!     .register(TypeDescriptor::of::<Circle>("Circle").default_constructor())
//!     .unwrap();
//!
//! let injector = Injector::new(catalog);
//! injector.add_binding("Shape", "Circle").unwrap();
//!
//! let dot = injector.dependency_graph().to_dot();
//! assert!(dot.contains("\"Shape\" -> \"Circle\" [style=dashed];"));
//! ```

use crate::injector::InjectorState;
use crate::introspect::TypeIntrospector;
use crate::key::TypeKey;
use crate::registry::EntryState;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
	/// Type identifier.
	pub key: TypeKey,
	/// Registry state, `None` when the type is referenced but not registered.
	pub state: Option<EntryState>,
	/// Whether the introspector can construct the type.
	pub constructible: bool,
}

/// Kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	/// Constructor parameter: `from` needs `to`.
	Dependency,
	/// Interface binding: `from` is bound to `to`.
	Binding,
}

/// Directed edge of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	/// Source node.
	pub from: TypeKey,
	/// Target node.
	pub to: TypeKey,
	/// Edge kind.
	pub kind: EdgeKind,
}

/// Snapshot of registrations, bindings and constructor dependencies.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
	nodes: BTreeMap<TypeKey, GraphNode>,
	edges: Vec<GraphEdge>,
}

impl DependencyGraph {
	pub(crate) fn from_state(state: &InjectorState, introspector: &dyn TypeIntrospector) -> Self {
		let mut graph = Self::default();
		let mut pending: VecDeque<TypeKey> = state.registry.keys().into();
		let mut expanded = HashSet::new();

		let mut bindings: Vec<_> = state.bindings.iter().collect();
		bindings.sort_by(|a, b| a.0.cmp(b.0));
		for (interface, targets) in &bindings {
			pending.extend(targets.iter().cloned());
			pending.push_back((*interface).clone());
		}

		// Types reached only as a dependency still contribute their own edges.
		while let Some(key) = pending.pop_front() {
			if !expanded.insert(key.clone()) {
				continue;
			}
			graph.ensure_node(&key, state, introspector);
			for parameter in introspector.constructor_parameters(&key) {
				if let Some(dependency) = parameter.declared_type {
					graph.ensure_node(&dependency, state, introspector);
					graph.push_edge(key.clone(), dependency.clone(), EdgeKind::Dependency);
					pending.push_back(dependency);
				}
			}
		}

		for (interface, targets) in bindings {
			for target in targets {
				graph.push_edge(interface.clone(), target.clone(), EdgeKind::Binding);
			}
		}

		graph
	}

	fn ensure_node(
		&mut self,
		key: &TypeKey,
		state: &InjectorState,
		introspector: &dyn TypeIntrospector,
	) {
		if self.nodes.contains_key(key) {
			return;
		}
		self.nodes.insert(
			key.clone(),
			GraphNode {
				key: key.clone(),
				state: state.registry.state(key),
				constructible: introspector.is_constructible(key),
			},
		);
	}

	fn push_edge(&mut self, from: TypeKey, to: TypeKey, kind: EdgeKind) {
		let edge = GraphEdge { from, to, kind };
		if !self.edges.contains(&edge) {
			self.edges.push(edge);
		}
	}

	/// Nodes, sorted by key.
	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.nodes.values()
	}

	/// Node for `key`.
	pub fn node(&self, key: &TypeKey) -> Option<&GraphNode> {
		self.nodes.get(key)
	}

	/// Edges, dependencies first then bindings.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Direct constructor dependencies of `key`.
	pub fn dependencies_of(&self, key: &TypeKey) -> Vec<&TypeKey> {
		self.edges
			.iter()
			.filter(|edge| edge.kind == EdgeKind::Dependency && &edge.from == key)
			.map(|edge| &edge.to)
			.collect()
	}

	/// Generate DOT format output for Graphviz
	///
	/// Dependency edges are solid, binding edges dashed. Node colors reflect
	/// the registry state.
	pub fn to_dot(&self) -> String {
		let mut output = String::from("digraph DependencyGraph {\n");
		output.push_str("  rankdir=LR;\n");
		output.push_str("  node [shape=box, style=rounded];\n\n");

		for node in self.nodes.values() {
			let (color, label) = match node.state {
				Some(EntryState::Single) => ("lightblue", "single"),
				Some(EntryState::Multi) => ("lightyellow", "multi"),
				Some(EntryState::Pending) => ("lightgreen", "pending"),
				None if node.constructible => ("white", "unregistered"),
				None => ("lightgrey", "interface"),
			};
			output.push_str(&format!(
				"  \"{}\" [label=\"{}\\n({})\", fillcolor={}, style=filled];\n",
				node.key, node.key, label, color
			));
		}

		output.push('\n');

		for edge in &self.edges {
			match edge.kind {
				EdgeKind::Dependency => {
					output.push_str(&format!("  \"{}\" -> \"{}\";\n", edge.from, edge.to));
				}
				EdgeKind::Binding => {
					output.push_str(&format!(
						"  \"{}\" -> \"{}\" [style=dashed];\n",
						edge.from, edge.to
					));
				}
			}
		}

		output.push_str("}\n");
		output
	}

	/// Detect circular constructor dependencies in the graph
	///
	/// Binding edges are followed too, so a type that needs an interface bound
	/// back to itself is reported. Each cycle is listed from its first node.
	pub fn detect_cycles(&self) -> Vec<Vec<TypeKey>> {
		let mut cycles = Vec::new();
		let mut visited = HashSet::new();
		let mut rec_stack = HashSet::new();

		for key in self.nodes.keys() {
			if !visited.contains(key) {
				let mut path = Vec::new();
				self.dfs_detect_cycles(key, &mut visited, &mut rec_stack, &mut path, &mut cycles);
			}
		}

		cycles
	}

	fn dfs_detect_cycles(
		&self,
		node: &TypeKey,
		visited: &mut HashSet<TypeKey>,
		rec_stack: &mut HashSet<TypeKey>,
		path: &mut Vec<TypeKey>,
		cycles: &mut Vec<Vec<TypeKey>>,
	) {
		visited.insert(node.clone());
		rec_stack.insert(node.clone());
		path.push(node.clone());

		let targets: Vec<&TypeKey> = self
			.edges
			.iter()
			.filter(|edge| &edge.from == node)
			.map(|edge| &edge.to)
			.collect();

		for target in targets {
			if !visited.contains(target) {
				self.dfs_detect_cycles(target, visited, rec_stack, path, cycles);
			} else if rec_stack.contains(target)
				&& let Some(start) = path.iter().position(|p| p == target)
			{
				cycles.push(path[start..].to_vec());
			}
		}

		path.pop();
		rec_stack.remove(node);
	}

	/// Counts nodes and edges by kind.
	pub fn statistics(&self) -> GraphStatistics {
		let count_state =
			|state: EntryState| self.nodes.values().filter(|n| n.state == Some(state)).count();
		GraphStatistics {
			node_count: self.nodes.len(),
			dependency_count: self
				.edges
				.iter()
				.filter(|e| e.kind == EdgeKind::Dependency)
				.count(),
			binding_count: self
				.edges
				.iter()
				.filter(|e| e.kind == EdgeKind::Binding)
				.count(),
			pending_count: count_state(EntryState::Pending),
			single_count: count_state(EntryState::Single),
			multi_count: count_state(EntryState::Multi),
		}
	}
}

/// Statistics about a dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
	/// Total number of nodes
	pub node_count: usize,
	/// Number of constructor dependency edges
	pub dependency_count: usize,
	/// Number of binding edges
	pub binding_count: usize,
	/// Number of pending registrations
	pub pending_count: usize,
	/// Number of single-instance registrations
	pub single_count: usize,
	/// Number of multi-instance registrations
	pub multi_count: usize,
}
