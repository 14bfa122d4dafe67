//! Property-based tests for the injector
//!
//! Uses proptest to verify invariants of bindings and the registry:
//! 1. Binding order - resolution follows bind order, without deduplication
//! 2. Binding chains - a chain resolves to its last key, a back edge is a cycle
//! 3. Slot order - instances of one type come back in insertion order
//! 4. Depth limit - construction chains fail exactly past the configured depth

mod binding_properties;
mod registry_properties;
