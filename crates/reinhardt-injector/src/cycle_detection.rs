//! Construction-in-progress tracking.
//!
//! Every `construct` call pushes its type key onto a per-injector resolution
//! stack and pops it when the returned [`ResolutionGuard`] is dropped. Asking
//! to construct a key that is already on the stack is an indirect (or direct)
//! circular dependency.
//!
//! ## Features
//!
//! - **O(1) circular detection** through a `HashSet<TypeKey>`
//! - **Depth limiting** against pathological chains
//! - **RAII cleanup**, so a failed construction never leaves a stale marker
//! - **Readable paths** such as `A -> B -> C -> A` in error messages

use crate::error::{DiError, DiResult};
use crate::key::{TypeKey, format_path};
use std::cell::RefCell;
use std::collections::HashSet;

/// Default maximum construction depth.
pub const MAX_RESOLUTION_DEPTH: usize = 100;

#[derive(Debug, Default)]
struct ResolutionStack {
	in_progress: HashSet<TypeKey>,
	path: Vec<TypeKey>,
}

/// Tracks which type keys are currently being constructed.
#[derive(Debug, Default)]
pub(crate) struct ResolutionTracker {
	stack: RefCell<ResolutionStack>,
}

impl ResolutionTracker {
	#[cfg(test)]
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Marks `key` as in progress.
	///
	/// Fails with [`DiError::CyclicDependency`] if `key` is already in progress
	/// and with [`DiError::MaxDepthExceeded`] if the stack would grow past
	/// `max_depth`.
	pub(crate) fn begin(&self, key: &TypeKey, max_depth: usize) -> DiResult<ResolutionGuard<'_>> {
		let mut stack = self.stack.borrow_mut();

		if stack.in_progress.contains(key) {
			return Err(DiError::CyclicDependency {
				key: key.clone(),
				path: cycle_path(&stack.path, key),
			});
		}

		let depth = stack.path.len() + 1;
		if depth > max_depth {
			return Err(DiError::MaxDepthExceeded(depth));
		}

		stack.in_progress.insert(key.clone());
		stack.path.push(key.clone());
		tracing::trace!(%key, depth, "construction started");

		Ok(ResolutionGuard {
			tracker: self,
			key: key.clone(),
		})
	}

	/// Whether `key` is currently in progress.
	#[cfg(test)]
	pub(crate) fn is_in_progress(&self, key: &TypeKey) -> bool {
		self.stack.borrow().in_progress.contains(key)
	}

	/// Current construction depth.
	pub(crate) fn depth(&self) -> usize {
		self.stack.borrow().path.len()
	}

	fn end(&self, key: &TypeKey) {
		let mut stack = self.stack.borrow_mut();
		stack.in_progress.remove(key);
		if let Some(pos) = stack.path.iter().rposition(|k| k == key) {
			stack.path.remove(pos);
		}
	}
}

/// RAII guard removing its key from the resolution stack on drop.
#[derive(Debug)]
pub(crate) struct ResolutionGuard<'a> {
	tracker: &'a ResolutionTracker,
	key: TypeKey,
}

impl Drop for ResolutionGuard<'_> {
	fn drop(&mut self) {
		self.tracker.end(&self.key);
	}
}

/// Builds the `A -> B -> A` path from the first occurrence of `key`.
fn cycle_path(path: &[TypeKey], key: &TypeKey) -> String {
	match path.iter().position(|k| k == key) {
		Some(start) => format_path(path[start..].iter().chain(std::iter::once(key))),
		None => format_path([key, key]),
	}
}
