//! Creational context
//!
//! Opaque token handed through to delegate providers. The lifecycle manager
//! uses it to track the instances created during one resolution; the
//! injection-point runtime never inspects it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Inner {
	id: u64,
	parent: Option<CreationalContext>,
}

/// Token identifying one creation (and, through its parents, the chain of
/// creations that triggered it).
#[derive(Debug, Clone)]
pub struct CreationalContext {
	inner: Arc<Inner>,
}

impl CreationalContext {
	/// A root context, not nested in any other creation.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
				parent: None,
			}),
		}
	}

	/// A context for a creation triggered while this one is in progress.
	pub fn child(&self) -> Self {
		Self {
			inner: Arc::new(Inner {
				id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
				parent: Some(self.clone()),
			}),
		}
	}

	pub fn id(&self) -> u64 {
		self.inner.id
	}

	pub fn parent(&self) -> Option<&CreationalContext> {
		self.inner.parent.as_ref()
	}

	pub fn is_root(&self) -> bool {
		self.inner.parent.is_none()
	}
}

impl Default for CreationalContext {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for CreationalContext {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for CreationalContext {}
