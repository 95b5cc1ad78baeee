//! Current injection point
//!
//! Per-thread register holding the injection point whose value is being
//! produced. The register is deliberately minimal: [`set`] swaps its content and
//! returns the previous one, and nothing else validates nesting. Correct nesting
//! is provided by [`InjectionPointGuard`], which restores the previous value when
//! dropped (including during unwinding).
//!
//! Each thread has its own register, so concurrent resolution chains never see
//! each other's injection points. Async code must not hold a guard across an
//! `.await`; use [`WithInjectionPoint`] instead, which installs the point around
//! every poll.
//!
//! # Examples
//!
//! ```
//! use tessera_di::{current, InjectionPoint, TypeDescriptor};
//!
//! let point = InjectionPoint::builder(TypeDescriptor::of::<u8>()).build();
//! assert!(current::current_injection_point().is_empty());
//!
//! {
//!     let _guard = current::install(point.clone());
//!     assert_eq!(current::current_injection_point(), point);
//! }
//!
//! assert!(current::current_injection_point().is_empty());
//! ```

use crate::error::{DiError, DiResult};
use crate::injection_point::InjectionPoint;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

thread_local! {
	static CURRENT: RefCell<InjectionPoint> = RefCell::new(InjectionPoint::empty());
	static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Replaces the current injection point and returns the previous one.
///
/// Returns [`InjectionPoint::empty`] on the first call of a thread. During
/// thread teardown the register is gone; the value is discarded and the empty
/// point returned.
pub fn set(point: InjectionPoint) -> InjectionPoint {
	CURRENT
		.try_with(|slot| slot.replace(point))
		.unwrap_or_else(|_| InjectionPoint::empty())
}

/// The injection point currently being resolved on this thread, or the empty
/// point when none is.
pub fn current_injection_point() -> InjectionPoint {
	CURRENT
		.try_with(|slot| slot.borrow().clone())
		.unwrap_or_else(|_| InjectionPoint::empty())
}

/// Like [`current_injection_point`], but fails when no injection point is
/// being resolved.
pub fn require_current_injection_point() -> DiResult<InjectionPoint> {
	let point = current_injection_point();
	if point.is_empty() {
		return Err(DiError::NoActiveInjectionPoint);
	}
	Ok(point)
}

/// Number of guards currently alive on this thread.
pub fn nesting_depth() -> usize {
	DEPTH.try_with(Cell::get).unwrap_or(0)
}

/// Installs `point` until the returned guard is dropped.
pub fn install(point: InjectionPoint) -> InjectionPointGuard {
	let previous = set(point);
	let _ = DEPTH.try_with(|depth| depth.set(depth.get() + 1));
	InjectionPointGuard {
		previous: Some(previous),
		_not_send: PhantomData,
	}
}

/// RAII guard: restores the previously current injection point on drop.
///
/// The guard is neither `Send` nor `Sync`; it must be dropped on the thread
/// that created it.
#[must_use = "dropping the guard immediately restores the previous injection point"]
#[derive(Debug)]
pub struct InjectionPointGuard {
	previous: Option<InjectionPoint>,
	_not_send: PhantomData<*const ()>,
}

impl InjectionPointGuard {
	/// The injection point that will be restored.
	pub fn previous(&self) -> Option<&InjectionPoint> {
		self.previous.as_ref()
	}
}

impl Drop for InjectionPointGuard {
	fn drop(&mut self) {
		if let Some(previous) = self.previous.take() {
			set(previous);
		}
		let _ = DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
	}
}

#[cfg(feature = "async")]
pub use self::future::{InjectionPointFutureExt, WithInjectionPoint};

#[cfg(feature = "async")]
mod future {
	use super::install;
	use crate::injection_point::InjectionPoint;
	use pin_project::pin_project;
	use std::future::Future;
	use std::pin::Pin;
	use std::task::{Context, Poll};

	/// Future adapter making an injection point current while the inner future
	/// is polled.
	///
	/// The point is installed at the start of every `poll` and the previous value
	/// restored before `poll` returns, so a suspended future never leaves its
	/// point visible to other tasks running on the same worker thread.
	#[pin_project]
	#[derive(Debug)]
	#[must_use = "futures do nothing unless polled"]
	pub struct WithInjectionPoint<F> {
		#[pin]
		inner: F,
		point: InjectionPoint,
	}

	impl<F> WithInjectionPoint<F> {
		pub fn new(inner: F, point: InjectionPoint) -> Self {
			Self { inner, point }
		}

		pub fn injection_point(&self) -> &InjectionPoint {
			&self.point
		}
	}

	impl<F: Future> Future for WithInjectionPoint<F> {
		type Output = F::Output;

		fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
			let this = self.project();
			let _guard = install(this.point.clone());
			this.inner.poll(cx)
		}
	}

	/// Extension trait attaching an injection point to any future.
	pub trait InjectionPointFutureExt: Future + Sized {
		fn with_injection_point(self, point: InjectionPoint) -> WithInjectionPoint<Self> {
			WithInjectionPoint::new(self, point)
		}
	}

	impl<F: Future> InjectionPointFutureExt for F {}
}
