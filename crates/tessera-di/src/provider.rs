//! Reference providers
//!
//! A [`ReferenceProvider`] produces one value for a dependency. The
//! [`CurrentInjectionPointProvider`] wraps a lazily resolved delegate provider
//! so that, while the delegate runs, [`current_injection_point`] reports the
//! injection point being satisfied:
//!
//! 1. the injection point is installed, saving the previous one
//! 2. the delegate supplier is called (it may depend on the installed point)
//! 3. the delegate produces the value, or fails
//! 4. the previous injection point is restored on every exit path, before the
//!    result (or failure) reaches the caller
//!
//! Delegate failures are returned unchanged. Nothing is cached.
//!
//! # Examples
//!
//! ```
//! use tessera_di::{
//!     current_injection_point, from_fn, CreationalContext, CurrentInjectionPointProvider,
//!     InjectionPoint, ReferenceProvider, TypeDescriptor,
//! };
//! use std::convert::Infallible;
//!
//! let point = InjectionPoint::builder(TypeDescriptor::of::<String>()).build();
//! let provider = CurrentInjectionPointProvider::new(point.clone(), || {
//!     from_fn(|_ctx: &CreationalContext| {
//!         Ok::<_, Infallible>(current_injection_point().required_type().to_string())
//!     })
//! });
//!
//! let value = provider.produce(&CreationalContext::new()).unwrap();
//! assert_eq!(value, "alloc::string::String");
//! assert!(current_injection_point().is_empty());
//! ```

use crate::creational::CreationalContext;
use crate::current::{self, InjectionPointGuard, current_injection_point};
use crate::injection_point::InjectionPoint;
use crate::settings::ContextSettings;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

/// Produces values for one dependency.
pub trait ReferenceProvider<T> {
	type Error;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, Self::Error>;
}

impl<T, P> ReferenceProvider<T> for &P
where
	P: ReferenceProvider<T> + ?Sized,
{
	type Error = P::Error;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, Self::Error> {
		(**self).produce(ctx)
	}
}

impl<T, P> ReferenceProvider<T> for Box<P>
where
	P: ReferenceProvider<T> + ?Sized,
{
	type Error = P::Error;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, Self::Error> {
		(**self).produce(ctx)
	}
}

impl<T, P> ReferenceProvider<T> for Arc<P>
where
	P: ReferenceProvider<T> + ?Sized,
{
	type Error = P::Error;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, Self::Error> {
		(**self).produce(ctx)
	}
}

/// Provider backed by a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnProvider<F> {
	f: F,
}

/// Wraps a closure as a [`ReferenceProvider`].
pub fn from_fn<T, E, F>(f: F) -> FnProvider<F>
where
	F: Fn(&CreationalContext) -> Result<T, E>,
{
	FnProvider { f }
}

impl<T, E, F> ReferenceProvider<T> for FnProvider<F>
where
	F: Fn(&CreationalContext) -> Result<T, E>,
{
	type Error = E;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, E> {
		(self.f)(ctx)
	}
}

impl<F> fmt::Debug for FnProvider<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnProvider").finish_non_exhaustive()
	}
}

/// Async counterpart of [`ReferenceProvider`].
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncReferenceProvider<T: Send>: Send + Sync {
	type Error: Send;

	async fn produce(&self, ctx: &CreationalContext) -> Result<T, Self::Error>;
}

/// Makes an injection point current while a lazily resolved delegate produces
/// its value.
///
/// `S` is the delegate supplier: a zero-argument closure returning the
/// delegate provider. It is called on every production, after the injection
/// point has been installed.
pub struct CurrentInjectionPointProvider<S> {
	delegate_supplier: S,
	injection_point: InjectionPoint,
	settings: Arc<ContextSettings>,
}

impl<S> CurrentInjectionPointProvider<S> {
	pub fn new(injection_point: InjectionPoint, delegate_supplier: S) -> Self {
		Self {
			delegate_supplier,
			injection_point,
			settings: ContextSettings::shared_default(),
		}
	}

	pub fn with_settings(mut self, settings: Arc<ContextSettings>) -> Self {
		self.settings = settings;
		self
	}

	pub fn injection_point(&self) -> &InjectionPoint {
		&self.injection_point
	}

	pub fn settings(&self) -> &ContextSettings {
		&self.settings
	}

	/// Resolves the delegate without installing the injection point.
	pub fn delegate<D>(&self) -> D
	where
		S: Fn() -> D,
	{
		(self.delegate_supplier)()
	}

	fn enter(&self) -> InjectionPointGuard {
		let guard = current::install(self.injection_point.clone());
		let depth = current::nesting_depth();
		if depth > self.settings.nesting_warning_threshold {
			tracing::warn!(
				depth,
				threshold = self.settings.nesting_warning_threshold,
				required_type = %self.injection_point.required_type(),
				"Deeply nested dependent resolution"
			);
		}
		if self.settings.trace_context_switches {
			tracing::trace!(
				depth,
				required_type = %self.injection_point.required_type(),
				"Injection point installed"
			);
		}
		guard
	}

	fn exit(&self, guard: InjectionPointGuard) {
		drop(guard);
		if self.settings.trace_context_switches {
			tracing::trace!(
				depth = current::nesting_depth(),
				required_type = %self.injection_point.required_type(),
				"Injection point restored"
			);
		}
	}

	fn report_failure(&self) {
		if self.settings.log_delegate_failures {
			tracing::debug!(
				required_type = %self.injection_point.required_type(),
				qualifiers = %self.injection_point.qualifiers(),
				"Delegate provider failed"
			);
		}
	}

	/// Async production: the delegate is resolved with the injection point
	/// installed, and its future runs with the point installed around every poll.
	#[cfg(feature = "async")]
	pub async fn produce_async<T, D>(&self, ctx: &CreationalContext) -> Result<T, D::Error>
	where
		S: Fn() -> D,
		D: AsyncReferenceProvider<T>,
		T: Send,
	{
		use crate::current::InjectionPointFutureExt;

		let delegate = {
			let guard = self.enter();
			let delegate = (self.delegate_supplier)();
			self.exit(guard);
			delegate
		};

		let result = delegate
			.produce(ctx)
			.with_injection_point(self.injection_point.clone())
			.await;
		if result.is_err() {
			self.report_failure();
		}
		result
	}
}

impl<T, S, D> ReferenceProvider<T> for CurrentInjectionPointProvider<S>
where
	S: Fn() -> D,
	D: ReferenceProvider<T>,
{
	type Error = D::Error;

	fn produce(&self, ctx: &CreationalContext) -> Result<T, D::Error> {
		let guard = self.enter();
		let result = (self.delegate_supplier)().produce(ctx);
		self.exit(guard);
		if result.is_err() {
			self.report_failure();
		}
		result
	}
}

impl<S> fmt::Debug for CurrentInjectionPointProvider<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CurrentInjectionPointProvider")
			.field("injection_point", &self.injection_point)
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

/// Provides the current injection point itself as an injectable value.
///
/// Produces the empty point when no resolution is in progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct InjectionPointReferenceProvider;

impl ReferenceProvider<InjectionPoint> for InjectionPointReferenceProvider {
	type Error = Infallible;

	fn produce(&self, _ctx: &CreationalContext) -> Result<InjectionPoint, Infallible> {
		Ok(current_injection_point())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::TypeDescriptor;
	use rstest::rstest;
	use std::cell::{Cell, RefCell};
	use std::sync::Mutex;

	#[derive(Debug, PartialEq, thiserror::Error)]
	#[error("connection refused: {0}")]
	struct ConnectError(u32);

	fn point(name: &'static str) -> InjectionPoint {
		InjectionPoint::builder(TypeDescriptor::named(name)).build()
	}

	#[rstest]
	fn test_point_visible_during_production() {
		// Arrange
		let a = point("A");
		let provider = CurrentInjectionPointProvider::new(a.clone(), || {
			from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(current_injection_point()))
		});

		// Act
		let seen = provider.produce(&CreationalContext::new()).unwrap();

		// Assert
		assert_eq!(seen, a);
		assert!(current_injection_point().is_empty());
	}

	#[rstest]
	fn test_delegate_resolved_after_install() {
		// Arrange
		let a = point("A");
		let seen_by_supplier = RefCell::new(None);
		let provider = CurrentInjectionPointProvider::new(a.clone(), || {
			*seen_by_supplier.borrow_mut() = Some(current_injection_point());
			from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(1u8))
		});

		// Act
		provider.produce(&CreationalContext::new()).unwrap();

		// Assert
		assert_eq!(seen_by_supplier.into_inner(), Some(a));
	}

	#[rstest]
	fn test_delegate_resolved_on_every_production() {
		// Arrange
		let calls = Cell::new(0);
		let provider = CurrentInjectionPointProvider::new(point("A"), || {
			calls.set(calls.get() + 1);
			from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(()))
		});
		let ctx = CreationalContext::new();

		// Act
		provider.produce(&ctx).unwrap();
		provider.produce(&ctx).unwrap();

		// Assert
		assert_eq!(calls.get(), 2);
	}

	#[rstest]
	fn test_failure_restores_and_is_returned_unchanged() {
		// Arrange
		let outer = point("Outer");
		let _outer_guard = current::install(outer.clone());
		let provider = CurrentInjectionPointProvider::new(point("A"), || {
			from_fn(|_ctx: &CreationalContext| Err::<String, _>(ConnectError(7)))
		});

		// Act
		let result = provider.produce(&CreationalContext::new());

		// Assert
		assert_eq!(result, Err(ConnectError(7)));
		assert_eq!(current_injection_point(), outer);
	}

	#[rstest]
	fn test_creational_context_passed_through() {
		// Arrange
		let ctx = CreationalContext::new();
		let provider = CurrentInjectionPointProvider::new(point("A"), || {
			from_fn(|ctx: &CreationalContext| Ok::<_, Infallible>(ctx.id()))
		});

		// Act
		let id = provider.produce(&ctx).unwrap();

		// Assert
		assert_eq!(id, ctx.id());
	}

	#[rstest]
	fn test_nested_productions() {
		// Arrange
		let a = point("A");
		let b = point("B");
		let observed = RefCell::new(Vec::new());
		let log = &observed;
		let inner = CurrentInjectionPointProvider::new(b.clone(), move || {
			from_fn(move |_ctx: &CreationalContext| {
				log.borrow_mut().push(("inner", current_injection_point()));
				Ok::<_, Infallible>(())
			})
		});
		let inner = &inner;
		let outer = CurrentInjectionPointProvider::new(a.clone(), move || {
			from_fn(move |ctx: &CreationalContext| {
				let () = inner.produce(&ctx.child())?;
				log.borrow_mut().push(("after inner", current_injection_point()));
				Ok::<_, Infallible>(())
			})
		});

		// Act
		outer.produce(&CreationalContext::new()).unwrap();

		// Assert
		let observed = observed.into_inner();
		assert_eq!(observed, vec![("inner", b), ("after inner", a)]);
		assert!(current_injection_point().is_empty());
	}

	#[rstest]
	fn test_boxed_delegate() {
		// Arrange
		let a = point("A");
		type BoxedProvider = Box<dyn ReferenceProvider<InjectionPoint, Error = Infallible>>;
		let provider = CurrentInjectionPointProvider::new(a.clone(), || -> BoxedProvider {
			Box::new(InjectionPointReferenceProvider)
		});

		// Act
		let produced = provider.produce(&CreationalContext::new()).unwrap();

		// Assert
		assert_eq!(produced, a);
	}

	#[rstest]
	fn test_injection_point_provider_outside_resolution() {
		let produced = InjectionPointReferenceProvider
			.produce(&CreationalContext::new())
			.unwrap();

		assert!(produced.is_empty());
	}

	#[rstest]
	fn test_delegate_accessor_does_not_install() {
		// Arrange
		let provider = CurrentInjectionPointProvider::new(point("A"), current_injection_point);

		// Act
		let seen = provider.delegate();

		// Assert
		assert!(seen.is_empty());
	}

	mod logging {
		use super::*;
		use std::sync::Arc;
		use tracing_subscriber::layer::SubscriberExt as _;
		use tracing_subscriber::util::SubscriberInitExt as _;

		/// A tracing layer that captures log messages and their fields to a Vec<String>
		struct LogCapture {
			logs: Arc<Mutex<Vec<String>>>,
		}

		impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
			fn on_event(
				&self,
				event: &tracing::Event<'_>,
				_ctx: tracing_subscriber::layer::Context<'_, S>,
			) {
				struct MessageVisitor {
					message: String,
					fields: Vec<String>,
				}

				impl tracing::field::Visit for MessageVisitor {
					fn record_debug(
						&mut self,
						field: &tracing::field::Field,
						value: &dyn std::fmt::Debug,
					) {
						if field.name() == "message" {
							self.message = format!("{:?}", value);
						} else {
							self.fields.push(format!("{}={:?}", field.name(), value));
						}
					}
				}

				let mut visitor = MessageVisitor {
					message: String::new(),
					fields: Vec::new(),
				};
				event.record(&mut visitor);

				self.logs.lock().unwrap().push(format!(
					"[{}] {} {}",
					event.metadata().level(),
					visitor.message,
					visitor.fields.join(" ")
				));
			}
		}

		fn capture() -> (Arc<Mutex<Vec<String>>>, tracing::subscriber::DefaultGuard) {
			let logs = Arc::new(Mutex::new(Vec::new()));
			let layer = LogCapture { logs: logs.clone() };
			let guard = tracing_subscriber::registry().with(layer).set_default();
			(logs, guard)
		}

		#[rstest]
		fn test_failure_logged_at_debug() {
			// Arrange
			let (logs, _guard) = capture();
			let provider = CurrentInjectionPointProvider::new(point("A"), || {
				from_fn(|_ctx: &CreationalContext| Err::<(), _>(ConnectError(1)))
			});

			// Act
			let _ = provider.produce(&CreationalContext::new());

			// Assert
			let captured = logs.lock().unwrap();
			assert!(
				captured
					.iter()
					.any(|log| log.contains("DEBUG") && log.contains("Delegate provider failed")),
				"Expected debug log for delegate failure, but got: {:?}",
				*captured
			);
		}

		#[rstest]
		fn test_failure_logging_can_be_disabled() {
			// Arrange
			let (logs, _guard) = capture();
			let settings = Arc::new(ContextSettings {
				log_delegate_failures: false,
				..ContextSettings::default()
			});
			let provider = CurrentInjectionPointProvider::new(point("A"), || {
				from_fn(|_ctx: &CreationalContext| Err::<(), _>(ConnectError(1)))
			})
			.with_settings(settings);

			// Act
			let _ = provider.produce(&CreationalContext::new());

			// Assert
			assert!(logs.lock().unwrap().is_empty());
		}

		#[rstest]
		fn test_deep_nesting_warns() {
			// Arrange
			let (logs, _guard) = capture();
			let settings = Arc::new(ContextSettings {
				nesting_warning_threshold: 1,
				..ContextSettings::default()
			});
			let _outer = current::install(point("Outer"));
			let provider = CurrentInjectionPointProvider::new(point("A"), || {
				from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(()))
			})
			.with_settings(settings);

			// Act
			provider.produce(&CreationalContext::new()).unwrap();

			// Assert
			let captured = logs.lock().unwrap();
			assert!(
				captured
					.iter()
					.any(|log| log.contains("WARN") && log.contains("Deeply nested")),
				"Expected nesting warning, but got: {:?}",
				*captured
			);
		}

		#[rstest]
		fn test_context_switches_traced_when_enabled() {
			// Arrange
			let (logs, _guard) = capture();
			let settings = Arc::new(ContextSettings {
				trace_context_switches: true,
				..ContextSettings::default()
			});
			let provider = CurrentInjectionPointProvider::new(point("A"), || {
				from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(()))
			})
			.with_settings(settings);

			// Act
			provider.produce(&CreationalContext::new()).unwrap();

			// Assert
			let captured = logs.lock().unwrap();
			assert_eq!(
				captured
					.iter()
					.filter(|log| log.starts_with("[TRACE]"))
					.count(),
				2,
				"Expected install and restore traces, got: {:?}",
				*captured
			);
		}

		#[rstest]
		fn test_restore_trace_records_depth() {
			// Arrange
			let (logs, _guard) = capture();
			let settings = Arc::new(ContextSettings {
				trace_context_switches: true,
				..ContextSettings::default()
			});
			let provider = CurrentInjectionPointProvider::new(point("A"), || {
				from_fn(|_ctx: &CreationalContext| Ok::<_, Infallible>(()))
			})
			.with_settings(settings);

			// Act
			provider.produce(&CreationalContext::new()).unwrap();

			// Assert
			let captured = logs.lock().unwrap();
			assert!(
				captured
					.iter()
					.any(|log| {
						log.contains("Injection point installed") && log.contains("depth=1")
					}),
				"Expected install trace at depth 1, got: {:?}",
				*captured
			);
			assert!(
				captured
					.iter()
					.any(|log| {
						log.contains("Injection point restored") && log.contains("depth=0")
					}),
				"Expected restore trace at depth 0, got: {:?}",
				*captured
			);
		}

		#[cfg(feature = "async")]
		mod async_logging {
			use super::*;

			struct Ready;

			#[async_trait::async_trait]
			impl AsyncReferenceProvider<u8> for Ready {
				type Error = Infallible;

				async fn produce(&self, _ctx: &CreationalContext) -> Result<u8, Infallible> {
					Ok(7)
				}
			}

			#[rstest]
			#[tokio::test]
			async fn test_produce_async_traces_install_and_restore() {
				// Arrange
				let (logs, _guard) = capture();
				let settings = Arc::new(ContextSettings {
					trace_context_switches: true,
					..ContextSettings::default()
				});
				let provider =
					CurrentInjectionPointProvider::new(point("A"), || Ready).with_settings(settings);

				// Act
				let value: Result<u8, Infallible> =
					provider.produce_async(&CreationalContext::new()).await;

				// Assert
				assert_eq!(value, Ok(7));
				let captured = logs.lock().unwrap();
				let installed = captured
					.iter()
					.filter(|log| log.contains("Injection point installed"))
					.count();
				let restored = captured
					.iter()
					.filter(|log| {
						log.contains("Injection point restored") && log.contains("depth=0")
					})
					.count();
				assert_eq!((installed, restored), (1, 1), "Got: {:?}", *captured);
			}
		}
	}
}
