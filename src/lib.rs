//! # Tessera
//!
//! Runtime support for a dependency-injection container: injection-point
//! context propagation and synthetic annotation metadata.
//!
//! ## Feature Flags
//!
//! - `di` (default) - Injection points, the current-injection-point register and providers
//! - `async` - Future adapter and async reference providers
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let point = InjectionPoint::builder(TypeDescriptor::of::<u32>())
//!     .qualifiers(AnnotationSet::new([Annotation::named("port")]))
//!     .build();
//!
//! let provider = CurrentInjectionPointProvider::new(point, || {
//!     from_fn(|_ctx: &CreationalContext| {
//!         let point = current_injection_point();
//!         let named_port = point.qualifiers().contains(&Annotation::named("port"));
//!         let port = if named_port { 8080 } else { 0 };
//!         Ok::<u32, std::convert::Infallible>(port)
//!     })
//! });
//!
//! assert_eq!(provider.produce(&CreationalContext::new()).unwrap(), 8080);
//! ```

#[cfg(feature = "di")]
pub use tessera_di as di;

#[cfg(feature = "di")]
pub use tessera_di::{
	ContextSettings, CreationalContext, CurrentInjectionPointProvider, DiError, DiResult,
	InjectionPoint, ReferenceProvider, current_injection_point,
};

/// Re-exports commonly used types.
#[cfg(feature = "di")]
pub mod prelude {
	pub use tessera_di::{
		Annotated, AnnotatedCallable, AnnotatedElement, AnnotatedMember, Annotation,
		AnnotationKind, AnnotationSet, ContextSettings, CreationalContext,
		CurrentInjectionPointProvider, DiError, DiResult, InjectableBean, InjectionPoint,
		InjectionPointReferenceProvider, Member, ReferenceProvider, TypeDescriptor,
		current_injection_point, from_fn, require_current_injection_point,
	};

	#[cfg(feature = "async")]
	pub use tessera_di::{AsyncReferenceProvider, InjectionPointFutureExt, WithInjectionPoint};
}
