//! # Tessera Dependency Injection
//!
//! Injection-point context for dependency resolution.
//!
//! While a dependent value is being produced, the code producing it can ask
//! *where* the value is going to be injected: the required type, qualifiers,
//! owning bean, declaring member and parameter position. This crate provides:
//!
//! - **Injection points**: immutable descriptors of one injection site ([`InjectionPoint`])
//! - **Current context**: a per-thread register with scoped install/restore ([`current`])
//! - **Context-scoped provider**: a provider wrapper that makes an injection point
//!   current around a lazily resolved delegate ([`CurrentInjectionPointProvider`])
//! - **Annotated views**: synthetic reflection metadata for injection sites ([`annotated`])
//!
//! ## Async support (async feature)
//!
//! With the `async` feature, [`WithInjectionPoint`] makes an injection point current
//! around every poll of a future, and [`CurrentInjectionPointProvider::produce_async`]
//! drives an [`AsyncReferenceProvider`] delegate.
//!
//! ## Example
//!
//! ```rust
//! use tessera_di::{
//!     Annotated, Annotation, AnnotationKind, AnnotationSet, CreationalContext,
//!     CurrentInjectionPointProvider, FieldMember, InjectionPoint, ReferenceProvider,
//!     TypeDescriptor, current_injection_point, from_fn,
//! };
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! let field = Arc::new(FieldMember::new(
//!     TypeDescriptor::named("app::Service"),
//!     "greeting",
//!     TypeDescriptor::of::<String>(),
//! ));
//! let point = InjectionPoint::builder(TypeDescriptor::of::<String>())
//!     .annotations(AnnotationSet::new([Annotation::named("greeting")]))
//!     .member(field)
//!     .build();
//!
//! let provider = CurrentInjectionPointProvider::new(point, || {
//!     from_fn(|_ctx: &CreationalContext| {
//!         let point = current_injection_point();
//!         let annotated = point.annotated().expect("field injection point");
//!         let named = annotated
//!             .annotation(&AnnotationKind::NAMED)
//!             .unwrap()
//!             .and_then(|a| a.value())
//!             .and_then(|v| v.as_str().map(str::to_owned));
//!         Ok::<_, Infallible>(format!("hello from {}", named.unwrap_or_default()))
//!     })
//! });
//!
//! let value = provider.produce(&CreationalContext::new()).unwrap();
//! assert_eq!(value, "hello from greeting");
//! ```

pub mod annotated;
pub mod annotation;
pub mod bean;
pub mod creational;
pub mod current;
pub mod error;
pub mod injection_point;
pub mod member;
pub mod provider;
pub mod settings;
pub mod types;

pub use annotated::{
	Annotated, AnnotatedCallable, AnnotatedCallableElement, AnnotatedConstructor,
	AnnotatedElement, AnnotatedField, AnnotatedMember, AnnotatedMethod, AnnotatedParameter,
	AnnotatedType,
};
pub use annotation::{Annotation, AnnotationKind, AnnotationSet, AnnotationValue};
pub use bean::{BeanScope, InjectableBean};
pub use creational::CreationalContext;
pub use current::{
	InjectionPointGuard, current_injection_point, require_current_injection_point,
};
pub use error::{DiError, DiResult, SettingsError};
pub use injection_point::{InjectionPoint, InjectionPointBuilder};
pub use member::{
	ConstructorMember, Executable, FieldMember, Member, MemberKind, MethodMember,
};
pub use provider::{
	CurrentInjectionPointProvider, FnProvider, InjectionPointReferenceProvider,
	ReferenceProvider, from_fn,
};
pub use settings::ContextSettings;
pub use types::TypeDescriptor;

#[cfg(feature = "async")]
pub use current::{InjectionPointFutureExt, WithInjectionPoint};
#[cfg(feature = "async")]
pub use provider::AsyncReferenceProvider;
