//! Owning-component interface
//!
//! Components are owned by the registry. Injection points only keep a weak
//! back-reference to the component that declared them.

use crate::annotation::AnnotationSet;
use crate::types::TypeDescriptor;
use std::fmt;

/// Lifecycle scope of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeanScope {
	/// A fresh instance per injection point
	Dependent,
	/// One instance per request
	Request,
	/// One shared instance per container
	Singleton,
}

/// A component known to the registry.
///
/// Only the accessors needed for diagnostics and qualifier-driven behavior are
/// part of this interface; creation and destruction stay with the registry.
pub trait InjectableBean: Send + Sync + fmt::Debug {
	/// Stable identifier, unique within the container.
	fn identifier(&self) -> &str;

	/// The implementation type.
	fn bean_class(&self) -> &TypeDescriptor;

	/// Types this component can be injected as.
	fn types(&self) -> Vec<TypeDescriptor> {
		vec![self.bean_class().clone()]
	}

	fn qualifiers(&self) -> AnnotationSet {
		AnnotationSet::default_qualifiers()
	}

	fn scope(&self) -> BeanScope {
		BeanScope::Dependent
	}
}
