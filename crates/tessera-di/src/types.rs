//! Type descriptors

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;

/// Identifies a declared type at runtime.
///
/// A descriptor carries a display name and, when it was built from a Rust
/// type, that type's [`TypeId`]. Descriptors created with [`TypeDescriptor::named`]
/// describe types known only by name (for example types coming from build-time
/// metadata) and never compare equal to a descriptor built with
/// [`TypeDescriptor::of`], even when the names match.
///
/// # Examples
///
/// ```
/// use tessera_di::TypeDescriptor;
///
/// let ty = TypeDescriptor::of::<String>();
/// assert!(ty.is::<String>());
/// assert_eq!(ty.name(), "alloc::string::String");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
	name: Cow<'static, str>,
	type_id: Option<TypeId>,
}

impl TypeDescriptor {
	/// Describes the Rust type `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			name: Cow::Borrowed(std::any::type_name::<T>()),
			type_id: Some(TypeId::of::<T>()),
		}
	}

	/// Describes a type known only by name.
	pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			type_id: None,
		}
	}

	/// The "any object" type, used as the required type of the empty injection point.
	pub fn any_object() -> Self {
		Self::of::<dyn Any>()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_id(&self) -> Option<TypeId> {
		self.type_id
	}

	/// Returns `true` if this descriptor was built from `T`.
	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.type_id == Some(TypeId::of::<T>())
	}
}

impl fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeDescriptor({})", self.name)
	}
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}
