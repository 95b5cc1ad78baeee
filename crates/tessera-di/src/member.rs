//! Program-element identity
//!
//! A [`Member`] names the element that declared an injection point. It is used
//! to pick the synthetic view and for equality/debugging, never for general
//! reflection.

use crate::types::TypeDescriptor;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A field of a component type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldMember {
	declaring_type: TypeDescriptor,
	name: Cow<'static, str>,
	field_type: TypeDescriptor,
	is_static: bool,
}

impl FieldMember {
	pub fn new(
		declaring_type: TypeDescriptor,
		name: impl Into<Cow<'static, str>>,
		field_type: TypeDescriptor,
	) -> Self {
		Self {
			declaring_type,
			name: name.into(),
			field_type,
			is_static: false,
		}
	}

	pub fn with_static(mut self, is_static: bool) -> Self {
		self.is_static = is_static;
		self
	}

	pub fn declaring_type(&self) -> &TypeDescriptor {
		&self.declaring_type
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_type(&self) -> &TypeDescriptor {
		&self.field_type
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}
}

/// A method (initializer, producer, observer...) of a component type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodMember {
	declaring_type: TypeDescriptor,
	name: Cow<'static, str>,
	return_type: TypeDescriptor,
	parameter_types: Vec<TypeDescriptor>,
	is_static: bool,
}

impl MethodMember {
	pub fn new(
		declaring_type: TypeDescriptor,
		name: impl Into<Cow<'static, str>>,
		return_type: TypeDescriptor,
	) -> Self {
		Self {
			declaring_type,
			name: name.into(),
			return_type,
			parameter_types: Vec::new(),
			is_static: false,
		}
	}

	pub fn with_parameters(
		mut self,
		parameter_types: impl IntoIterator<Item = TypeDescriptor>,
	) -> Self {
		self.parameter_types = parameter_types.into_iter().collect();
		self
	}

	pub fn with_static(mut self, is_static: bool) -> Self {
		self.is_static = is_static;
		self
	}

	pub fn declaring_type(&self) -> &TypeDescriptor {
		&self.declaring_type
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn return_type(&self) -> &TypeDescriptor {
		&self.return_type
	}

	pub fn parameter_types(&self) -> &[TypeDescriptor] {
		&self.parameter_types
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}
}

/// A constructor of a component type. Constructors are never static.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorMember {
	declaring_type: TypeDescriptor,
	parameter_types: Vec<TypeDescriptor>,
}

impl ConstructorMember {
	pub fn new(declaring_type: TypeDescriptor) -> Self {
		Self {
			declaring_type,
			parameter_types: Vec::new(),
		}
	}

	pub fn with_parameters(
		mut self,
		parameter_types: impl IntoIterator<Item = TypeDescriptor>,
	) -> Self {
		self.parameter_types = parameter_types.into_iter().collect();
		self
	}

	pub fn declaring_type(&self) -> &TypeDescriptor {
		&self.declaring_type
	}

	pub fn parameter_types(&self) -> &[TypeDescriptor] {
		&self.parameter_types
	}
}

/// Coarse classification of a [`Member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
	Field,
	Method,
	Constructor,
	Synthetic,
}

/// The program element that declared an injection point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
	Field(Arc<FieldMember>),
	Method(Arc<MethodMember>),
	Constructor(Arc<ConstructorMember>),
	/// Any other element (for example a component-level lookup). No annotated
	/// view is ever synthesized for it.
	Synthetic {
		declaring_type: TypeDescriptor,
		name: Cow<'static, str>,
	},
}

impl Member {
	pub fn synthetic(declaring_type: TypeDescriptor, name: impl Into<Cow<'static, str>>) -> Self {
		Self::Synthetic {
			declaring_type,
			name: name.into(),
		}
	}

	pub fn kind(&self) -> MemberKind {
		match self {
			Self::Field(_) => MemberKind::Field,
			Self::Method(_) => MemberKind::Method,
			Self::Constructor(_) => MemberKind::Constructor,
			Self::Synthetic { .. } => MemberKind::Synthetic,
		}
	}

	pub fn declaring_type(&self) -> &TypeDescriptor {
		match self {
			Self::Field(field) => field.declaring_type(),
			Self::Method(method) => method.declaring_type(),
			Self::Constructor(constructor) => constructor.declaring_type(),
			Self::Synthetic { declaring_type, .. } => declaring_type,
		}
	}

	/// Simple name; constructors are reported as `new`.
	pub fn name(&self) -> &str {
		match self {
			Self::Field(field) => field.name(),
			Self::Method(method) => method.name(),
			Self::Constructor(_) => "new",
			Self::Synthetic { name, .. } => name,
		}
	}

	pub fn as_field(&self) -> Option<&Arc<FieldMember>> {
		match self {
			Self::Field(field) => Some(field),
			_ => None,
		}
	}

	/// The parameter-bearing executable, if this member is one.
	pub fn as_executable(&self) -> Option<Executable> {
		match self {
			Self::Method(method) => Some(Executable::Method(Arc::clone(method))),
			Self::Constructor(constructor) => {
				Some(Executable::Constructor(Arc::clone(constructor)))
			}
			_ => None,
		}
	}
}

impl From<FieldMember> for Member {
	fn from(field: FieldMember) -> Self {
		Self::Field(Arc::new(field))
	}
}

impl From<MethodMember> for Member {
	fn from(method: MethodMember) -> Self {
		Self::Method(Arc::new(method))
	}
}

impl From<ConstructorMember> for Member {
	fn from(constructor: ConstructorMember) -> Self {
		Self::Constructor(Arc::new(constructor))
	}
}

impl From<Arc<FieldMember>> for Member {
	fn from(field: Arc<FieldMember>) -> Self {
		Self::Field(field)
	}
}

impl From<Arc<MethodMember>> for Member {
	fn from(method: Arc<MethodMember>) -> Self {
		Self::Method(method)
	}
}

impl From<Arc<ConstructorMember>> for Member {
	fn from(constructor: Arc<ConstructorMember>) -> Self {
		Self::Constructor(constructor)
	}
}

impl fmt::Display for Member {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.declaring_type(), self.name())
	}
}

/// A method or constructor: the owner of a parameter injection point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Executable {
	Method(Arc<MethodMember>),
	Constructor(Arc<ConstructorMember>),
}

impl Executable {
	pub fn declaring_type(&self) -> &TypeDescriptor {
		match self {
			Self::Method(method) => method.declaring_type(),
			Self::Constructor(constructor) => constructor.declaring_type(),
		}
	}

	pub fn parameter_types(&self) -> &[TypeDescriptor] {
		match self {
			Self::Method(method) => method.parameter_types(),
			Self::Constructor(constructor) => constructor.parameter_types(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct OrderService;
	struct Repo;

	#[rstest]
	fn test_member_kinds() {
		// Arrange
		let field: Member = FieldMember::new(
			TypeDescriptor::of::<OrderService>(),
			"repo",
			TypeDescriptor::of::<Repo>(),
		)
		.into();
		let ctor: Member = ConstructorMember::new(TypeDescriptor::of::<OrderService>()).into();
		let synthetic = Member::synthetic(TypeDescriptor::of::<OrderService>(), "health");

		// Assert
		assert_eq!(field.kind(), MemberKind::Field);
		assert_eq!(ctor.kind(), MemberKind::Constructor);
		assert_eq!(synthetic.kind(), MemberKind::Synthetic);
		assert_eq!(ctor.name(), "new");
	}

	#[rstest]
	fn test_only_methods_and_constructors_are_executables() {
		// Arrange
		let method: Member = MethodMember::new(
			TypeDescriptor::of::<OrderService>(),
			"init",
			TypeDescriptor::of::<()>(),
		)
		.with_parameters([TypeDescriptor::of::<Repo>()])
		.into();
		let field: Member = FieldMember::new(
			TypeDescriptor::of::<OrderService>(),
			"repo",
			TypeDescriptor::of::<Repo>(),
		)
		.into();

		// Act
		let executable = method.as_executable();

		// Assert
		assert!(matches!(executable, Some(Executable::Method(_))));
		assert_eq!(executable.unwrap().parameter_types().len(), 1);
		assert!(field.as_executable().is_none());
		assert!(field.as_field().is_some());
	}

	#[rstest]
	fn test_display_qualifies_with_declaring_type() {
		let member = Member::synthetic(TypeDescriptor::named("app.Orders"), "health");

		assert_eq!(member.to_string(), "app.Orders::health");
	}
}
