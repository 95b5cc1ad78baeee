//! Synthetic annotated-element views
//!
//! These views mimic the shape of a full reflective "annotated element" API but
//! implement only what the container needs at runtime:
//!
//! - annotation lookup over the small synthetic set supplied for one injection point
//! - static-ness of fields and methods
//! - the declaring type, and for parameters the declaring method or constructor
//!
//! Everything else (type closure, member enumeration, parameter lists) fails
//! with [`DiError::UnsupportedCapability`]. Callers that need those answers must
//! use the registry's build-time metadata.
//!
//! A view built without an annotation set is different from a view built with
//! an empty one: lookups on the former fail, lookups on the latter find nothing.
//!
//! # Examples
//!
//! ```
//! use tessera_di::{
//!     Annotated, AnnotatedField, Annotation, AnnotationKind, AnnotationSet, FieldMember,
//!     TypeDescriptor,
//! };
//! use std::sync::Arc;
//!
//! struct Checkout;
//! struct Payments;
//!
//! let field = Arc::new(FieldMember::new(
//!     TypeDescriptor::of::<Checkout>(),
//!     "payments",
//!     TypeDescriptor::of::<Payments>(),
//! ));
//! let view = AnnotatedField::new(
//!     TypeDescriptor::of::<Payments>(),
//!     Some(AnnotationSet::new([Annotation::named("stripe")])),
//!     field,
//! );
//!
//! assert!(view.has_annotation(&AnnotationKind::NAMED).unwrap());
//! assert!(!view.has_annotation(&AnnotationKind::DEFAULT).unwrap());
//! assert!(view.type_closure().is_err());
//! ```

use crate::annotation::{Annotation, AnnotationKind, AnnotationSet};
use crate::error::{DiError, DiResult};
use crate::member::{ConstructorMember, Executable, FieldMember, MethodMember};
use crate::types::TypeDescriptor;
use std::fmt;
use std::sync::Arc;

/// Capabilities shared by every synthetic view.
pub trait Annotated {
	/// The static type associated with the view.
	fn base_type(&self) -> &TypeDescriptor;

	/// The synthetic annotation set, or `None` when the view was built without one.
	fn synthetic_annotations(&self) -> Option<&AnnotationSet>;

	/// Human-readable description used in error messages.
	fn describe(&self) -> String;

	/// Full generic type hierarchy. Never available on synthetic views.
	fn type_closure(&self) -> DiResult<Vec<TypeDescriptor>> {
		Err(DiError::unsupported("type_closure", self.describe()))
	}

	/// The whole synthetic annotation set.
	fn annotations(&self) -> DiResult<&AnnotationSet> {
		self.synthetic_annotations()
			.ok_or_else(|| DiError::unsupported("annotations", self.describe()))
	}

	/// First annotation of `kind`, or `None` when absent from the synthetic set.
	fn annotation(&self, kind: &AnnotationKind) -> DiResult<Option<&Annotation>> {
		let annotations = self
			.synthetic_annotations()
			.ok_or_else(|| DiError::unsupported("annotation", self.describe()))?;
		Ok(annotations.first_of(kind))
	}

	/// Every annotation of `kind` (possibly none).
	fn annotations_of(&self, kind: &AnnotationKind) -> DiResult<AnnotationSet> {
		let annotations = self
			.synthetic_annotations()
			.ok_or_else(|| DiError::unsupported("annotations_of", self.describe()))?;
		Ok(annotations.all_of(kind))
	}

	fn has_annotation(&self, kind: &AnnotationKind) -> DiResult<bool> {
		Ok(self.annotation(kind)?.is_some())
	}
}

/// Views over a member of a type (field, method, constructor).
pub trait AnnotatedMember: Annotated {
	fn is_static(&self) -> bool;

	/// Synthesizes a view of the declaring type. A new view is built on every call.
	fn declaring_type(&self) -> AnnotatedType;
}

/// Views over a method or constructor.
pub trait AnnotatedCallable: AnnotatedMember {
	/// Parameter enumeration. Never available on synthetic views.
	fn parameters(&self) -> DiResult<Vec<AnnotatedParameter>> {
		Err(DiError::unsupported("parameters", self.describe()))
	}
}

/// View over an injected field.
#[derive(Debug, Clone)]
pub struct AnnotatedField {
	base_type: TypeDescriptor,
	annotations: Option<AnnotationSet>,
	field: Arc<FieldMember>,
}

impl AnnotatedField {
	pub fn new(
		base_type: TypeDescriptor,
		annotations: Option<AnnotationSet>,
		field: Arc<FieldMember>,
	) -> Self {
		Self {
			base_type,
			annotations,
			field,
		}
	}

	pub fn member(&self) -> &FieldMember {
		&self.field
	}
}

impl Annotated for AnnotatedField {
	fn base_type(&self) -> &TypeDescriptor {
		&self.base_type
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		self.annotations.as_ref()
	}

	fn describe(&self) -> String {
		format!(
			"field view of `{}::{}`",
			self.field.declaring_type(),
			self.field.name()
		)
	}
}

impl AnnotatedMember for AnnotatedField {
	fn is_static(&self) -> bool {
		self.field.is_static()
	}

	fn declaring_type(&self) -> AnnotatedType {
		AnnotatedType::new(self.field.declaring_type().clone())
	}
}

/// View over an injected method or constructor parameter.
#[derive(Debug, Clone)]
pub struct AnnotatedParameter {
	base_type: TypeDescriptor,
	annotations: Option<AnnotationSet>,
	position: usize,
	executable: Executable,
}

impl AnnotatedParameter {
	pub fn new(
		base_type: TypeDescriptor,
		annotations: Option<AnnotationSet>,
		position: usize,
		executable: Executable,
	) -> Self {
		Self {
			base_type,
			annotations,
			position,
			executable,
		}
	}

	/// Zero-based position in the declaring callable's parameter list.
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn executable(&self) -> &Executable {
		&self.executable
	}

	/// Synthesizes a method or constructor view, matching the executable's kind.
	pub fn declaring_callable(&self) -> AnnotatedCallableElement {
		match &self.executable {
			Executable::Method(method) => {
				AnnotatedCallableElement::Method(AnnotatedMethod::new(Arc::clone(method)))
			}
			Executable::Constructor(constructor) => AnnotatedCallableElement::Constructor(
				AnnotatedConstructor::new(Arc::clone(constructor)),
			),
		}
	}
}

impl Annotated for AnnotatedParameter {
	fn base_type(&self) -> &TypeDescriptor {
		&self.base_type
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		self.annotations.as_ref()
	}

	fn describe(&self) -> String {
		let callable = match &self.executable {
			Executable::Method(method) => method.name(),
			Executable::Constructor(_) => "new",
		};
		format!(
			"parameter view #{} of `{}::{}`",
			self.position,
			self.executable.declaring_type(),
			callable
		)
	}
}

/// View over a method. Carries no annotation set; its base type is the return type.
#[derive(Debug, Clone)]
pub struct AnnotatedMethod {
	method: Arc<MethodMember>,
}

impl AnnotatedMethod {
	pub fn new(method: Arc<MethodMember>) -> Self {
		Self { method }
	}

	pub fn member(&self) -> &MethodMember {
		&self.method
	}
}

impl Annotated for AnnotatedMethod {
	fn base_type(&self) -> &TypeDescriptor {
		self.method.return_type()
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		None
	}

	fn describe(&self) -> String {
		format!(
			"method view of `{}::{}`",
			self.method.declaring_type(),
			self.method.name()
		)
	}
}

impl AnnotatedMember for AnnotatedMethod {
	fn is_static(&self) -> bool {
		self.method.is_static()
	}

	fn declaring_type(&self) -> AnnotatedType {
		AnnotatedType::new(self.method.declaring_type().clone())
	}
}

impl AnnotatedCallable for AnnotatedMethod {}

/// View over a constructor. Carries no annotation set; its base type is the declaring type.
#[derive(Debug, Clone)]
pub struct AnnotatedConstructor {
	constructor: Arc<ConstructorMember>,
}

impl AnnotatedConstructor {
	pub fn new(constructor: Arc<ConstructorMember>) -> Self {
		Self { constructor }
	}

	pub fn member(&self) -> &ConstructorMember {
		&self.constructor
	}
}

impl Annotated for AnnotatedConstructor {
	fn base_type(&self) -> &TypeDescriptor {
		self.constructor.declaring_type()
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		None
	}

	fn describe(&self) -> String {
		format!("constructor view of `{}`", self.constructor.declaring_type())
	}
}

impl AnnotatedMember for AnnotatedConstructor {
	fn is_static(&self) -> bool {
		false
	}

	fn declaring_type(&self) -> AnnotatedType {
		AnnotatedType::new(self.constructor.declaring_type().clone())
	}
}

impl AnnotatedCallable for AnnotatedConstructor {}

/// View over a declaring type. Carries no annotation set and enumerates nothing.
#[derive(Debug, Clone)]
pub struct AnnotatedType {
	ty: TypeDescriptor,
}

impl AnnotatedType {
	pub fn new(ty: TypeDescriptor) -> Self {
		Self { ty }
	}

	pub fn type_descriptor(&self) -> &TypeDescriptor {
		&self.ty
	}

	pub fn constructors(&self) -> DiResult<Vec<AnnotatedConstructor>> {
		Err(DiError::unsupported("constructors", self.describe()))
	}

	pub fn methods(&self) -> DiResult<Vec<AnnotatedMethod>> {
		Err(DiError::unsupported("methods", self.describe()))
	}

	pub fn fields(&self) -> DiResult<Vec<AnnotatedField>> {
		Err(DiError::unsupported("fields", self.describe()))
	}
}

impl Annotated for AnnotatedType {
	fn base_type(&self) -> &TypeDescriptor {
		&self.ty
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		None
	}

	fn describe(&self) -> String {
		format!("type view of `{}`", self.ty)
	}
}

/// Closed set of synthetic views.
#[derive(Debug, Clone)]
pub enum AnnotatedElement {
	Field(AnnotatedField),
	Parameter(AnnotatedParameter),
	Method(AnnotatedMethod),
	Constructor(AnnotatedConstructor),
	Type(AnnotatedType),
}

impl AnnotatedElement {
	fn as_annotated(&self) -> &dyn Annotated {
		match self {
			Self::Field(view) => view,
			Self::Parameter(view) => view,
			Self::Method(view) => view,
			Self::Constructor(view) => view,
			Self::Type(view) => view,
		}
	}

	/// The view as a member view; `None` for parameter and type views.
	pub fn as_member(&self) -> Option<&dyn AnnotatedMember> {
		match self {
			Self::Field(view) => Some(view as &dyn AnnotatedMember),
			Self::Method(view) => Some(view as &dyn AnnotatedMember),
			Self::Constructor(view) => Some(view as &dyn AnnotatedMember),
			Self::Parameter(_) | Self::Type(_) => None,
		}
	}

	pub fn as_field(&self) -> Option<&AnnotatedField> {
		match self {
			Self::Field(view) => Some(view),
			_ => None,
		}
	}

	pub fn as_parameter(&self) -> Option<&AnnotatedParameter> {
		match self {
			Self::Parameter(view) => Some(view),
			_ => None,
		}
	}
}

impl Annotated for AnnotatedElement {
	fn base_type(&self) -> &TypeDescriptor {
		self.as_annotated().base_type()
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		self.as_annotated().synthetic_annotations()
	}

	fn describe(&self) -> String {
		self.as_annotated().describe()
	}
}

impl fmt::Display for AnnotatedElement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}

impl From<AnnotatedField> for AnnotatedElement {
	fn from(view: AnnotatedField) -> Self {
		Self::Field(view)
	}
}

impl From<AnnotatedParameter> for AnnotatedElement {
	fn from(view: AnnotatedParameter) -> Self {
		Self::Parameter(view)
	}
}

impl From<AnnotatedType> for AnnotatedElement {
	fn from(view: AnnotatedType) -> Self {
		Self::Type(view)
	}
}

/// The declaring callable of a parameter view.
#[derive(Debug, Clone)]
pub enum AnnotatedCallableElement {
	Method(AnnotatedMethod),
	Constructor(AnnotatedConstructor),
}

impl AnnotatedCallableElement {
	fn as_callable(&self) -> &dyn AnnotatedCallable {
		match self {
			Self::Method(view) => view,
			Self::Constructor(view) => view,
		}
	}
}

impl Annotated for AnnotatedCallableElement {
	fn base_type(&self) -> &TypeDescriptor {
		self.as_callable().base_type()
	}

	fn synthetic_annotations(&self) -> Option<&AnnotationSet> {
		None
	}

	fn describe(&self) -> String {
		self.as_callable().describe()
	}
}

impl AnnotatedMember for AnnotatedCallableElement {
	fn is_static(&self) -> bool {
		self.as_callable().is_static()
	}

	fn declaring_type(&self) -> AnnotatedType {
		self.as_callable().declaring_type()
	}
}

impl AnnotatedCallable for AnnotatedCallableElement {}

impl From<AnnotatedCallableElement> for AnnotatedElement {
	fn from(view: AnnotatedCallableElement) -> Self {
		match view {
			AnnotatedCallableElement::Method(method) => Self::Method(method),
			AnnotatedCallableElement::Constructor(constructor) => Self::Constructor(constructor),
		}
	}
}
