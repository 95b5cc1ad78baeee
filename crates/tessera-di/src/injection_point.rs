//! Injection-point metadata
//!
//! An [`InjectionPoint`] describes one use site of a dependency: the required
//! type, its qualifiers, the owning component and the element that declared it.
//! Instances are immutable and compared by identity, since two points at the
//! same source location but created for different calls are distinct.

use crate::annotated::{AnnotatedElement, AnnotatedField, AnnotatedParameter};
use crate::annotation::AnnotationSet;
use crate::bean::InjectableBean;
use crate::member::Member;
use crate::types::TypeDescriptor;
use once_cell::sync::{Lazy, OnceCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

static EMPTY: Lazy<InjectionPoint> =
	Lazy::new(|| InjectionPoint::builder(TypeDescriptor::any_object()).build());

struct Inner {
	required_type: TypeDescriptor,
	qualifiers: AnnotationSet,
	bean: Option<Weak<dyn InjectableBean>>,
	annotations: Option<AnnotationSet>,
	member: Option<Member>,
	position: Option<usize>,
	is_transient: bool,
	annotated: OnceCell<Option<AnnotatedElement>>,
}

/// Metadata for one use site of a dependency.
///
/// Cloning is cheap and yields the same injection point (equality is identity).
///
/// # Examples
///
/// ```
/// use tessera_di::{
///     Annotated, Annotation, AnnotationKind, AnnotationSet, FieldMember, InjectionPoint,
///     TypeDescriptor,
/// };
///
/// struct Checkout;
/// struct Payments;
///
/// let point = InjectionPoint::builder(TypeDescriptor::of::<Payments>())
///     .qualifiers(AnnotationSet::new([Annotation::named("x")]))
///     .annotations(AnnotationSet::new([Annotation::named("x")]))
///     .member(FieldMember::new(
///         TypeDescriptor::of::<Checkout>(),
///         "payments",
///         TypeDescriptor::of::<Payments>(),
///     ))
///     .build();
///
/// let annotated = point.annotated().unwrap();
/// assert!(annotated.has_annotation(&AnnotationKind::NAMED).unwrap());
/// assert!(!annotated.has_annotation(&AnnotationKind::DEFAULT).unwrap());
/// assert_eq!(point, point.clone());
/// ```
#[derive(Clone)]
pub struct InjectionPoint {
	inner: Arc<Inner>,
}

impl InjectionPoint {
	pub fn builder(required_type: TypeDescriptor) -> InjectionPointBuilder {
		InjectionPointBuilder::new(required_type)
	}

	/// The sentinel meaning "no injection point is being resolved".
	pub fn empty() -> InjectionPoint {
		EMPTY.clone()
	}

	pub fn is_empty(&self) -> bool {
		Arc::ptr_eq(&self.inner, &EMPTY.inner)
	}

	pub fn required_type(&self) -> &TypeDescriptor {
		&self.inner.required_type
	}

	pub fn qualifiers(&self) -> &AnnotationSet {
		&self.inner.qualifiers
	}

	/// The component that declared this point, if any and still alive.
	pub fn bean(&self) -> Option<Arc<dyn InjectableBean>> {
		self.inner.bean.as_ref().and_then(Weak::upgrade)
	}

	/// Alias of [`bean`](Self::bean).
	pub fn owning_bean(&self) -> Option<Arc<dyn InjectableBean>> {
		self.bean()
	}

	/// The synthetic view of the declaring element.
	///
	/// A field yields a field view; a method or constructor combined with a
	/// position yields a parameter view; anything else yields `None`. The view is
	/// synthesized on first access.
	pub fn annotated(&self) -> Option<&AnnotatedElement> {
		self.inner
			.annotated
			.get_or_init(|| synthesize_annotated(&self.inner))
			.as_ref()
	}

	pub fn member(&self) -> Option<&Member> {
		self.inner.member.as_ref()
	}

	/// Parameter position; `None` when not a parameter injection point.
	pub fn position(&self) -> Option<usize> {
		self.inner.position
	}

	pub fn is_transient(&self) -> bool {
		self.inner.is_transient
	}

	/// Decorator delegate injection points are not supported.
	pub fn is_delegate(&self) -> bool {
		false
	}
}

fn synthesize_annotated(inner: &Inner) -> Option<AnnotatedElement> {
	let member = inner.member.as_ref()?;
	if let Some(field) = member.as_field() {
		return Some(
			AnnotatedField::new(
				inner.required_type.clone(),
				inner.annotations.clone(),
				Arc::clone(field),
			)
			.into(),
		);
	}
	let executable = member.as_executable()?;
	let position = inner.position?;
	Some(
		AnnotatedParameter::new(
			inner.required_type.clone(),
			inner.annotations.clone(),
			position,
			executable,
		)
		.into(),
	)
}

impl PartialEq for InjectionPoint {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for InjectionPoint {}

impl Hash for InjectionPoint {
	fn hash<H: Hasher>(&self, state: &mut H) {
		(Arc::as_ptr(&self.inner) as *const () as usize).hash(state);
	}
}

impl fmt::Debug for InjectionPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return f.write_str("InjectionPoint(EMPTY)");
		}
		f.debug_struct("InjectionPoint")
			.field("required_type", &self.inner.required_type)
			.field("qualifiers", &self.inner.qualifiers)
			.field("bean", &self.bean().map(|b| b.identifier().to_string()))
			.field("member", &self.inner.member.as_ref().map(ToString::to_string))
			.field("position", &self.inner.position)
			.field("is_transient", &self.inner.is_transient)
			.finish()
	}
}

impl fmt::Display for InjectionPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return f.write_str("<no injection point>");
		}
		write!(f, "{} {}", self.inner.required_type, self.inner.qualifiers)?;
		if let Some(member) = &self.inner.member {
			write!(f, " at {member}")?;
			if let Some(position) = self.inner.position {
				write!(f, "#{position}")?;
			}
		}
		Ok(())
	}
}

/// Builder for [`InjectionPoint`]. Building never fails.
#[derive(Debug)]
pub struct InjectionPointBuilder {
	required_type: TypeDescriptor,
	qualifiers: AnnotationSet,
	bean: Option<Weak<dyn InjectableBean>>,
	annotations: Option<AnnotationSet>,
	member: Option<Member>,
	position: Option<usize>,
	is_transient: bool,
}

impl InjectionPointBuilder {
	fn new(required_type: TypeDescriptor) -> Self {
		Self {
			required_type,
			qualifiers: AnnotationSet::empty(),
			bean: None,
			annotations: None,
			member: None,
			position: None,
			is_transient: false,
		}
	}

	pub fn qualifiers(mut self, qualifiers: AnnotationSet) -> Self {
		self.qualifiers = qualifiers;
		self
	}

	/// Records a weak back-reference to the declaring component.
	pub fn bean<B: InjectableBean + 'static>(mut self, bean: &Arc<B>) -> Self {
		let weak = Arc::downgrade(bean) as Weak<dyn InjectableBean>;
		self.bean = Some(weak);
		self
	}

	/// Same as [`bean`](Self::bean) for an already type-erased component.
	pub fn dyn_bean(mut self, bean: &Arc<dyn InjectableBean>) -> Self {
		self.bean = Some(Arc::downgrade(bean));
		self
	}

	/// Annotations made visible through the synthetic view. Leaving them unset
	/// makes annotation lookups on the view fail rather than find nothing.
	pub fn annotations(mut self, annotations: AnnotationSet) -> Self {
		self.annotations = Some(annotations);
		self
	}

	pub fn member(mut self, member: impl Into<Member>) -> Self {
		self.member = Some(member.into());
		self
	}

	pub fn position(mut self, position: usize) -> Self {
		self.position = Some(position);
		self
	}

	pub fn transient(mut self, is_transient: bool) -> Self {
		self.is_transient = is_transient;
		self
	}

	pub fn build(self) -> InjectionPoint {
		InjectionPoint {
			inner: Arc::new(Inner {
				required_type: self.required_type,
				qualifiers: self.qualifiers,
				bean: self.bean,
				annotations: self.annotations,
				member: self.member,
				position: self.position,
				is_transient: self.is_transient,
				annotated: OnceCell::new(),
			}),
		}
	}
}
