//! Annotation instances and immutable annotation sets
//!
//! Annotations are plain values here: a kind plus named members. Qualifiers are
//! annotations too, and both are grouped in an [`AnnotationSet`], which has set
//! semantics (duplicates collapse, order is irrelevant).

use crate::types::TypeDescriptor;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The type of an annotation, e.g. `Named` or `Default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationKind(Cow<'static, str>);

impl AnnotationKind {
	/// Built-in qualifier selecting a component by name.
	pub const NAMED: AnnotationKind = AnnotationKind::from_static("Named");
	/// Built-in qualifier present on every component that declares no other qualifier.
	pub const DEFAULT: AnnotationKind = AnnotationKind::from_static("Default");
	/// Built-in qualifier every component carries.
	pub const ANY: AnnotationKind = AnnotationKind::from_static("Any");

	pub const fn from_static(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self(name.into())
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AnnotationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Value of an annotation member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationValue {
	Bool(bool),
	Int(i64),
	Str(Cow<'static, str>),
	Type(TypeDescriptor),
	Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}
}

impl fmt::Display for AnnotationValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Str(s) => write!(f, "{s:?}"),
			Self::Type(ty) => write!(f, "{ty}"),
			Self::Array(values) => {
				f.write_str("{")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{value}")?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<bool> for AnnotationValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for AnnotationValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&'static str> for AnnotationValue {
	fn from(value: &'static str) -> Self {
		Self::Str(Cow::Borrowed(value))
	}
}

impl From<String> for AnnotationValue {
	fn from(value: String) -> Self {
		Self::Str(Cow::Owned(value))
	}
}

impl From<TypeDescriptor> for AnnotationValue {
	fn from(value: TypeDescriptor) -> Self {
		Self::Type(value)
	}
}

/// An annotation instance.
///
/// # Examples
///
/// ```
/// use tessera_di::{Annotation, AnnotationKind};
///
/// let named = Annotation::named("primary");
/// assert_eq!(named.kind(), &AnnotationKind::NAMED);
/// assert_eq!(named.value().and_then(|v| v.as_str()), Some("primary"));
/// assert_eq!(named.to_string(), "@Named(value = \"primary\")");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Annotation {
	kind: AnnotationKind,
	members: BTreeMap<Cow<'static, str>, AnnotationValue>,
}

impl Annotation {
	pub fn new(kind: AnnotationKind) -> Self {
		Self {
			kind,
			members: BTreeMap::new(),
		}
	}

	/// Adds (or replaces) a member value.
	pub fn with_member(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<AnnotationValue>,
	) -> Self {
		self.members.insert(name.into(), value.into());
		self
	}

	/// `@Named(value)`
	pub fn named(value: impl Into<AnnotationValue>) -> Self {
		Self::new(AnnotationKind::NAMED).with_member("value", value)
	}

	/// `@Default`
	pub fn default_qualifier() -> Self {
		Self::new(AnnotationKind::DEFAULT)
	}

	/// `@Any`
	pub fn any() -> Self {
		Self::new(AnnotationKind::ANY)
	}

	pub fn kind(&self) -> &AnnotationKind {
		&self.kind
	}

	pub fn is(&self, kind: &AnnotationKind) -> bool {
		&self.kind == kind
	}

	pub fn member(&self, name: &str) -> Option<&AnnotationValue> {
		self.members.get(name)
	}

	/// Shorthand for the conventional `value` member.
	pub fn value(&self) -> Option<&AnnotationValue> {
		self.member("value")
	}

	pub fn members(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
		self.members.iter().map(|(k, v)| (&**k, v))
	}
}

impl fmt::Display for Annotation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "@{}", self.kind)?;
		if self.members.is_empty() {
			return Ok(());
		}
		f.write_str("(")?;
		for (i, (name, value)) in self.members.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{name} = {value}")?;
		}
		f.write_str(")")
	}
}

/// Immutable small set of annotations.
///
/// Cloning is cheap (the backing storage is shared). Two sets are equal when
/// they contain the same annotations, regardless of insertion order.
///
/// # Examples
///
/// ```
/// use tessera_di::{Annotation, AnnotationSet};
///
/// let a: AnnotationSet = [Annotation::named("x"), Annotation::default_qualifier()]
///     .into_iter()
///     .collect();
/// let b: AnnotationSet = [
///     Annotation::default_qualifier(),
///     Annotation::named("x"),
///     Annotation::named("x"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(a, b);
/// assert_eq!(b.len(), 2);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AnnotationSet(Arc<[Annotation]>);

impl AnnotationSet {
	pub fn new(annotations: impl IntoIterator<Item = Annotation>) -> Self {
		let mut annotations: Vec<Annotation> = annotations.into_iter().collect();
		annotations.sort();
		annotations.dedup();
		Self(Arc::from(annotations))
	}

	pub fn empty() -> Self {
		Self(Arc::from(Vec::new()))
	}

	/// `{@Any, @Default}`, the qualifiers of a component that declares none.
	pub fn default_qualifiers() -> Self {
		Self::new([Annotation::any(), Annotation::default_qualifier()])
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
		self.0.iter()
	}

	pub fn contains(&self, annotation: &Annotation) -> bool {
		self.0.binary_search(annotation).is_ok()
	}

	/// First annotation of the given kind.
	pub fn first_of(&self, kind: &AnnotationKind) -> Option<&Annotation> {
		self.0.iter().find(|a| a.is(kind))
	}

	/// All annotations of the given kind.
	pub fn all_of(&self, kind: &AnnotationKind) -> AnnotationSet {
		Self::new(self.0.iter().filter(|a| a.is(kind)).cloned())
	}

	pub fn contains_kind(&self, kind: &AnnotationKind) -> bool {
		self.first_of(kind).is_some()
	}
}

impl Default for AnnotationSet {
	fn default() -> Self {
		Self::empty()
	}
}

impl fmt::Debug for AnnotationSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.0.iter()).finish()
	}
}

impl fmt::Display for AnnotationSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, annotation) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{annotation}")?;
		}
		f.write_str("]")
	}
}

impl FromIterator<Annotation> for AnnotationSet {
	fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
		Self::new(iter)
	}
}

impl<'a> IntoIterator for &'a AnnotationSet {
	type Item = &'a Annotation;
	type IntoIter = std::slice::Iter<'a, Annotation>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
