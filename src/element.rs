//! Immutable descriptions of desired host nodes.

use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
};
use hashbrown::HashMap;
use std::rc::Rc;

/// Debug name of the reserved text node type.
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";

/// Property key through which text nodes receive their content.
pub const NODE_VALUE: &str = "nodeValue";

/// What kind of host node an [`Element`] describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
	/// The reserved text node type.
	Text,
	/// An element node with the given tag.
	Tag(Rc<str>),
}
impl ElementType {
	#[must_use]
	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text)
	}
}
impl From<&str> for ElementType {
	fn from(tag: &str) -> Self {
		if tag == TEXT_ELEMENT {
			Self::Text
		} else {
			Self::Tag(tag.into())
		}
	}
}
impl From<String> for ElementType {
	fn from(tag: String) -> Self {
		tag.as_str().into()
	}
}
impl Display for ElementType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text => f.write_str(TEXT_ELEMENT),
			Self::Tag(tag) => f.write_str(tag),
		}
	}
}

/// A plain (non-listener) property value.
///
/// Numbers compare by bit pattern, so `NaN` equals itself and isn't reassigned on each render,
/// while `0.0` and `-0.0` are distinct.
#[derive(Debug, Clone)]
pub enum Value {
	String(Rc<str>),
	Bool(bool),
	Number(f64),
}
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
			_ => false,
		}
	}
}
impl Eq for Value {}
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(string) => f.write_str(string),
			Self::Bool(value) => Display::fmt(value, f),
			Self::Number(number) => Display::fmt(number, f),
		}
	}
}
impl From<&str> for Value {
	fn from(string: &str) -> Self {
		Self::String(string.into())
	}
}
impl From<String> for Value {
	fn from(string: String) -> Self {
		Self::String(string.into())
	}
}
impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<f64> for Value {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}
impl From<i32> for Value {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

/// An event handler.
///
/// Listeners compare by identity: Two clones of the same [`Listener`] are equal,
/// two listeners created from identical closures are not.
///
/// The payload is whatever the host dispatches, e.g. a [`web_sys::Event`] for [`DomHost`](`crate::host::dom::DomHost`).
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);
impl Listener {
	pub fn new(handler: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, payload: &dyn Any) {
		(self.0)(payload)
	}

	/// An identity that stays stable for all clones of this listener.
	#[must_use]
	pub fn id(&self) -> ListenerId {
		ListenerId(Rc::as_ptr(&self.0) as *const () as usize)
	}
}
impl PartialEq for Listener {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}
impl Debug for Listener {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Listener").field(&self.id()).finish()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// A single entry of a [`Props`] bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
	Value(Value),
	Listener(Listener),
}

/// The property bag of an [`Element`], including its ordered children.
///
/// Keys are passed to the host uninterpreted.
/// Listener keys conventionally carry an `on` prefix, see [`event_name`](`crate::host::event_name`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
	entries: HashMap<Rc<str>, Property>,
	children: Vec<Element>,
}
impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a plain property.
	#[must_use]
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.insert(key, Property::Value(value.into()));
		self
	}

	/// Adds or replaces a listener, e.g. `.listener("onClick", …)`.
	#[must_use]
	pub fn listener(mut self, key: &str, listener: Listener) -> Self {
		self.insert(key, Property::Listener(listener));
		self
	}

	pub fn insert(&mut self, key: &str, property: Property) -> Option<Property> {
		self.entries.insert(key.into(), property)
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Property> {
		self.entries.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
		self.entries.iter().map(|(key, property)| (&**key, property))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn children(&self) -> &[Element] {
		&self.children
	}

	pub(crate) fn set_children(&mut self, children: Vec<Element>) {
		self.children = children;
	}
}

/// An immutable description of a desired host node.
///
/// Cloning is cheap; the property bag is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	ty: ElementType,
	props: Rc<Props>,
}
impl Element {
	#[must_use]
	pub fn new(ty: ElementType, props: Props) -> Self {
		Self { ty, props: Rc::new(props) }
	}

	#[must_use]
	pub fn ty(&self) -> &ElementType {
		&self.ty
	}

	#[must_use]
	pub fn props(&self) -> &Props {
		&self.props
	}

	#[must_use]
	pub fn children(&self) -> &[Element] {
		self.props.children()
	}

	pub(crate) fn shared_props(&self) -> &Rc<Props> {
		&self.props
	}
}
