use crate::element::{Element, ElementType, Props, Value, NODE_VALUE};

/// A child passed to [`build`]: Either a nested [`Element`] or raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
	Element(Element),
	Text(Value),
}
impl From<Element> for Child {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}
impl From<&str> for Child {
	fn from(text: &str) -> Self {
		Self::Text(text.into())
	}
}
impl From<String> for Child {
	fn from(text: String) -> Self {
		Self::Text(text.into())
	}
}
impl From<Value> for Child {
	fn from(value: Value) -> Self {
		Self::Text(value)
	}
}

/// Creates an [`Element`] from a type, a property bag and its children.
///
/// Raw text children are wrapped into [`ElementType::Text`] elements via [`text`].
/// Any children already present in `props` are replaced.
#[must_use]
pub fn build(ty: impl Into<ElementType>, mut props: Props, children: impl IntoIterator<Item = Child>) -> Element {
	props.set_children(
		children
			.into_iter()
			.map(|child| match child {
				Child::Element(element) => element,
				Child::Text(value) => text(value),
			})
			.collect(),
	);
	Element::new(ty.into(), props)
}

/// Creates a text [`Element`] carrying `value` as its [`NODE_VALUE`].
#[must_use]
pub fn text(value: impl Into<Value>) -> Element {
	Element::new(ElementType::Text, Props::new().with(NODE_VALUE, value))
}

/// Variadic shorthand for [`build`](`crate::build()`).
///
/// ```
/// use fiber_dom::{element, Props};
///
/// let heading = element!("h1", Props::new().with("title", "foo"), "Hello");
/// assert_eq!(heading.children().len(), 1);
/// ```
#[macro_export]
macro_rules! element {
	($ty:expr, $props:expr $(, $child:expr)* $(,)?) => {
		$crate::build($ty, $props, ::std::vec![$($crate::Child::from($child)),*])
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::element::Property;

	#[test]
	fn raw_text_is_normalized() {
		let div = build("div", Props::new(), vec![Child::from("Hello"), build("p", Props::new(), vec![]).into()]);

		let children = div.children();
		assert_eq!(children.len(), 2);
		assert_eq!(children[0].ty(), &ElementType::Text);
		assert_eq!(children[0].props().get(NODE_VALUE), Some(&Property::Value("Hello".into())));
		assert!(children[0].children().is_empty());
		assert_eq!(children[1].ty(), &ElementType::from("p"));
	}

	#[test]
	fn children_replace_prior_children() {
		let mut props = Props::new();
		props.set_children(vec![text("stale")]);
		let p = build("p", props, vec![]);
		assert!(p.children().is_empty());
	}
}
