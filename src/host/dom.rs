//! A [`HostTree`] over the browser DOM.

use super::HostTree;
use crate::{
	closure_map::ClosureMap,
	element::{ElementType, Listener, Value},
};
use js_sys::Reflect;
use tracing::{info, instrument, trace, warn};
use wasm_bindgen::JsValue;

/// Creates nodes through a [`web_sys::Document`] and assigns properties as plain JavaScript object properties,
/// e.g. `nodeValue` for text nodes or `id` and `className` for elements.
///
/// Event listeners are reference-counted per [`Listener`] identity.
/// Dropping the [`DomHost`] frees their closures, after which listeners still bound in the DOM will throw when invoked.
pub struct DomHost {
	document: web_sys::Document,
	closures: ClosureMap,
}
impl DomHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			closures: ClosureMap::default(),
		}
	}

	/// A [`DomHost`] for the current window's document, if there is one.
	#[must_use]
	pub fn for_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// The number of JavaScript closures currently held for event listeners.
	#[must_use]
	pub fn closure_count(&self) -> usize {
		self.closures.len()
	}
}

fn to_js(value: &Value) -> JsValue {
	match value {
		Value::String(string) => JsValue::from_str(string),
		Value::Bool(value) => JsValue::from_bool(*value),
		Value::Number(number) => JsValue::from_f64(*number),
	}
}

impl HostTree for DomHost {
	type Node = web_sys::Node;
	type Error = JsValue;

	#[instrument(skip(self))]
	fn create_node(&mut self, ty: &ElementType) -> Result<web_sys::Node, JsValue> {
		Ok(match ty {
			ElementType::Text => self.document.create_text_node("").into(),
			ElementType::Tag(tag) => self.document.create_element(tag)?.into(),
		})
	}

	fn set_property(&mut self, node: &web_sys::Node, key: &str, value: &Value) -> Result<(), JsValue> {
		if !Reflect::set(node, &JsValue::from_str(key), &to_js(value))? {
			warn!("Property {:?} could not be assigned.", key);
		}
		Ok(())
	}

	fn clear_property(&mut self, node: &web_sys::Node, key: &str) -> Result<(), JsValue> {
		Reflect::set(node, &JsValue::from_str(key), &JsValue::from_str("")).map(drop)
	}

	#[instrument(skip(self))]
	fn add_listener(&mut self, node: &web_sys::Node, event: &str, listener: &Listener) -> Result<(), JsValue> {
		let function = self
			.closures
			.acquire(listener)
			.map_err(|_| JsValue::from_str("Too many (more than 65k) active bindings of the same `Listener`"))?;
		node.add_event_listener_with_callback(event, function)
	}

	#[instrument(skip(self))]
	fn remove_listener(&mut self, node: &web_sys::Node, event: &str, listener: &Listener) -> Result<(), JsValue> {
		let result = match self.closures.release(listener) {
			Ok(Some(function)) => node.remove_event_listener_with_callback(event, function),
			Ok(None) => Err(JsValue::from_str("Tried to remove a listener that was never added")),
			Err(_) => Err(JsValue::from_str("Tried to remove a listener more often than it was added")),
		};
		let freed = self.closures.collect();
		if freed > 0 {
			trace!("Freed {} listener closure(s).", freed);
			info!("Listener closure count: {}", self.closures.len());
		}
		result
	}

	fn append_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
		parent.append_child(child).map(drop)
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
		parent.remove_child(child).map(drop)
	}
}
