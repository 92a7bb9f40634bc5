//! The host tree capability and the property adapter on top of it.

use crate::element::{ElementType, Listener, Props, Property, Value};
use core::fmt::Debug;
use tracing::{error, instrument, trace, trace_span};

pub mod dom;
pub mod memory;

/// A mutable tree of host nodes that the renderer commits into.
///
/// Implementations report failures through [`HostTree::Error`]; the renderer logs them and carries on with the next operation.
pub trait HostTree {
	/// A cheap handle to a host node.
	type Node: Clone + PartialEq + Debug;
	type Error: Debug;

	/// Creates a detached node: A bare text node for [`ElementType::Text`], otherwise an element with the given tag.
	fn create_node(&mut self, ty: &ElementType) -> Result<Self::Node, Self::Error>;
	fn set_property(&mut self, node: &Self::Node, key: &str, value: &Value) -> Result<(), Self::Error>;
	fn clear_property(&mut self, node: &Self::Node, key: &str) -> Result<(), Self::Error>;
	fn add_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener) -> Result<(), Self::Error>;
	fn remove_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener) -> Result<(), Self::Error>;
	/// Appends `child` as last child of `parent`.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
}

/// Derives the event name from a listener property key: `"onClick"` becomes `"click"`.
///
/// Keys without the `on` prefix are only lower-cased.
#[must_use]
pub fn event_name(key: &str) -> String {
	key.strip_prefix("on").unwrap_or(key).to_lowercase()
}

/// Creates a host node for an element of type `ty` and applies all of `props` to it.
#[instrument(skip(host, props))]
pub fn create_host_node<H: HostTree + ?Sized>(host: &mut H, ty: &ElementType, props: &Props) -> Result<H::Node, H::Error> {
	let node = host.create_node(ty)?;
	reconcile_properties(host, &node, &Props::new(), props);
	Ok(node)
}

/// Removes every listener in `props` from `node`.
///
/// Used for host nodes that are dropped by the renderer, so hosts can release per-listener resources.
pub fn unbind_listeners<H: HostTree + ?Sized>(host: &mut H, node: &H::Node, props: &Props) {
	for (key, property) in props.iter() {
		if let Property::Listener(listener) = property {
			trace!("Unbinding {:?} of dropped node.", key);
			if let Err(error) = host.remove_listener(node, &event_name(key), listener) {
				error!("Failed to remove listener {:?}: {:?}", key, error);
			}
		}
	}
}

/// Updates the properties and listeners of `node` from `previous` to `next`.
///
/// Operations run in four passes, in this order:
///
/// 1. detach listeners that were removed or changed,
/// 2. clear removed plain properties,
/// 3. assign new or changed plain properties,
/// 4. attach new or changed listeners.
///
/// A listener is therefore never bound twice for the same key,
/// and a key that changes between a plain value and a listener is cleared before it's reused.
///
/// Returns the number of host mutations that succeeded.
#[instrument(skip(host, previous, next))]
pub fn reconcile_properties<H: HostTree + ?Sized>(host: &mut H, node: &H::Node, previous: &Props, next: &Props) -> usize {
	let mut mutations = 0;
	let mut tally = |result: Result<(), H::Error>, operation: &str, key: &str| match result {
		Ok(()) => mutations += 1,
		Err(error) => error!("Failed to {} {:?}: {:?}", operation, key, error),
	};

	for (key, property) in previous.iter() {
		if let Property::Listener(listener) = property {
			if next.get(key) != Some(property) {
				let span = trace_span!("Detaching listener", key, ?listener);
				let _enter = span.enter();
				tally(host.remove_listener(node, &event_name(key), listener), "remove listener", key);
			}
		}
	}

	for (key, property) in previous.iter() {
		if let Property::Value(_) = property {
			if !matches!(next.get(key), Some(Property::Value(_))) {
				trace!("Clearing property {:?}", key);
				tally(host.clear_property(node, key), "clear property", key);
			}
		}
	}

	for (key, property) in next.iter() {
		if let Property::Value(value) = property {
			if previous.get(key) != Some(property) {
				if cfg!(feature = "dangerous-logging") {
					trace!("Setting property {:?} to {:?}", key, value);
				} else {
					trace!("Setting property {:?}", key);
				}
				tally(host.set_property(node, key, value), "set property", key);
			}
		}
	}

	for (key, property) in next.iter() {
		if let Property::Listener(listener) = property {
			if previous.get(key) != Some(property) {
				let span = trace_span!("Attaching listener", key, ?listener);
				let _enter = span.enter();
				tally(host.add_listener(node, &event_name(key), listener), "add listener", key);
			}
		}
	}

	mutations
}
