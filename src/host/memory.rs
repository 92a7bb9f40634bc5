//! An in-memory host tree.
//!
//! [`MemoryHost`] keeps its nodes in an arena and records every capability call in an operation log,
//! which makes it suitable for headless rendering and for asserting on exactly what the renderer did.

use super::HostTree;
use crate::element::{ElementType, Listener, ListenerId, Value};
use core::{
	any::Any,
	fmt::{self, Display, Formatter, Write as _},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A recorded [`HostTree`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
	CreateNode { node: NodeId, ty: ElementType },
	SetProperty { node: NodeId, key: String, value: Value },
	ClearProperty { node: NodeId, key: String },
	AddListener { node: NodeId, event: String, listener: ListenerId },
	RemoveListener { node: NodeId, event: String, listener: ListenerId },
	AppendChild { parent: NodeId, child: NodeId },
	RemoveChild { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryHostError {
	NotAChild { parent: NodeId, child: NodeId },
	ListenerNotBound { node: NodeId, event: String },
	/// Appending would make a node its own ancestor.
	Cycle { parent: NodeId, child: NodeId },
}
impl Display for MemoryHostError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotAChild { parent, child } => write!(f, "{:?} is not a child of {:?}", child, parent),
			Self::ListenerNotBound { node, event } => write!(f, "no such {:?} listener on {:?}", event, node),
			Self::Cycle { parent, child } => write!(f, "appending {:?} to {:?} would create a cycle", child, parent),
		}
	}
}
impl std::error::Error for MemoryHostError {}

#[derive(Debug)]
pub struct MemoryNode {
	ty: ElementType,
	properties: HashMap<Rc<str>, Value>,
	listeners: Vec<(String, Listener)>,
	children: Vec<NodeId>,
	parent: Option<NodeId>,
}
impl MemoryNode {
	#[must_use]
	pub fn ty(&self) -> &ElementType {
		&self.ty
	}

	#[must_use]
	pub fn property(&self, key: &str) -> Option<&Value> {
		self.properties.get(key)
	}

	#[must_use]
	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	#[must_use]
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn listeners(&self, event: &str) -> impl Iterator<Item = &Listener> {
		let event = event.to_owned();
		self.listeners.iter().filter(move |(e, _)| *e == event).map(|(_, listener)| listener)
	}
}

#[derive(Debug, Default)]
pub struct MemoryHost {
	nodes: Vec<MemoryNode>,
	log: Vec<HostOp>,
}
impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached element to render into, without logging it.
	pub fn create_container(&mut self, tag: &str) -> NodeId {
		self.push(ElementType::from(tag))
	}

	fn push(&mut self, ty: ElementType) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(MemoryNode {
			ty,
			properties: HashMap::new(),
			listeners: Vec::new(),
			children: Vec::new(),
			parent: None,
		});
		id
	}

	/// # Panics
	///
	/// Iff `id` was issued by another [`MemoryHost`] with more nodes.
	#[must_use]
	pub fn node(&self, id: NodeId) -> &MemoryNode {
		&self.nodes[id.0]
	}

	#[must_use]
	pub fn log(&self) -> &[HostOp] {
		&self.log
	}

	pub fn take_log(&mut self) -> Vec<HostOp> {
		std::mem::take(&mut self.log)
	}

	/// Calls each `event` listener bound to `node` with `payload`, in binding order.
	///
	/// Returns the number of listeners invoked.
	pub fn dispatch(&self, node: NodeId, event: &str, payload: &dyn Any) -> usize {
		let listeners: Vec<Listener> = self.node(node).listeners(event).cloned().collect();
		trace!("Dispatching {:?} to {} listener(s) on {:?}", event, listeners.len(), node);
		for listener in &listeners {
			listener.call(payload);
		}
		listeners.len()
	}

	/// Serialises the subtree below `node` (inclusive) into a deterministic markup string.
	///
	/// Properties are sorted by key. Listeners are not shown.
	#[must_use]
	pub fn to_markup(&self, node: NodeId) -> String {
		let mut markup = String::new();
		self.write_markup(node, &mut markup);
		markup
	}

	fn write_markup(&self, id: NodeId, markup: &mut String) {
		let node = self.node(id);
		match &node.ty {
			ElementType::Text => {
				if let Some(value) = node.properties.get(crate::element::NODE_VALUE) {
					let _ = write!(markup, "{}", value);
				}
			}
			ElementType::Tag(tag) => {
				let mut properties: Vec<_> = node.properties.iter().collect();
				properties.sort_by(|(a, _), (b, _)| a.cmp(b));
				let _ = write!(markup, "<{}", tag);
				for (key, value) in properties {
					let _ = write!(markup, " {}={:?}", key, value.to_string());
				}
				markup.push('>');
				for &child in &node.children {
					self.write_markup(child, markup);
				}
				let _ = write!(markup, "</{}>", tag);
			}
		}
	}

	fn detach(&mut self, child: NodeId) {
		if let Some(parent) = self.nodes[child.0].parent.take() {
			self.nodes[parent.0].children.retain(|&c| c != child);
		}
	}

	fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			match self.nodes[node.0].parent {
				Some(parent) => node = parent,
				None => return false,
			}
		}
	}
}

impl HostTree for MemoryHost {
	type Node = NodeId;
	type Error = MemoryHostError;

	fn create_node(&mut self, ty: &ElementType) -> Result<NodeId, MemoryHostError> {
		let node = self.push(ty.clone());
		self.log.push(HostOp::CreateNode { node, ty: ty.clone() });
		Ok(node)
	}

	fn set_property(&mut self, &node: &NodeId, key: &str, value: &Value) -> Result<(), MemoryHostError> {
		self.nodes[node.0].properties.insert(key.into(), value.clone());
		self.log.push(HostOp::SetProperty {
			node,
			key: key.to_owned(),
			value: value.clone(),
		});
		Ok(())
	}

	fn clear_property(&mut self, &node: &NodeId, key: &str) -> Result<(), MemoryHostError> {
		self.nodes[node.0].properties.remove(key);
		self.log.push(HostOp::ClearProperty { node, key: key.to_owned() });
		Ok(())
	}

	fn add_listener(&mut self, &node: &NodeId, event: &str, listener: &Listener) -> Result<(), MemoryHostError> {
		self.nodes[node.0].listeners.push((event.to_owned(), listener.clone()));
		self.log.push(HostOp::AddListener {
			node,
			event: event.to_owned(),
			listener: listener.id(),
		});
		Ok(())
	}

	fn remove_listener(&mut self, &node: &NodeId, event: &str, listener: &Listener) -> Result<(), MemoryHostError> {
		let listeners = &mut self.nodes[node.0].listeners;
		let index = listeners
			.iter()
			.position(|(e, l)| e == event && l == listener)
			.ok_or_else(|| MemoryHostError::ListenerNotBound { node, event: event.to_owned() })?;
		listeners.remove(index);
		self.log.push(HostOp::RemoveListener {
			node,
			event: event.to_owned(),
			listener: listener.id(),
		});
		Ok(())
	}

	fn append_child(&mut self, &parent: &NodeId, &child: &NodeId) -> Result<(), MemoryHostError> {
		if self.is_ancestor_or_self(child, parent) {
			return Err(MemoryHostError::Cycle { parent, child });
		}
		self.detach(child);
		self.nodes[parent.0].children.push(child);
		self.nodes[child.0].parent = Some(parent);
		self.log.push(HostOp::AppendChild { parent, child });
		Ok(())
	}

	fn remove_child(&mut self, &parent: &NodeId, &child: &NodeId) -> Result<(), MemoryHostError> {
		if self.nodes[child.0].parent != Some(parent) {
			return Err(MemoryHostError::NotAChild { parent, child });
		}
		self.detach(child);
		self.log.push(HostOp::RemoveChild { parent, child });
		Ok(())
	}
}
