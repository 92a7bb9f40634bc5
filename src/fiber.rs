//! Fiber trees, stored as arenas.
//!
//! `parent`, `child` and `sibling` are indices into the same [`FiberTree`],
//! `alternate` names a fiber of the tree committed before it.
//! Each tree carries a generation, so an [`Alternate`] only resolves against the tree it was taken from
//! and promoting a work-in-progress tree to current is a plain move.

use crate::element::{ElementType, Props};
use core::ops::{Index, IndexMut};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FiberId(usize);
impl FiberId {
	/// The synthetic root is always the first fiber of its tree.
	pub const ROOT: Self = Self(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Generation(u64);
impl Generation {
	pub const FIRST: Self = Self(0);

	#[must_use]
	pub fn next(self) -> Self {
		Self(self.0.wrapping_add(1))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Alternate {
	pub generation: Generation,
	pub id: FiberId,
}

/// The pending host mutation a fiber carries into the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
	Placement,
	Update,
	Deletion,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FiberTag {
	/// Owns the render container, which is never created or placed.
	Root,
	Host(ElementType),
}

#[derive(Debug)]
pub(crate) struct Fiber<N> {
	pub tag: FiberTag,
	pub props: Rc<Props>,
	pub dom: Option<N>,
	pub parent: Option<FiberId>,
	pub child: Option<FiberId>,
	pub sibling: Option<FiberId>,
	pub alternate: Option<Alternate>,
	pub effect: Option<Effect>,
}
impl<N> Fiber<N> {
	pub fn root(container: N, props: Props, alternate: Option<Alternate>) -> Self {
		Self {
			tag: FiberTag::Root,
			props: Rc::new(props),
			dom: Some(container),
			parent: None,
			child: None,
			sibling: None,
			alternate,
			effect: None,
		}
	}

	pub fn element_type(&self) -> Option<&ElementType> {
		match &self.tag {
			FiberTag::Root => None,
			FiberTag::Host(ty) => Some(ty),
		}
	}
}

#[derive(Debug)]
pub(crate) struct FiberTree<N> {
	generation: Generation,
	fibers: Vec<Fiber<N>>,
}
impl<N> FiberTree<N> {
	pub fn new(generation: Generation, root: Fiber<N>) -> Self {
		Self { generation, fibers: vec![root] }
	}

	pub fn generation(&self) -> Generation {
		self.generation
	}

	pub fn root(&self) -> &Fiber<N> {
		&self[FiberId::ROOT]
	}

	pub fn push(&mut self, fiber: Fiber<N>) -> FiberId {
		self.fibers.push(fiber);
		FiberId(self.fibers.len() - 1)
	}

	pub fn len(&self) -> usize {
		self.fibers.len()
	}

	/// Resolves `alternate` iff it was taken from this tree.
	pub fn resolve(&self, alternate: Alternate) -> Option<FiberId> {
		(alternate.generation == self.generation && alternate.id.0 < self.fibers.len()).then(|| alternate.id)
	}

	/// Pre-order successor of `id`: its child, else its sibling, else the sibling of its nearest ancestor that has one.
	pub fn next_in_pre_order(&self, id: FiberId) -> Option<FiberId> {
		if let Some(child) = self[id].child {
			return Some(child);
		}
		let mut next = Some(id);
		while let Some(fiber) = next {
			if let Some(sibling) = self[fiber].sibling {
				return Some(sibling);
			}
			next = self[fiber].parent;
		}
		None
	}

	/// The host node of the nearest ancestor of `id` that has one.
	pub fn host_parent(&self, id: FiberId) -> Option<&N> {
		let mut ancestor = self[id].parent;
		while let Some(fiber) = ancestor {
			if let Some(dom) = &self[fiber].dom {
				return Some(dom);
			}
			ancestor = self[fiber].parent;
		}
		None
	}

	/// The children of `id`, first to last.
	pub fn children(&self, id: FiberId) -> impl '_ + Iterator<Item = FiberId> {
		let mut next = self[id].child;
		core::iter::from_fn(move || {
			let current = next?;
			next = self[current].sibling;
			Some(current)
		})
	}
}
impl<N> Index<FiberId> for FiberTree<N> {
	type Output = Fiber<N>;

	fn index(&self, index: FiberId) -> &Self::Output {
		&self.fibers[index.0]
	}
}
impl<N> IndexMut<FiberId> for FiberTree<N> {
	fn index_mut(&mut self, index: FiberId) -> &mut Self::Output {
		&mut self.fibers[index.0]
	}
}
