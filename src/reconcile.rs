use crate::{
	element::Element,
	fiber::{Alternate, Effect, Fiber, FiberId, FiberTag, FiberTree},
};
use tracing::trace_span;

/// Creates and links the child fibers of `parent` for `elements`,
/// matching them by position against the children of `parent`'s alternate in `current`.
///
/// Same-type pairs become [`Effect::Update`]s that reuse the old host node.
/// Anything else becomes an [`Effect::Placement`] for the new element and/or an [`Effect::Deletion`] for the old fiber,
/// which stays in `current` and is recorded in `deletions` instead of being linked into `wip`.
pub(crate) fn reconcile_children<N: Clone>(
	wip: &mut FiberTree<N>,
	mut current: Option<&mut FiberTree<N>>,
	deletions: &mut Vec<FiberId>,
	parent: FiberId,
	elements: &[Element],
) {
	let mut old_fiber = match (wip[parent].alternate, current.as_deref()) {
		(Some(alternate), Some(current)) => current.resolve(alternate).and_then(|alternate| current[alternate].child),
		_ => None,
	};

	wip[parent].child = None;
	let mut previous_sibling: Option<FiberId> = None;
	let mut index = 0;
	while index < elements.len() || old_fiber.is_some() {
		let element = elements.get(index);
		let span = trace_span!("Reconciling child", index, new = ?element.map(Element::ty), ?old_fiber);
		let _enter = span.enter();

		let old = old_fiber.and_then(|id| current.as_deref().map(|current| (id, &current[id])));
		let reusable = match (element, old) {
			(Some(element), Some((_, old))) => old.element_type() == Some(element.ty()) && old.dom.is_some(),
			_ => false,
		};
		let next_old_fiber = old.and_then(|(_, old)| old.sibling);

		let new_fiber = match (element, old) {
			(Some(element), Some((old_id, old))) if reusable => Some(Fiber {
				tag: FiberTag::Host(element.ty().clone()),
				props: element.shared_props().clone(),
				dom: old.dom.clone(),
				parent: Some(parent),
				child: None,
				sibling: None,
				alternate: current.as_deref().map(|current| Alternate {
					generation: current.generation(),
					id: old_id,
				}),
				effect: Some(Effect::Update),
			}),
			(Some(element), _) => Some(Fiber {
				tag: FiberTag::Host(element.ty().clone()),
				props: element.shared_props().clone(),
				dom: None,
				parent: Some(parent),
				child: None,
				sibling: None,
				alternate: None,
				effect: Some(Effect::Placement),
			}),
			(None, _) => None,
		};

		if !reusable {
			if let (Some(old_id), Some(current)) = (old_fiber, current.as_deref_mut()) {
				current[old_id].effect = Some(Effect::Deletion);
				deletions.push(old_id);
			}
		}

		if let Some(new_fiber) = new_fiber {
			let id = wip.push(new_fiber);
			match previous_sibling {
				None => wip[parent].child = Some(id),
				Some(previous_sibling) => wip[previous_sibling].sibling = Some(id),
			}
			previous_sibling = Some(id);
		}

		old_fiber = next_old_fiber;
		index += 1;
	}
}
