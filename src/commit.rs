use crate::{
	fiber::{Effect, FiberId, FiberTree},
	host::{reconcile_properties, unbind_listeners, HostTree},
};
use tracing::{error, instrument, trace, trace_span};

/// What a commit did to the host tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
	/// Fibers whose host node was appended, including descendants of other placed fibers.
	pub placements: usize,
	/// Fibers that kept their host node, whether or not any of their properties changed.
	pub updates: usize,
	/// Removed subtrees.
	pub deletions: usize,
	/// Property and listener changes applied to updated host nodes.
	pub property_mutations: usize,
}

/// Applies all pending effects to the host in one pass.
///
/// Deletions are flushed first, from `current`, since their fibers aren't part of `wip`.
/// Then `wip` is walked in pre-order to apply placements and updates.
#[instrument(skip(host, wip, current, deletions))]
pub(crate) fn commit_root<H: HostTree + ?Sized>(host: &mut H, wip: &FiberTree<H::Node>, current: Option<&FiberTree<H::Node>>, deletions: &[FiberId]) -> CommitStats {
	let mut stats = CommitStats::default();

	if let Some(current) = current {
		for &deletion in deletions {
			let span = trace_span!("Committing deletion", ?deletion);
			let _enter = span.enter();
			commit_deletion(host, current, deletion);
			stats.deletions += 1;
		}
	} else if !deletions.is_empty() {
		error!("{} deletion(s) pending without a current tree. Skipping them.", deletions.len());
	}

	let mut next = wip.root().child;
	while let Some(id) = next {
		let fiber = &wip[id];
		let span = trace_span!("Committing", ?id, ty = ?fiber.element_type(), effect = ?fiber.effect);
		let _enter = span.enter();

		match (fiber.effect, &fiber.dom) {
			(Some(Effect::Placement), Some(dom)) => match wip.host_parent(id) {
				Some(parent_dom) => {
					if let Err(error) = host.append_child(parent_dom, dom) {
						error!("Failed to append host node: {:?}", error);
					}
					stats.placements += 1;
				}
				None => trace!("No host parent. Skipping placement."),
			},
			(Some(Effect::Update), Some(dom)) => {
				let alternate = fiber.alternate.and_then(|alternate| current.and_then(|current| current.resolve(alternate).map(|id| &current[id])));
				match alternate {
					Some(alternate) => {
						debug_assert_eq!(alternate.dom.as_ref(), Some(dom));
						stats.property_mutations += reconcile_properties(host, dom, &alternate.props, &fiber.props);
						stats.updates += 1;
					}
					None => error!("Updated fiber without alternate. Skipping property update."),
				}
			}
			(Some(Effect::Deletion), _) => error!("Deletion linked into the work-in-progress tree. Ignoring it."),
			(_, None) => trace!("No host node. Skipping."),
			(None, Some(_)) => (),
		}

		next = wip.next_in_pre_order(id);
	}

	stats
}

/// Removes the host node of `deletion` from its nearest host ancestor.
///
/// If the fiber was never realized, its children are removed instead.
/// Listeners are then unbound throughout the removed subtree, so the host can release them.
fn commit_deletion<H: HostTree + ?Sized>(host: &mut H, current: &FiberTree<H::Node>, deletion: FiberId) {
	let mut pending = vec![deletion];
	while let Some(id) = pending.pop() {
		match (&current[id].dom, current.host_parent(id)) {
			(Some(dom), Some(parent_dom)) => {
				if let Err(error) = host.remove_child(parent_dom, dom) {
					error!("Failed to remove host node: {:?}", error);
				}
			}
			(Some(_), None) => trace!("No host parent. Skipping removal."),
			(None, _) => pending.extend(current.children(id)),
		}
	}

	let mut pending = vec![deletion];
	while let Some(id) = pending.pop() {
		let fiber = &current[id];
		if let Some(dom) = &fiber.dom {
			unbind_listeners(host, dom, &fiber.props);
		}
		pending.extend(current.children(id));
	}
}
