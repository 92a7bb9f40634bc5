use crate::{
	commit::{commit_root, CommitStats},
	deadline::{Deadline, Unbounded},
	element::{Element, Props},
	fiber::{Alternate, Effect, Fiber, FiberId, FiberTag, FiberTree, Generation},
	host::{create_host_node, unbind_listeners, HostTree},
	reconcile::reconcile_children,
};
use std::rc::Rc;
use tracing::{error, info, instrument, trace, trace_span, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererOptions {
	/// A slice yields once its [`Deadline`] reports less than this many milliseconds remaining.
	///
	/// Defaults to `1.0`.
	pub yield_threshold_ms: f64,
}
impl Default for RendererOptions {
	fn default() -> Self {
		Self { yield_threshold_ms: 1. }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No pending render.
	Idle,
	/// A work-in-progress tree is being built. Nothing has been written to the host tree yet.
	Building,
	/// Pending effects are being flushed. Only observable from within host calls.
	Committing,
}

/// The result of one [`Renderer::work_loop`] slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
	/// There was nothing to do.
	Idle,
	/// The deadline expired before the work-in-progress tree was complete.
	Yielded { processed: usize },
	/// The work-in-progress tree was completed and committed during this slice.
	Committed(CommitStats),
}

/// An incremental renderer into a [`HostTree`].
///
/// # Correct Use
///
/// [`Renderer::render`] only schedules work.
/// The host environment must then pump [`Renderer::work_loop`] (for example through [`IdleLoop`](`crate::IdleLoop`))
/// or call [`Renderer::flush`] until the render is committed.
///
/// Host nodes are created while building, but attached, detached or updated only during the commit,
/// which always runs to completion in a single slice.
///
/// Calling [`Renderer::render`] again before the previous render was committed discards the unfinished work.
pub struct Renderer<H: HostTree> {
	host: H,
	options: RendererOptions,
	phase: Phase,
	current: Option<FiberTree<H::Node>>,
	wip: Option<FiberTree<H::Node>>,
	next_unit_of_work: Option<FiberId>,
	deletions: Vec<FiberId>,
	generation: Generation,
	last_commit: Option<CommitStats>,
}
impl<H: HostTree> Renderer<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self::with_options(host, RendererOptions::default())
	}

	#[must_use]
	pub fn with_options(host: H, options: RendererOptions) -> Self {
		Self {
			host,
			options,
			phase: Phase::Idle,
			current: None,
			wip: None,
			next_unit_of_work: None,
			deletions: Vec::new(),
			generation: Generation::FIRST,
			last_commit: None,
		}
	}

	#[must_use]
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Direct host access. Changes made here bypass the renderer's view of the host tree.
	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	#[must_use]
	pub fn into_host(self) -> H {
		self.host
	}

	#[must_use]
	pub fn phase(&self) -> Phase {
		self.phase
	}

	#[must_use]
	pub fn last_commit(&self) -> Option<CommitStats> {
		self.last_commit
	}

	/// Schedules `element` to be rendered as the only child of `container`.
	///
	/// If the last committed render targeted the same container, the new tree is diffed against it.
	/// Otherwise everything is placed anew and the previous container is left as it is.
	#[instrument(skip(self, element))]
	pub fn render(&mut self, element: Element, container: H::Node) {
		if let Some(discarded) = self.wip.take() {
			warn!("Discarding an unfinished render.");
			release_placements(&mut self.host, &discarded);
		}

		let alternate = match &self.current {
			Some(current) if current.root().dom.as_ref() == Some(&container) => Some(Alternate {
				generation: current.generation(),
				id: FiberId::ROOT,
			}),
			Some(_) => {
				warn!("Rendering into a different container. The previous tree won't be diffed or cleaned up.");
				None
			}
			None => None,
		};

		let mut props = Props::new();
		props.set_children(vec![element]);

		self.generation = self.generation.next();
		self.wip = Some(FiberTree::new(self.generation, Fiber::root(container, props, alternate)));
		self.deletions.clear();
		self.next_unit_of_work = Some(FiberId::ROOT);
		self.phase = Phase::Building;
	}

	/// Processes fibers until `deadline` runs out or the work-in-progress tree is complete, then commits if it is.
	///
	/// Meant to be called repeatedly by the host environment, e.g. from an idle callback.
	#[instrument(skip(self, deadline))]
	pub fn work_loop<D: Deadline + ?Sized>(&mut self, deadline: &mut D) -> Slice {
		let mut processed = 0;
		while let Some(unit_of_work) = self.next_unit_of_work {
			self.next_unit_of_work = self.perform_unit_of_work(unit_of_work);
			processed += 1;
			if deadline.time_remaining() < self.options.yield_threshold_ms {
				break;
			}
		}

		if self.wip.is_none() {
			Slice::Idle
		} else if self.next_unit_of_work.is_none() {
			let stats = self.commit();
			Slice::Committed(stats)
		} else {
			trace!("Yielding after {} fiber(s).", processed);
			Slice::Yielded { processed }
		}
	}

	/// Pumps [`Renderer::work_loop`] without a time limit.
	pub fn flush(&mut self) -> Option<CommitStats> {
		match self.work_loop(&mut Unbounded) {
			Slice::Committed(stats) => Some(stats),
			Slice::Idle | Slice::Yielded { .. } => None,
		}
	}

	/// Realizes the host node of `unit_of_work` if necessary, reconciles its children
	/// and returns the next fiber in pre-order.
	fn perform_unit_of_work(&mut self, unit_of_work: FiberId) -> Option<FiberId> {
		let Self {
			host, wip, current, deletions, ..
		} = self;
		let wip = match wip {
			Some(wip) => wip,
			None => {
				error!("Scheduled work without work-in-progress tree.");
				return None;
			}
		};

		let fiber = &wip[unit_of_work];
		let span = trace_span!("Performing unit of work", ?unit_of_work, ty = ?fiber.element_type(), effect = ?fiber.effect);
		let _enter = span.enter();

		let props = Rc::clone(&fiber.props);
		let unrealized = match (&fiber.tag, &fiber.dom) {
			(FiberTag::Host(ty), None) => Some(ty.clone()),
			(FiberTag::Root, _) | (_, Some(_)) => None,
		};
		if let Some(ty) = unrealized {
			match create_host_node(host, &ty, &props) {
				Ok(dom) => wip[unit_of_work].dom = Some(dom),
				Err(error) => error!("Failed to create host node for {}: {:?}", ty, error),
			}
		}

		reconcile_children(wip, current.as_mut(), deletions, unit_of_work, props.children());
		wip.next_in_pre_order(unit_of_work)
	}

	fn commit(&mut self) -> CommitStats {
		self.phase = Phase::Committing;
		let stats = match self.wip.take() {
			Some(wip) => {
				let stats = commit_root(&mut self.host, &wip, self.current.as_ref(), &self.deletions);
				info!(
					"Committed {} fiber(s): {} placed, {} updated ({} property change(s)), {} deleted.",
					wip.len() - 1,
					stats.placements,
					stats.updates,
					stats.property_mutations,
					stats.deletions,
				);
				self.current = Some(wip);
				stats
			}
			None => CommitStats::default(),
		};
		self.deletions.clear();
		self.last_commit = Some(stats);
		self.phase = Phase::Idle;
		stats
	}
}

/// Unbinds the listeners of host nodes that were created for `discarded` but never attached.
///
/// Updated fibers share their host node with the current tree and are left alone.
fn release_placements<H: HostTree>(host: &mut H, discarded: &FiberTree<H::Node>) {
	let mut next = discarded.root().child;
	while let Some(id) = next {
		let fiber = &discarded[id];
		if let (Some(Effect::Placement), Some(dom)) = (fiber.effect, &fiber.dom) {
			unbind_listeners(host, dom, &fiber.props);
		}
		next = discarded.next_in_pre_order(id);
	}
}
