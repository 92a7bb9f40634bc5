//! Time budgets for [`Renderer::work_loop`](`crate::Renderer::work_loop`).

/// How much time is left in the current slice of cooperative work.
///
/// The renderer asks after each processed fiber and yields once the answer drops below its
/// [`yield_threshold_ms`](`crate::RendererOptions::yield_threshold_ms`).
pub trait Deadline {
	/// Remaining time in milliseconds.
	fn time_remaining(&mut self) -> f64;
}

impl Deadline for web_sys::IdleDeadline {
	fn time_remaining(&mut self) -> f64 {
		web_sys::IdleDeadline::time_remaining(self)
	}
}

/// Never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;
impl Deadline for Unbounded {
	fn time_remaining(&mut self) -> f64 {
		f64::INFINITY
	}
}

/// Allows a fixed number of fibers per slice, counting one millisecond per fiber.
///
/// This makes interruption points deterministic, which is mostly useful for tests.
#[derive(Debug, Clone, Copy)]
pub struct UnitBudget {
	remaining: u32,
}
impl UnitBudget {
	#[must_use]
	pub fn new(units: u32) -> Self {
		Self { remaining: units }
	}
}
impl Deadline for UnitBudget {
	fn time_remaining(&mut self) -> f64 {
		self.remaining = self.remaining.saturating_sub(1);
		self.remaining.into()
	}
}
