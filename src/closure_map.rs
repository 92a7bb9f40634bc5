use crate::{
	element::{Listener, ListenerId},
	rc_hash_map::{CountSaturatedError, RcHashMap},
};
use js_sys::Function;
use tracing::{trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast};

/// JavaScript functions for [`Listener`]s, reference-counted per listener identity.
///
/// A listener bound to several nodes shares one [`Closure`].
/// It's freed by [`ClosureMap::collect`] once its last binding was released.
#[derive(Default)]
pub(crate) struct ClosureMap(RcHashMap<ListenerId, u16, Closure<dyn Fn(web_sys::Event)>>);
impl ClosureMap {
	pub fn acquire(&mut self, listener: &Listener) -> Result<&Function, CountSaturatedError> {
		let closure = self.0.increment_or_insert_with(listener.id(), || {
			trace!("Creating closure for {:?}.", listener);
			let listener = listener.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| {
				let span = trace_span!("listener.call(…)", ?listener);
				let _enter = span.enter();
				listener.call(&event)
			}) as Box<dyn Fn(web_sys::Event)>)
		})?;
		let closure: &Closure<dyn Fn(web_sys::Event)> = closure;
		Ok(closure.as_ref().unchecked_ref())
	}

	/// Returns `Ok(None)` iff `listener` was never acquired here.
	///
	/// The returned [`Function`] stays valid until the next [`ClosureMap::collect`].
	pub fn release(&mut self, listener: &Listener) -> Result<Option<&Function>, CountSaturatedError> {
		Ok(self.0.weak_decrement(&listener.id())?.map(|closure| {
			let closure: &Closure<dyn Fn(web_sys::Event)> = closure;
			closure.as_ref().unchecked_ref()
		}))
	}

	/// Drops closures without remaining bindings and returns how many were freed.
	pub fn collect(&mut self) -> usize {
		self.0.drain_weak().count()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}
}
