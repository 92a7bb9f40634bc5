//! Drives a [`Renderer`] from `requestIdleCallback`.

use crate::{host::HostTree, renderer::Renderer};
use std::{
	cell::{Cell, RefCell},
	rc::{Rc, Weak},
};
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type IdleCallback = Closure<dyn FnMut(web_sys::IdleDeadline)>;

/// Pumps a shared [`Renderer`] whenever the browser is idle.
///
/// After each slice the next idle callback is requested, whether or not there was work to do,
/// so renders scheduled later are picked up without further setup.
///
/// Dropping the [`IdleLoop`] cancels the pending callback.
#[must_use = "Dropping an `IdleLoop` stops it."]
pub struct IdleLoop {
	window: web_sys::Window,
	callback: Rc<RefCell<Option<IdleCallback>>>,
	handle: Rc<Cell<Option<u32>>>,
}
impl IdleLoop {
	#[instrument(skip(window, renderer))]
	pub fn start<H: 'static + HostTree>(window: web_sys::Window, renderer: Rc<RefCell<Renderer<H>>>) -> Result<Self, JsValue> {
		let callback: Rc<RefCell<Option<IdleCallback>>> = Rc::default();
		let handle = Rc::new(Cell::new(None));

		let this = Rc::downgrade(&callback);
		let request_window = window.clone();
		let request_handle = Rc::clone(&handle);
		*callback.borrow_mut() = Some(Closure::wrap(Box::new(move |mut deadline: web_sys::IdleDeadline| {
			request_handle.set(None);
			match renderer.try_borrow_mut() {
				Ok(mut renderer) => {
					let slice = renderer.work_loop(&mut deadline);
					trace!("Idle slice: {:?}", slice);
				}
				Err(_) => warn!("Renderer is borrowed elsewhere. Skipping this idle slice."),
			}
			if let Err(error) = request(&request_window, &this, &request_handle) {
				error!("Failed to request the next idle callback: {:?}", error);
			}
		}) as Box<dyn FnMut(web_sys::IdleDeadline)>));

		request(&window, &Rc::downgrade(&callback), &handle)?;
		Ok(Self { window, callback, handle })
	}
}
impl Drop for IdleLoop {
	fn drop(&mut self) {
		if let Some(handle) = self.handle.take() {
			self.window.cancel_idle_callback(handle);
		}
		self.callback.borrow_mut().take();
	}
}

fn request(window: &web_sys::Window, callback: &Weak<RefCell<Option<IdleCallback>>>, handle: &Cell<Option<u32>>) -> Result<(), JsValue> {
	let callback = match callback.upgrade() {
		Some(callback) => callback,
		None => return Ok(()),
	};
	let callback = callback.borrow();
	if let Some(callback) = callback.as_ref() {
		handle.set(Some(window.request_idle_callback(callback.as_ref().unchecked_ref())?));
	}
	Ok(())
}
