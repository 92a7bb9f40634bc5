#![cfg(target_arch = "wasm32")]

use fiber_dom::{element, host::dom::DomHost, Listener, Props, Renderer};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn log_init() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

fn counting_listener(count: &Rc<RefCell<usize>>) -> Listener {
	let count = Rc::clone(count);
	Listener::new(move |event| {
		event.downcast_ref::<web_sys::Event>().expect("Expected Event but received something else.");
		*count.borrow_mut() += 1;
	})
}

fn button(id: &str) -> HtmlElement {
	window().unwrap().document().unwrap().get_element_by_id(id).unwrap().dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn click() {
	log_init();

	let document = window().unwrap().document().unwrap();
	let container = document.create_element("section").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	let mut renderer = Renderer::new(DomHost::new(document));

	let click_count = Rc::new(RefCell::new(0));
	let on_click = counting_listener(&click_count);

	renderer.render(element!("button", Props::new().with("id", "test-button").listener("onClick", on_click), "Click"), container.clone().into());
	assert_eq!(*click_count.borrow(), 0);
	renderer.flush().unwrap();
	assert_eq!(*click_count.borrow(), 0);

	button("test-button").click();
	assert_eq!(*click_count.borrow(), 1);

	renderer.render(element!("button", Props::new().with("id", "test-button"), "Click"), container.clone().into());
	renderer.flush().unwrap();
	button("test-button").click();
	assert_eq!(*click_count.borrow(), 1);
	assert_eq!(renderer.host().closure_count(), 0);

	container.remove();
}

#[wasm_bindgen_test]
fn replaced_listener_fires_alone() {
	log_init();

	let document = window().unwrap().document().unwrap();
	let container = document.create_element("section").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	let mut renderer = Renderer::new(DomHost::new(document));

	let (f_count, g_count) = (Rc::new(RefCell::new(0)), Rc::new(RefCell::new(0)));
	let (f, g) = (counting_listener(&f_count), counting_listener(&g_count));

	renderer.render(element!("button", Props::new().with("id", "replaced-button").listener("onClick", f)), container.clone().into());
	renderer.flush().unwrap();
	renderer.render(element!("button", Props::new().with("id", "replaced-button").listener("onClick", g)), container.clone().into());
	renderer.flush().unwrap();
	assert_eq!(renderer.host().closure_count(), 1);

	button("replaced-button").click();
	assert_eq!((*f_count.borrow(), *g_count.borrow()), (0, 1));

	container.remove();
}

#[wasm_bindgen_test]
fn shared_listener_shares_one_closure() {
	log_init();

	let document = window().unwrap().document().unwrap();
	let container = document.create_element("section").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	let mut renderer = Renderer::new(DomHost::new(document));

	let count = Rc::new(RefCell::new(0));
	let shared = counting_listener(&count);
	renderer.render(
		element!(
			"div",
			Props::new(),
			element!("button", Props::new().with("id", "shared-a").listener("onClick", shared.clone())),
			element!("button", Props::new().with("id", "shared-b").listener("onClick", shared)),
		),
		container.clone().into(),
	);
	renderer.flush().unwrap();
	assert_eq!(renderer.host().closure_count(), 1);

	button("shared-a").click();
	button("shared-b").click();
	assert_eq!(*count.borrow(), 2);

	container.remove();
}
