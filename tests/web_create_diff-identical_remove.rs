#![cfg(target_arch = "wasm32")]

use fiber_dom::{element, host::dom::DomHost, text, Element, Listener, Props, Renderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn text_node() {
	test_create_diff_identical_remove(|| text("Hello fiber-dom text!"), "Hello fiber-dom text!", 0);
}

#[wasm_bindgen_test]
fn minimal_div() {
	test_create_diff_identical_remove(|| element!("div", Props::new()), "<div></div>", 0);
}

#[wasm_bindgen_test]
fn nested() {
	test_create_diff_identical_remove(
		|| element!("div", Props::new().with("id", "nested"), element!("h1", Props::new().with("title", "foo"), "Hello"), element!("p", Props::new(), "fiber-dom!")),
		r#"<div id="nested"><h1 title="foo">Hello</h1><p>fiber-dom!</p></div>"#,
		0,
	);
}

#[wasm_bindgen_test]
fn clickable_div() {
	let clicked = Listener::new(|_| ());
	test_create_diff_identical_remove(move || element!("div", Props::new().listener("onClick", clicked.clone())), "<div></div>", 1);
}

static mut LOG_INITIALIZED: bool = false;

fn test_create_diff_identical_remove(vdom: impl Fn() -> Element, html: &str, closure_count: usize) {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container = document.create_element("section").unwrap();
	body.append_child(&container).unwrap();

	let mut renderer = Renderer::new(DomHost::new(document));

	renderer.render(vdom(), container.clone().into());
	assert!(container.inner_html().is_empty(), "nothing is attached before the commit");
	renderer.flush().unwrap();
	assert_eq!(container.inner_html(), html);
	assert_eq!(renderer.host().closure_count(), closure_count);

	renderer.render(vdom(), container.clone().into());
	let stats = renderer.flush().unwrap();
	assert_eq!(stats.placements, 0);
	assert_eq!(stats.deletions, 0);
	assert_eq!(stats.property_mutations, 0);
	assert_eq!(container.inner_html(), html);

	renderer.render(element!("template", Props::new()), container.clone().into());
	let stats = renderer.flush().unwrap();
	assert_eq!(stats.deletions, 1);
	assert_eq!(container.inner_html(), "<template></template>");
	assert_eq!(renderer.host().closure_count(), 0);

	body.remove_child(&container).unwrap();
}
