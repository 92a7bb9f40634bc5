use fiber_dom::{
	element,
	host::memory::{HostOp, MemoryHost},
	Listener, Props, Renderer,
};
use std::{cell::RefCell, rc::Rc};

#[test]
fn listener_replacement_is_remove_then_add() {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let f = {
		let calls = Rc::clone(&calls);
		Listener::new(move |_| calls.borrow_mut().push("f"))
	};
	let g = {
		let calls = Rc::clone(&calls);
		Listener::new(move |_| calls.borrow_mut().push("g"))
	};

	let mut host = MemoryHost::new();
	let container = host.create_container("main");
	let mut renderer = Renderer::new(host);

	renderer.render(element!("button", Props::new().listener("onClick", f.clone()), "Go"), container);
	renderer.flush().unwrap();
	let button = renderer.host().node(container).children()[0];
	assert_eq!(renderer.host().dispatch(button, "click", &()), 1);
	assert_eq!(*calls.borrow(), vec!["f"]);

	renderer.host_mut().take_log();
	renderer.render(element!("button", Props::new().listener("onClick", g.clone()), "Go"), container);
	let stats = renderer.flush().unwrap();
	assert_eq!(stats.property_mutations, 2);
	assert_eq!(
		renderer.host_mut().take_log(),
		vec![
			HostOp::RemoveListener {
				node: button,
				event: "click".into(),
				listener: f.id(),
			},
			HostOp::AddListener {
				node: button,
				event: "click".into(),
				listener: g.id(),
			},
		]
	);

	assert_eq!(renderer.host().dispatch(button, "click", &()), 1);
	assert_eq!(*calls.borrow(), vec!["f", "g"]);
}

#[test]
fn same_listener_is_not_rebound() {
	let f = Listener::new(|_| ());
	let mut host = MemoryHost::new();
	let container = host.create_container("main");
	let mut renderer = Renderer::new(host);

	for _ in 0..3 {
		renderer.render(element!("input", Props::new().listener("onInput", f.clone())), container);
		renderer.flush().unwrap();
	}

	let input = renderer.host().node(container).children()[0];
	let bindings = renderer.host().log().iter().filter(|op| matches!(op, HostOp::AddListener { .. })).count();
	assert_eq!(bindings, 1);
	assert_eq!(renderer.host().node(input).listeners("input").count(), 1);
}

#[test]
fn removed_listener_no_longer_fires() {
	let count = Rc::new(RefCell::new(0));
	let f = {
		let count = Rc::clone(&count);
		Listener::new(move |payload| {
			assert_eq!(payload.downcast_ref::<&str>(), Some(&"payload"));
			*count.borrow_mut() += 1;
		})
	};

	let mut host = MemoryHost::new();
	let container = host.create_container("main");
	let mut renderer = Renderer::new(host);

	renderer.render(element!("div", Props::new().listener("onMouseDown", f)), container);
	renderer.flush().unwrap();
	let div = renderer.host().node(container).children()[0];
	renderer.host().dispatch(div, "mousedown", &"payload");
	assert_eq!(*count.borrow(), 1);

	renderer.render(element!("div", Props::new()), container);
	renderer.flush().unwrap();
	assert_eq!(renderer.host().dispatch(div, "mousedown", &"payload"), 0);
	assert_eq!(*count.borrow(), 1);
}

#[test]
fn deleted_subtrees_unbind_their_listeners() {
	let f = Listener::new(|_| ());
	let g = Listener::new(|_| ());
	let mut host = MemoryHost::new();
	let container = host.create_container("main");
	let mut renderer = Renderer::new(host);

	renderer.render(
		element!(
			"form",
			Props::new().listener("onSubmit", f.clone()),
			element!("button", Props::new().listener("onClick", g.clone()), "Send")
		),
		container,
	);
	renderer.flush().unwrap();
	let form = renderer.host().node(container).children()[0];
	let button = renderer.host().node(form).children()[0];

	renderer.host_mut().take_log();
	renderer.render(element!("p", Props::new(), "Sent"), container);
	let stats = renderer.flush().unwrap();
	assert_eq!(stats.deletions, 1);

	let log = renderer.host_mut().take_log();
	let removed_at = log.iter().position(|op| *op == HostOp::RemoveChild { parent: container, child: form }).unwrap();
	let unbound: Vec<_> = log
		.iter()
		.enumerate()
		.filter(|(_, op)| matches!(op, HostOp::RemoveListener { .. }))
		.map(|(i, op)| (i > removed_at, op.clone()))
		.collect();
	assert_eq!(
		unbound,
		vec![
			(
				true,
				HostOp::RemoveListener {
					node: form,
					event: "submit".into(),
					listener: f.id(),
				}
			),
			(
				true,
				HostOp::RemoveListener {
					node: button,
					event: "click".into(),
					listener: g.id(),
				}
			),
		]
	);
	assert_eq!(renderer.host().dispatch(button, "click", &()), 0);
}
