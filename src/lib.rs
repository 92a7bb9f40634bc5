//! An incremental, interruptible fiber reconciler.
//!
//! [`build`] describes the desired tree as immutable [`Element`]s.
//! [`Renderer::render`] schedules it into a container of a [`HostTree`],
//! and the host environment pumps [`Renderer::work_loop`] with a [`Deadline`] until the new tree is committed.
//!
//! Building the work-in-progress tree may be interrupted between any two fibers.
//! The commit, which attaches, detaches and updates host nodes, always runs in one go.
//!
//! Children are matched by position and type only. A reordered child list is replaced rather than moved.

#![doc(html_root_url = "https://docs.rs/fiber-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod build;
mod closure_map;
mod commit;
pub mod deadline;
pub mod element;
mod fiber;
pub mod host;
mod idle;
mod rc_hash_map;
mod reconcile;
mod renderer;

pub use crate::{
	build::{build, text, Child},
	commit::CommitStats,
	deadline::Deadline,
	element::{Element, ElementType, Listener, Props, Property, Value},
	host::HostTree,
	idle::IdleLoop,
	renderer::{Phase, Renderer, RendererOptions, Slice},
};
