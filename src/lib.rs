//! This crate exposes Google Keep lists as task lists for a home-automation host.
//!
//! The remote service is reached through a [`KeepService`](traits::KeepService), an unofficial client that this crate never implements itself
//! (an in-memory `mock::MockKeep` is provided for tests, behind the `mock` cargo feature). \
//! A [`Session`] wraps such a client for one config entry, and implements the host's [`TaskListApi`](traits::TaskListApi). \
//! Every write goes through the [`reconcile`] module, that merges requested item texts into a remote list without duplicating
//! items that only differ by their case.
//!
//! On top of that, this crate provides what the host needs to run the integration:
//! a [`config_flow`] to set up an entry, a polling [`coordinator`], a [`todo`] entity, and the [`Integration`] that ties their lifecycles together. \
//! The earliest revision of the integration, a single `add_to_list` service, lives in the [`legacy`] module.

pub mod error;
pub use error::Error;
pub mod traits;

mod note;
pub use note::{Note, KeepList, TextNote};
mod item;
pub use item::ListItem;
mod task;
pub use task::{TaskStatus, TaskRecord, TaskListRecord, TaskUpdate};

pub mod reconcile;
pub mod session;
pub use session::Session;
pub mod coordinator;
pub mod todo;
pub mod config;
pub mod config_flow;
pub mod integration;
pub use integration::Integration;
pub mod legacy;

pub mod mock;
pub mod utils;
