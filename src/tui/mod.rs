//! Terminal user interface

pub mod app;
pub mod clipboard;
pub mod components;
pub mod executor;
pub mod message;
pub mod runtime;
pub mod theme;
pub mod view;
pub mod worker;

pub use app::{App, Focus};
pub use executor::Executor;
pub use message::{Command, Message};
pub use runtime::run;
pub use worker::{Policy, Ticket, WorkerSlot};
