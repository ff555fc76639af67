//! stopstart - terminal console for the stop/start schedule API.
//!
//! ## Architecture
//!
//! - **App**: session state (current compartment, level, open form) with
//!   ticketed transitions
//! - **ConfigForm**: local draft of one instance's schedule
//! - **View**: pure text renderers for breadcrumb, lists and form
//! - **Console**: runs requests as tasks and feeds results back into the App
//! - **Commands**: clap front end (interactive console plus one-shot commands)

pub mod action;
pub mod app;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod logging;
pub mod output;
pub mod seq;
pub mod view;

pub use app::{App, NavigationRequest};
pub use console::{Applied, Completion, Console, Outcome};
pub use form::{ConfigForm, ConfigLoadRequest, ConfigSaveRequest, SaveOutcome};
