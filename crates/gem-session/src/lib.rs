//! # gem-session
//!
//! Workflow controller for QueryGem. A [`Session`] owns the active database
//! handle and the state a front-end renders:
//!
//! - `select_file` → open → `load_schema` → seed the editor
//! - `run_query` / `ask_ai` → execute → result or error
//! - `close_connection` → confirm → `reset_session`
//!
//! Front-ends call the transition methods and draw [`SessionView`] snapshots,
//! either from [`Session::view`] or from a [`Session::subscribe`] receiver.

mod error;
mod session;
mod view;

pub use error::SessionError;
pub use session::{CLOSE_PROMPT, Session, SessionOptions};
pub use view::{Outcome, SessionView};
