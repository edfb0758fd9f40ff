// Edit session: the working copy of the resume, its placement and the
// bookkeeping for in-flight AI requests. One session per process.

pub mod controller;
pub mod handlers;
pub mod requests;

pub use controller::{ContactField, EditSession, SectionValue, SessionError};
