//! Object framing: headers, payload handles, sub-object iteration.

mod header;
mod object;

pub use header::ObjectHeader;
pub use object::{Object, ObjectView, SubObjects};
