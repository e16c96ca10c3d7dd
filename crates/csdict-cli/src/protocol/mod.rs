//! DICT wire format: request lines, reply line classification, and line
//! reading.

mod reader;
mod request;
mod status;

pub(crate) use reader::read_server_line;
pub use request::{ALL_DICTIONARIES, Request, Strategy};
pub use status::{LineKind, ServerLine, StatusCode};
