//! Generated entity configuration to JDL reconstruction.

mod entities;
mod options;

pub use entities::parse_entities;
pub use options::parse_server_options;
