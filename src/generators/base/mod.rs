//! Pieces shared by target generators: type rendering, templates and the
//! output writer.

pub mod file_writer;
pub mod templates;
pub mod type_visitor;
