pub mod base;
pub mod csharp;

pub use base::file_writer::FileWriter;
pub use csharp::{CSharpBindingsGenerator, GeneratedBindings, GeneratorOptions};
