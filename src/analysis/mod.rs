//! Target-independent analysis of the parsed declarations: which ones are
//! bound, what their types become and how they are named.

pub mod classifier;
pub mod naming;
pub mod registry;
pub mod type_mapper;

pub use classifier::{classify, DeclKind};
pub use naming::NamingPolicy;
pub use registry::{Scope, SymbolIndex, SymbolRegistry};
pub use type_mapper::{MapScope, Position, TypeMapper};
