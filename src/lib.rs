//! # P/Invoke Bindgen
//!
//! Generate C# P/Invoke bindings from C and C++ headers.
//!
//! Headers are parsed with libclang into an owned AST. Structs, unions,
//! typedefs, enums and functions are lowered into C# declarations that
//! reproduce the native memory layout, and written into one source file.
//!
//! ## Features
//!
//! - 🏗️ **Layout Fidelity**: Struct and union offsets are checked against the native layout
//! - 🧩 **Anonymous Records**: Nested anonymous structs and unions are hoisted into named types
//! - 📞 **Function Pointers**: Function pointer typedefs and fields become delegates
//! - 🏷️ **Naming Control**: Prefix stripping, excluded functions and C# keyword escaping
//! - 🔁 **Multiple Headers**: Declarations shared between headers are emitted once
//!
//! ## Quick Start
//!
//! ```bash
//! pinvoke-bindgen --file include/vendor.h \
//!     --namespace Vendor.Native \
//!     --libraryPath vendor \
//!     --output Bindings.cs \
//!     --prefixStrip vendor_
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,no_run
//! use pinvoke_bindgen::{generate_from_config, GenerateConfig};
//!
//! let config = GenerateConfig {
//!     inputs: vec!["include/vendor.h".to_string()],
//!     namespace: "Vendor.Native".to_string(),
//!     output: "Bindings.cs".to_string(),
//!     library: "vendor".to_string(),
//!     verbose: Some(true),
//!     ..Default::default()
//! };
//!
//! let report = generate_from_config(&config)?;
//! println!("{} declarations bound", report.emitted());
//! # Ok::<(), pinvoke_bindgen::Error>(())
//! ```
//!
//! Without libclang, any [`frontend::Frontend`] can drive the same pipeline
//! through [`generate_with_frontend`].
//!
//! ## Example
//!
//! Given this header:
//!
//! ```c
//! typedef struct point { int x; int y; } point;
//! int vendor_distance(point a, point b);
//! ```
//!
//! The generated file contains:
//!
//! ```csharp
//! [StructLayout(LayoutKind.Sequential)]
//! public partial struct point
//! {
//!     public int x;
//!     public int y;
//! }
//!
//! [DllImport("vendor", CallingConvention = CallingConvention.Cdecl, EntryPoint = "vendor_distance")]
//! public static extern int distance(point a, point b);
//! ```

pub mod analysis;
mod error;
pub mod frontend;
pub mod generators;
pub mod interface;
pub mod models;

pub use error::{Error, MappingError, Result};
pub use models::*;

// Convenience re-exports for common use cases
pub use interface::config::GenerateConfig;
#[cfg(feature = "libclang")]
pub use interface::generate_from_config;
pub use interface::generate_with_frontend;
pub use interface::output::{Logger, ProgressReporter};
