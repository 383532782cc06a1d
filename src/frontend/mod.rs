//! Access to a C/C++ front end.
//!
//! The generator only ever sees the owned model in [`ast`]. Providers turn a
//! header path plus compiler arguments into a [`TranslationUnit`]; native
//! resources (if any) are released before `parse` returns.

pub mod ast;
#[cfg(feature = "libclang")]
pub mod clang;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub use ast::{
    CallingConvention, Cursor, CursorKind, Declarations, FunctionSignature, Layout, Linkage,
    SourceLocation, TypeDescriptor, TypeKind,
};
#[cfg(feature = "libclang")]
pub use clang::ClangFrontend;
pub use memory::InMemoryFrontend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// One parsed input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub path: PathBuf,
    pub root: Cursor,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslationUnit {
    pub fn new(path: impl Into<PathBuf>, children: Vec<Cursor>) -> Self {
        Self {
            path: path.into(),
            root: Cursor::translation_unit(children),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn declarations(&self) -> Declarations<'_> {
        self.root.declarations()
    }
}

/// The front end could not produce a usable AST for a file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse {}: {reason}", .path.display())]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseFailure {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// A C/C++ front end that parses one file at a time
pub trait Frontend {
    fn parse(&mut self, path: &Path, args: &[String]) -> Result<TranslationUnit, ParseFailure>;
}

impl<F: Frontend + ?Sized> Frontend for &mut F {
    fn parse(&mut self, path: &Path, args: &[String]) -> Result<TranslationUnit, ParseFailure> {
        (**self).parse(path, args)
    }
}

impl<F: Frontend + ?Sized> Frontend for Box<F> {
    fn parse(&mut self, path: &Path, args: &[String]) -> Result<TranslationUnit, ParseFailure> {
        (**self).parse(path, args)
    }
}
