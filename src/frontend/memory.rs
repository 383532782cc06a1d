use super::{Frontend, ParseFailure, TranslationUnit};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Front end backed by pre-built translation units.
///
/// Lets callers that already hold an AST (or tests) drive the generator
/// without a native parser. Every call records the arguments it received.
#[derive(Debug, Default)]
pub struct InMemoryFrontend {
    units: HashMap<PathBuf, Result<TranslationUnit, ParseFailure>>,
    received_args: Vec<(PathBuf, Vec<String>)>,
}

impl InMemoryFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under its own path
    pub fn with_unit(mut self, unit: TranslationUnit) -> Self {
        self.add_unit(unit);
        self
    }

    pub fn add_unit(&mut self, unit: TranslationUnit) {
        self.units.insert(unit.path.clone(), Ok(unit));
    }

    /// Make parsing `failure.path` fail
    pub fn with_failure(mut self, failure: ParseFailure) -> Self {
        self.units.insert(failure.path.clone(), Err(failure));
        self
    }

    pub fn received_args(&self) -> &[(PathBuf, Vec<String>)] {
        &self.received_args
    }
}

impl Frontend for InMemoryFrontend {
    fn parse(&mut self, path: &Path, args: &[String]) -> Result<TranslationUnit, ParseFailure> {
        self.received_args.push((path.to_path_buf(), args.to_vec()));
        match self.units.get(path) {
            Some(result) => result.clone(),
            None => Err(ParseFailure::new(path, "no such translation unit")),
        }
    }
}
