pub mod cli;
pub mod config;
pub mod output;

use crate::analysis::naming::NamingPolicy;
use crate::error::{Error, Result};
use crate::frontend::{Frontend, TranslationUnit};
use crate::generators::{CSharpBindingsGenerator, FileWriter, GeneratorOptions};
use crate::models::GenerationReport;
use std::path::PathBuf;

pub use cli::*;
pub use config::*;
pub use output::*;

impl From<&GenerateConfig> for GeneratorOptions {
    fn from(config: &GenerateConfig) -> Self {
        GeneratorOptions {
            namespace: config.namespace.clone(),
            library: config.library.clone(),
            container: config.container.clone(),
            marshal_strings: config.should_marshal_strings(),
            naming: NamingPolicy::new(config.prefix_strip.as_deref(), config.exclude.clone()),
        }
    }
}

/// Generate bindings using libclang as the front end
#[cfg(feature = "libclang")]
pub fn generate_from_config(config: &GenerateConfig) -> Result<GenerationReport> {
    let logger = Logger::new(config.is_verbose(), config.is_debug());
    let frontend = crate::frontend::ClangFrontend::new()?;
    generate_with_frontend(config, frontend, &logger)
}

/// Run the whole pipeline with the given front end.
///
/// Files that fail to parse are reported and left out; the run only aborts
/// when none of them could be parsed. Declarations that cannot be bound are
/// reported as warnings and the rest of the output is still written.
pub fn generate_with_frontend<F: Frontend>(
    config: &GenerateConfig,
    mut frontend: F,
    logger: &Logger,
) -> Result<GenerationReport> {
    config.validate()?;

    let mut progress = ProgressReporter::new(logger.clone());
    let mut report = GenerationReport {
        output_path: PathBuf::from(&config.output),
        ..Default::default()
    };

    progress.begin(Step::Parse);
    let args = config.compiler_args();
    logger.debug(&format!("Front-end arguments: {}", args.join(" ")));
    let mut units: Vec<TranslationUnit> = Vec::new();
    for path in config.input_files() {
        progress.detail(&format!("Parsing {}", path.display()));
        match frontend.parse(&path, &args) {
            Ok(unit) => {
                let file = path.display().to_string();
                for diagnostic in &unit.diagnostics {
                    logger.diagnostic(&file, diagnostic);
                }
                report.parsed_files.push(path);
                units.push(unit);
            }
            Err(failure) => {
                let file = failure.path.display().to_string();
                for diagnostic in &failure.diagnostics {
                    logger.diagnostic(&file, diagnostic);
                }
                logger.error(&failure.to_string());
                report.failed_files.push(path);
            }
        }
    }
    if units.is_empty() {
        progress.fail("no input file could be parsed");
        return Err(Error::NoTranslationUnits(report.failed_files.len()));
    }
    progress.done(Some(&format!("{} file(s)", units.len())));

    progress.begin(Step::Generate);
    let generator = CSharpBindingsGenerator::new(GeneratorOptions::from(config))?;
    let bindings = generator.generate(&units)?;
    drop(units);
    for symbol in &bindings.symbols {
        report.count(symbol.kind);
        logger.verbose(&format!(
            "  {} {} -> {}",
            symbol.kind, symbol.native_name, symbol.emitted_name
        ));
    }
    for skipped in &bindings.skipped {
        logger.warning(&format!(
            "Skipped {} {}: {}",
            skipped.kind, skipped.name, skipped.reason
        ));
    }
    report.skipped = bindings.skipped;
    progress.done(Some(&format!("{} declaration(s)", report.emitted())));

    progress.begin(Step::Write);
    let writer = FileWriter::new(&config.output)?;
    if let Err(err) = writer.write(&bindings.source) {
        progress.fail(&err.to_string());
        return Err(err.into());
    }
    progress.done(None);

    progress.finish(&summary_line(&report));
    print_summary(logger, &report);
    Ok(report)
}
