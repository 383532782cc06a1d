use crate::frontend::{Diagnostic, Severity};
use crate::models::GenerationReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Error => "❌ ",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Info => "",
            LogLevel::Debug => "🔍 ",
            LogLevel::Verbose => "💬 ",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Warning)
    }
}

impl From<Severity> for LogLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error | Severity::Fatal => LogLevel::Error,
            Severity::Warning => LogLevel::Warning,
            // notes are only interesting while debugging a header setup
            Severity::Note => LogLevel::Debug,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    verbose: bool,
    debug: bool,
}

impl Logger {
    pub fn new(verbose: bool, debug: bool) -> Self {
        Self { verbose, debug }
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error | LogLevel::Warning | LogLevel::Info => true,
            LogLevel::Debug => self.debug || self.verbose,
            LogLevel::Verbose => self.verbose,
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.should_log(level) {
            return;
        }
        if level.to_stderr() {
            eprintln!("{}{}", level.prefix(), message);
        } else {
            println!("{}{}", level.prefix(), message);
        }
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }

    /// Log a front-end diagnostic for `file`
    pub fn diagnostic(&self, file: &str, diagnostic: &Diagnostic) {
        self.log(
            LogLevel::from(diagnostic.severity),
            &format!("{}: {}", file, diagnostic),
        );
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Stages of a generation run, in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Parse,
    Generate,
    Write,
}

impl Step {
    pub const COUNT: usize = 3;

    fn number(self) -> usize {
        match self {
            Step::Parse => 1,
            Step::Generate => 2,
            Step::Write => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Step::Parse => "Parsing headers",
            Step::Generate => "Generating bindings",
            Step::Write => "Writing output",
        }
    }

    fn title(self) -> String {
        format!("{} ({}/{})", self.label(), self.number(), Self::COUNT)
    }
}

/// Reports run progress: a spinner normally, one line per step in verbose
/// mode
pub struct ProgressReporter {
    logger: Logger,
    spinner: Option<ProgressBar>,
    current: Option<Step>,
}

impl ProgressReporter {
    pub fn new(logger: Logger) -> Self {
        let spinner = (!logger.is_verbose()).then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                spinner.set_style(
                    style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
                );
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });

        Self {
            logger,
            spinner,
            current: None,
        }
    }

    pub fn current_step(&self) -> Option<Step> {
        self.current
    }

    pub fn begin(&mut self, step: Step) {
        self.current = Some(step);
        match &self.spinner {
            Some(spinner) => spinner.set_message(step.title()),
            None => self.logger.info(&format!("🚀 {}", step.title())),
        }
    }

    /// Per-item detail, shown in verbose mode only
    pub fn detail(&self, message: &str) {
        self.logger.verbose(message);
    }

    pub fn done(&self, outcome: Option<&str>) {
        let Some(step) = self.current else {
            return;
        };
        if self.spinner.is_none() {
            match outcome {
                Some(outcome) => self.logger.info(&format!("✅ {} - {}", step.label(), outcome)),
                None => self.logger.info(&format!("✅ {}", step.label())),
            }
        }
    }

    pub fn fail(&self, error: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
        let step = self.current.map_or("Generation", Step::label);
        self.logger.error(&format!("{} failed: {}", step, error));
    }

    pub fn finish(&self, summary: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
        println!("✓ {}", summary);
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    format!("{} {}{}", count, word, if count == 1 { "" } else { "s" })
}

/// One-line summary of a run
pub fn summary_line(report: &GenerationReport) -> String {
    format!(
        "Generated {}, {}, {} and {} into {}",
        plural(report.structs, "struct"),
        plural(report.typedefs, "typedef"),
        plural(report.enums, "enum"),
        plural(report.functions, "function"),
        report.output_path.display()
    )
}

/// Warn about everything the run left out
pub fn print_summary(logger: &Logger, report: &GenerationReport) {
    if !report.failed_files.is_empty() {
        logger.warning(&format!(
            "{} could not be parsed",
            plural(report.failed_files.len(), "file")
        ));
    }
    if !report.skipped.is_empty() {
        logger.warning(&format!(
            "{} skipped (see warnings above)",
            plural(report.skipped.len(), "declaration")
        ));
    }
}
