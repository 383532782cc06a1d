use crate::interface::config::{ConfigError, GenerateConfig};
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Generate C# P/Invoke bindings from C/C++ headers
#[derive(Parser, Debug)]
#[command(name = "pinvoke-bindgen", version, about)]
pub struct Cli {
    /// Header files or directories to bind
    #[arg(long = "file", visible_alias = "f", num_args = 1..)]
    pub files: Vec<String>,

    /// Namespace of the generated file
    #[arg(long = "namespace", visible_alias = "n")]
    pub namespace: Option<String>,

    /// Path of the generated C# file
    #[arg(long = "output", visible_alias = "o")]
    pub output: Option<String>,

    /// Library name or path used in every DllImport
    #[arg(long = "libraryPath", visible_alias = "l")]
    pub library: Option<String>,

    /// Include directories passed to the front end
    #[arg(long = "include", visible_alias = "i", num_args = 1..)]
    pub include_dirs: Vec<String>,

    /// Preprocessor definitions (NAME or NAME=VALUE)
    #[arg(long = "define", visible_alias = "d", num_args = 1..)]
    pub defines: Vec<String>,

    /// Extra front-end argument, passed verbatim (repeatable)
    #[arg(long = "additional", visible_alias = "a", allow_hyphen_values = true)]
    pub additional_args: Vec<String>,

    /// Prefix stripped from function names
    #[arg(long = "prefixStrip", visible_alias = "p")]
    pub prefix_strip: Option<String>,

    /// Name of the class holding the functions (default: Methods)
    #[arg(long = "methodClassName", visible_alias = "m")]
    pub container: Option<String>,

    /// Comma-separated native function names to leave out
    #[arg(long = "excludeFunctions", visible_alias = "e")]
    pub exclude: Option<String>,

    /// Header language (default: c++)
    #[arg(long = "language", value_parser = ["c", "c++"])]
    pub language: Option<String>,

    /// Keep `const char*` as IntPtr instead of marshalling it as string
    #[arg(long = "noStringMarshalling", action = ArgAction::SetTrue)]
    pub no_string_marshalling: bool,

    /// JSON configuration file; command line values take precedence
    #[arg(short = 'c', long = "config")]
    pub config_file: Option<PathBuf>,

    /// Verbose output
    #[arg(long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug output, including front-end notes
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Cli {
    /// Configuration from the optional file, overridden by the command line
    pub fn load_config(&self) -> Result<GenerateConfig, ConfigError> {
        let from_cli = GenerateConfig::from(self);
        match &self.config_file {
            Some(path) => {
                let mut config = GenerateConfig::from_file(path)?;
                config.merge(&from_cli);
                Ok(config)
            }
            None => Ok(from_cli),
        }
    }
}

impl From<&Cli> for GenerateConfig {
    fn from(cli: &Cli) -> Self {
        let defaults = GenerateConfig::default();
        GenerateConfig {
            inputs: cli.files.clone(),
            namespace: cli.namespace.clone().unwrap_or_default(),
            output: cli.output.clone().unwrap_or_default(),
            library: cli.library.clone().unwrap_or_default(),
            include_dirs: cli.include_dirs.clone(),
            defines: cli.defines.clone(),
            additional_args: cli.additional_args.clone(),
            prefix_strip: cli.prefix_strip.clone(),
            container: cli.container.clone().unwrap_or(defaults.container),
            exclude: cli
                .exclude
                .as_deref()
                .map(crate::analysis::naming::parse_name_list)
                .unwrap_or_default(),
            language: cli.language.clone().unwrap_or(defaults.language),
            marshal_strings: cli.no_string_marshalling.then_some(false),
            verbose: cli.verbose.then_some(true),
            debug: cli.debug.then_some(true),
        }
    }
}

/// Print the usage line followed by every configuration problem
pub fn print_config_errors(err: &ConfigError) {
    eprintln!("{}", Cli::command().render_usage());
    match err {
        ConfigError::Invalid(problems) => {
            for problem in problems {
                eprintln!("  error: {}", problem);
            }
        }
        other => eprintln!("  error: {}", other),
    }
}
