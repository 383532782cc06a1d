use crate::analysis::naming::{is_keyword, parse_name_list};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const IDENTIFIER: &str = r"^@?[A-Za-z_][A-Za-z0-9_]*$";
const DEFINE: &str = r"^[A-Za-z_][A-Za-z0-9_]*(=.*)?$";

/// Header extensions picked up when an input is a directory
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerateConfig {
    /// Header files or directories of headers to bind
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Namespace of the generated file
    #[serde(default)]
    pub namespace: String,

    /// Path of the generated C# file
    #[serde(default)]
    pub output: String,

    /// Library name or path used in every `DllImport`
    #[serde(default)]
    pub library: String,

    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Preprocessor definitions, `NAME` or `NAME=VALUE`
    #[serde(default)]
    pub defines: Vec<String>,

    /// Passed to the front end verbatim, after the generated arguments
    #[serde(default)]
    pub additional_args: Vec<String>,

    /// Prefix removed from function names (not from entry points)
    #[serde(default)]
    pub prefix_strip: Option<String>,

    /// Static class that holds the function imports
    #[serde(default = "default_container")]
    pub container: String,

    /// Native function names that are not bound. Accepts a list or a
    /// comma-separated string.
    #[serde(default, deserialize_with = "name_list")]
    pub exclude: Vec<String>,

    /// Source language of the headers: `c` or `c++`
    #[serde(default = "default_language")]
    pub language: String,

    /// Marshal `const char*` as `string`
    #[serde(default)]
    pub marshal_strings: Option<bool>,

    #[serde(default)]
    pub verbose: Option<bool>,

    #[serde(default)]
    pub debug: Option<bool>,
}

fn default_container() -> String {
    "Methods".to_string()
}

fn default_language() -> String {
    "c++".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    List(Vec<String>),
    Joined(String),
}

fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NameList::deserialize(deserializer)? {
        NameList::List(names) => names.iter().flat_map(|name| parse_name_list(name)).collect(),
        NameList::Joined(names) => parse_name_list(&names),
    })
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            namespace: String::new(),
            output: String::new(),
            library: String::new(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            additional_args: Vec::new(),
            prefix_strip: None,
            container: default_container(),
            exclude: Vec::new(),
            language: default_language(),
            marshal_strings: None,
            verbose: None,
            debug: None,
        }
    }
}

impl GenerateConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file. The result is not validated,
    /// since command line values may still be merged in.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check every setting and report all problems at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let identifier = Regex::new(IDENTIFIER)?;
        let define = Regex::new(DEFINE)?;
        let mut problems = Vec::new();

        if self.inputs.is_empty() {
            problems.push("no input file given (--file)".to_string());
        }
        if self.output.trim().is_empty() {
            problems.push("no output file given (--output)".to_string());
        }
        if self.library.trim().is_empty() {
            problems.push("no library given (--libraryPath)".to_string());
        }

        if self.namespace.trim().is_empty() {
            problems.push("no namespace given (--namespace)".to_string());
        } else if !self
            .namespace
            .split('.')
            .all(|segment| identifier.is_match(segment) && !is_keyword(segment))
        {
            problems.push(format!("invalid namespace: {}", self.namespace));
        }

        if !identifier.is_match(&self.container) || is_keyword(&self.container) {
            problems.push(format!("invalid class name: {}", self.container));
        }

        for name in self.defines.iter().filter(|name| !define.is_match(name)) {
            problems.push(format!("invalid define: {}", name));
        }

        if !matches!(self.language.as_str(), "c" | "c++") {
            problems.push(format!(
                "invalid language: {}. Use 'c' or 'c++'",
                self.language
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Merge with another configuration, with other taking precedence
    pub fn merge(&mut self, other: &GenerateConfig) {
        if !other.inputs.is_empty() {
            self.inputs = other.inputs.clone();
        }
        if !other.namespace.is_empty() {
            self.namespace = other.namespace.clone();
        }
        if !other.output.is_empty() {
            self.output = other.output.clone();
        }
        if !other.library.is_empty() {
            self.library = other.library.clone();
        }
        if !other.include_dirs.is_empty() {
            self.include_dirs = other.include_dirs.clone();
        }
        if !other.defines.is_empty() {
            self.defines = other.defines.clone();
        }
        if !other.additional_args.is_empty() {
            self.additional_args = other.additional_args.clone();
        }
        if other.prefix_strip.is_some() {
            self.prefix_strip = other.prefix_strip.clone();
        }
        if other.container != default_container() {
            self.container = other.container.clone();
        }
        if !other.exclude.is_empty() {
            self.exclude = other.exclude.clone();
        }
        if other.language != default_language() {
            self.language = other.language.clone();
        }
        if other.marshal_strings.is_some() {
            self.marshal_strings = other.marshal_strings;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }

    /// Front-end arguments: language mode, include directories, defines,
    /// then the additional arguments verbatim
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec!["-x".to_string(), self.language.clone()];
        args.extend(self.include_dirs.iter().map(|dir| format!("-I{}", dir)));
        args.extend(self.defines.iter().map(|define| format!("-D{}", define)));
        args.extend(self.additional_args.iter().cloned());
        args
    }

    /// Input files, with directories expanded to the headers they contain
    /// (sorted). Other paths are returned as given.
    pub fn input_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for input in &self.inputs {
            let path = Path::new(input);
            if !path.is_dir() {
                files.push(path.to_path_buf());
                continue;
            }
            let mut headers: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|file| is_header(file))
                .collect();
            headers.sort();
            files.extend(headers);
        }
        files
    }

    /// Get effective verbose setting
    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn should_marshal_strings(&self) -> bool {
        self.marshal_strings.unwrap_or(true)
    }
}

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
}
