use crate::generators::base::templates::{render_header, GlobalContext};
use crate::generators::csharp::templates::render;
use tera::{Context, Tera};

/// Collects rendered fragments and lays out the compilation unit: header,
/// namespace, usings, types, then the function container.
#[derive(Debug, Default)]
pub struct OutputAssembler {
    types: Vec<String>,
    functions: Vec<String>,
}

impl OutputAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a namespace-level declaration
    pub fn push_type(&mut self, fragment: String) {
        self.types.push(fragment);
    }

    /// Append a member of the function container
    pub fn push_function(&mut self, fragment: String) {
        self.functions.push(fragment);
    }

    pub fn finish(
        self,
        tera: &Tera,
        global: &GlobalContext,
        namespace: &str,
        container: &str,
    ) -> Result<String, tera::Error> {
        let mut types = self.types.join("\n");
        if !types.is_empty() {
            types.push('\n');
        }

        let mut context = Context::new();
        context.insert("header", &render_header(tera, global)?);
        context.insert("namespace", namespace);
        context.insert("container", container);
        context.insert("types", &types);
        context.insert("functions", &self.functions.join("\n"));

        let rendered = render(tera, "csharp/bindings.cs.tera", &context)?;
        Ok(normalize_line_endings(&rendered))
    }
}

/// LF only, ending in exactly one newline
fn normalize_line_endings(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
