use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

/// Global context available to all templates.
/// Carries no timestamp so repeated runs produce identical files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalContext {
    pub version: String,
    pub generator_name: String,
}

impl GlobalContext {
    pub fn new(generator_name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generator_name: generator_name.to_string(),
        }
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Register common templates used across all generators
pub fn register_common_templates(tera: &mut Tera) -> Result<(), tera::Error> {
    tera.add_raw_template("common/header.tera", include_str!("templates/header.tera"))
}

/// Render the auto-generated file header, without trailing newline
pub fn render_header(tera: &Tera, global: &GlobalContext) -> Result<String, tera::Error> {
    let context = Context::from_serialize(global)?;
    let header = tera.render("common/header.tera", &context)?;
    Ok(header.trim_end().to_string())
}
