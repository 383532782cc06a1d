use crate::generators::base::templates::register_common_templates;
use serde::Serialize;
use tera::{Context, Tera};

/// Create and configure a Tera template engine for the C# generator
pub fn create_template_engine() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    register_common_templates(&mut tera)?;
    register_templates(&mut tera)?;
    Ok(tera)
}

/// Register C#-specific templates from embedded strings
fn register_templates(tera: &mut Tera) -> Result<(), tera::Error> {
    macro_rules! template {
        ($name:expr, $path:expr) => {
            tera.add_raw_template($name, include_str!($path))?;
        };
    }

    template!("csharp/bindings.cs.tera", "templates/bindings.cs.tera");

    // One partial per declaration kind
    template!("csharp/partials/struct.tera", "templates/partials/struct.tera");
    template!("csharp/partials/enum.tera", "templates/partials/enum.tera");
    template!("csharp/partials/alias.tera", "templates/partials/alias.tera");
    template!("csharp/partials/delegate.tera", "templates/partials/delegate.tera");
    template!("csharp/partials/dll_import.tera", "templates/partials/dll_import.tera");

    Ok(())
}

/// Render a template with the given context
pub fn render(tera: &Tera, template_name: &str, context: &Context) -> Result<String, tera::Error> {
    tera.render(template_name, context)
}

/// Render one declaration partial from a serializable context. The fragment
/// always ends in exactly one newline.
pub fn render_partial<T: Serialize>(
    tera: &Tera,
    template_name: &str,
    context: &T,
) -> Result<String, tera::Error> {
    let context = Context::from_serialize(context)?;
    let mut fragment = render(tera, template_name, &context)?;
    let trimmed = fragment.trim_end_matches('\n').len();
    fragment.truncate(trimmed);
    fragment.push('\n');
    Ok(fragment)
}
