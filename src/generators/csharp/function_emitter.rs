use super::context::ImportContext;
use super::templates::render_partial;
use super::Lowering;
use crate::analysis::type_mapper::calling_convention;
use crate::error::MappingError;
use crate::frontend::{CallingConvention, Cursor, CursorKind, Linkage};
use crate::models::{BindingSymbol, MappedType, ParameterBinding, SymbolBody, SymbolKind};
use tera::Tera;

/// Lower a function declaration into a `DllImport` signature.
///
/// Excluded functions and functions with internal linkage produce nothing.
pub fn lower(
    cursor: &Cursor,
    lowering: &Lowering,
) -> Result<Option<BindingSymbol>, MappingError> {
    let native = cursor.spelling.as_str();
    if lowering.naming.is_excluded(native) || cursor.linkage == Linkage::Internal {
        return Ok(None);
    }

    let signature = cursor.ty.function_signature().ok_or_else(|| {
        MappingError::UnsupportedType(format!("type of function `{}`", native))
    })?;
    if signature.variadic {
        return Err(MappingError::Variadic);
    }
    let convention = calling_convention(signature.calling_convention)?;

    let names: Vec<String> = cursor
        .children_of_kind(CursorKind::Parameter)
        .map(|param| param.spelling.clone())
        .collect();
    let names = if names.len() == signature.params.len() {
        names
    } else {
        Vec::new()
    };

    let (return_type, params) = lowering.mapper().map_signature(native, signature, &names)?;

    Ok(Some(BindingSymbol::new(
        SymbolKind::Function,
        native,
        lowering.naming.function_name(native),
        SymbolBody::Function {
            return_type,
            params,
            calling_convention: convention,
        },
    )))
}

/// Render a `DllImport` declaration bound to the native entry point
pub fn render(
    tera: &Tera,
    entry_point: &str,
    name: &str,
    return_type: &MappedType,
    params: &[ParameterBinding],
    convention: CallingConvention,
    library: &str,
) -> Result<String, tera::Error> {
    let context = ImportContext::new(entry_point, name, return_type, params, convention, library);
    render_partial(tera, "csharp/partials/dll_import.tera", &context)
}
