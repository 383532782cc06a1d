use super::context::{AliasContext, DelegateContext};
use super::templates::render_partial;
use super::Lowering;
use crate::analysis::naming::escape_identifier;
use crate::analysis::type_mapper::{MapScope, Position};
use crate::error::MappingError;
use crate::frontend::{Cursor, CursorKind, TypeDescriptor, TypeKind};
use crate::models::{BindingSymbol, DelegateSignature, MappedType, SymbolBody, SymbolKind};
use tera::Tera;

/// Lower a typedef into a delegate or a wrapper struct.
///
/// Returns `None` for typedefs that only give a record or enum the name it
/// already has.
pub fn lower(
    cursor: &Cursor,
    lowering: &Lowering,
) -> Result<Option<BindingSymbol>, MappingError> {
    let name = cursor.spelling.as_str();
    let underlying = underlying_type(cursor)
        .ok_or_else(|| MappingError::UnsupportedType(format!("typedef `{}`", name)))?;

    if is_redundant(name, underlying) {
        return Ok(None);
    }

    let mapper = lowering.mapper();

    if let Some(signature) = underlying.function_signature() {
        let names: Vec<String> = cursor
            .children_of_kind(CursorKind::Parameter)
            .map(|param| param.spelling.clone())
            .collect();
        let names = if names.len() == signature.params.len() {
            names
        } else {
            Vec::new()
        };
        let delegate = mapper.delegate(name.to_string(), signature, &names)?;
        return Ok(Some(BindingSymbol::new(
            SymbolKind::Typedef,
            name,
            escape_identifier(name),
            SymbolBody::Delegate(delegate),
        )));
    }

    let ty = mapper.map(underlying, Position::AliasTarget, &MapScope::new(name, "Value"))?;
    let field = match ty {
        MappedType::Handle(_) => "Pointer",
        _ => "Value",
    };

    Ok(Some(BindingSymbol::new(
        SymbolKind::Typedef,
        name,
        escape_identifier(name),
        SymbolBody::Alias {
            field: field.to_string(),
            ty,
        },
    )))
}

fn underlying_type(cursor: &Cursor) -> Option<&TypeDescriptor> {
    cursor.underlying.as_ref().or(match &cursor.ty.kind {
        TypeKind::Typedef { underlying, .. } => Some(underlying.as_ref()),
        _ => None,
    })
}

/// `typedef struct Foo Foo;` and friends
fn is_redundant(name: &str, underlying: &TypeDescriptor) -> bool {
    match &underlying.resolve_typedefs().kind {
        TypeKind::Record { name: Some(tag), .. } | TypeKind::Enum { name: Some(tag), .. } => {
            tag == name
        }
        _ => false,
    }
}

/// Render a wrapper struct that keeps the typedef name visible to callers
pub fn render_alias(
    tera: &Tera,
    name: &str,
    field: &str,
    ty: &MappedType,
) -> Result<String, tera::Error> {
    render_partial(tera, "csharp/partials/alias.tera", &AliasContext::new(name, field, ty))
}

/// Render a delegate declaration at the given indentation
pub fn render_delegate(
    tera: &Tera,
    delegate: &DelegateSignature,
    indent: &str,
) -> Result<String, tera::Error> {
    render_partial(tera, "csharp/partials/delegate.tera", &DelegateContext::new(delegate, indent))
}
