use super::context::EnumContext;
use super::templates::render_partial;
use crate::analysis::naming::escape_identifier;
use crate::error::MappingError;
use crate::frontend::{Cursor, CursorKind, TypeDescriptor, TypeKind};
use crate::models::{BindingSymbol, EnumMember, Primitive, SymbolBody, SymbolKind};
use tera::Tera;

/// Lower an enum definition. Every member gets an explicit value; omitted
/// values continue from the previous member.
pub fn lower(cursor: &Cursor) -> Result<BindingSymbol, MappingError> {
    let name = cursor.type_name().ok_or(MappingError::AnonymousType)?;
    let underlying = underlying_primitive(cursor)?;

    let mut members = Vec::new();
    let mut previous: Option<i64> = None;
    for constant in cursor.children_of_kind(CursorKind::EnumConstant) {
        let value = constant
            .enum_value
            .unwrap_or_else(|| previous.map_or(0, |value| value.wrapping_add(1)));
        previous = Some(value);
        members.push(EnumMember {
            name: escape_identifier(&constant.spelling),
            value,
        });
    }

    Ok(BindingSymbol::new(
        SymbolKind::Enum,
        name,
        escape_identifier(name),
        SymbolBody::Enum {
            underlying,
            members,
        },
    ))
}

fn underlying_primitive(cursor: &Cursor) -> Result<Primitive, MappingError> {
    let integer: Option<&TypeDescriptor> = cursor.underlying.as_ref().or(match &cursor.ty.kind {
        TypeKind::Enum { integer, .. } => Some(integer.as_ref()),
        _ => None,
    });

    match integer.map(|ty| ty.canonical().kind) {
        Some(TypeKind::Integer { bits, signed }) => Primitive::integer(bits, signed)
            .ok_or_else(|| MappingError::UnsupportedType(format!("{}-bit enum", bits))),
        Some(TypeKind::Char { signed: true }) => Ok(Primitive::SByte),
        Some(TypeKind::Char { signed: false }) | Some(TypeKind::Bool) => Ok(Primitive::Byte),
        _ => Ok(Primitive::Int),
    }
}

/// Render an enum declaration
pub fn render(
    tera: &Tera,
    name: &str,
    underlying: Primitive,
    members: &[EnumMember],
) -> Result<String, tera::Error> {
    render_partial(tera, "csharp/partials/enum.tera", &EnumContext::new(name, underlying, members))
}
