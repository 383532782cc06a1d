use super::context::RecordContext;
use super::templates::render_partial;
use super::Lowering;
use crate::analysis::naming::escape_identifier;
use crate::analysis::type_mapper::{MapScope, Position, TypeMapper};
use crate::error::MappingError;
use crate::frontend::{Cursor, CursorKind, Layout, TypeDescriptor, TypeKind};
use crate::models::{BindingSymbol, FieldBinding, MappedType, SymbolBody, SymbolKind};
use std::collections::BTreeSet;
use tera::Tera;

/// Lower a struct or union definition.
///
/// Anonymous nested records become symbols of their own and precede the
/// record that contains them in the returned list.
pub fn lower(cursor: &Cursor, lowering: &Lowering) -> Result<Vec<BindingSymbol>, MappingError> {
    let name = cursor.type_name().ok_or(MappingError::AnonymousType)?;
    let mut out = Vec::new();
    lower_record(cursor, name, lowering, &mut out)?;
    Ok(out)
}

/// Whether the last record of a [`lower`] result holds no managed
/// reference, looking through the hoisted records that precede it.
pub fn is_blittable(symbols: &[BindingSymbol], mapper: &TypeMapper) -> bool {
    let mut plain = BTreeSet::new();
    let mut last = false;
    for symbol in symbols {
        last = match &symbol.body {
            SymbolBody::Record { fields, .. } => fields.iter().all(|field| match &field.ty {
                MappedType::Named(name) if plain.contains(name) => true,
                ty => mapper.is_blittable(ty),
            }),
            _ => false,
        };
        if last {
            plain.insert(symbol.native_name.clone());
        }
    }
    last
}

/// Hoisted records overlap their siblings when the parent is a union
fn check_overlap(
    hoisted: &[BindingSymbol],
    name: &str,
    is_union: bool,
    mapper: &TypeMapper,
) -> Result<(), MappingError> {
    if is_union && !is_blittable(hoisted, mapper) {
        return Err(MappingError::UnionMember(format!(
            "struct `{}` holding a managed reference",
            name
        )));
    }
    Ok(())
}

/// Size and position of one member as reported by the front end
struct MemberLayout {
    name: String,
    layout: Option<Layout>,
    offset_bits: Option<u64>,
}

fn lower_record(
    cursor: &Cursor,
    emitted: &str,
    lowering: &Lowering,
    out: &mut Vec<BindingSymbol>,
) -> Result<(), MappingError> {
    let is_union = cursor.kind == CursorKind::Union;
    let emitted_name = escape_identifier(emitted);
    let mapper = lowering.mapper();
    let position = Position::Field { in_union: is_union };

    let mut fields = Vec::new();
    let mut members = Vec::new();
    // nameless record definition waiting for the field that declares it
    let mut pending: Option<&Cursor> = None;
    let mut last_hoisted: Option<String> = None;
    let mut anonymous_members = 0;

    for child in &cursor.children {
        match child.kind {
            CursorKind::Struct | CursorKind::Union if child.is_definition => {
                if child.is_anonymous_member {
                    let field_name = format!("Anonymous{}", anonymous_members);
                    anonymous_members += 1;
                    let hoisted = format!("{}_{}", emitted, field_name);
                    let start = out.len();
                    lower_record(child, &hoisted, lowering, out)
                        .and_then(|_| check_overlap(&out[start..], &hoisted, is_union, &mapper))
                        .map_err(|err| err.in_field(&field_name))?;
                    members.push(MemberLayout {
                        name: field_name.clone(),
                        layout: child.ty.layout,
                        offset_bits: None,
                    });
                    fields.push(FieldBinding {
                        name: field_name.clone(),
                        native_name: String::new(),
                        ty: MappedType::Named(hoisted),
                    });
                } else if child.type_name().is_none() {
                    pending = Some(child);
                }
            }
            CursorKind::Field => {
                let native = child.spelling.as_str();
                if child.bit_width.is_some() {
                    return Err(MappingError::BitField(native.to_string()));
                }

                let mut scope = MapScope::new(emitted, native);
                if refers_to_anonymous_record(&child.ty) {
                    let hoisted = match pending.take() {
                        Some(record) => {
                            let hoisted = format!("{}_{}", emitted, native);
                            let start = out.len();
                            lower_record(record, &hoisted, lowering, out)
                                .and_then(|_| {
                                    check_overlap(&out[start..], &hoisted, is_union, &mapper)
                                })
                                .map_err(|err| err.in_field(native))?;
                            last_hoisted = Some(hoisted.clone());
                            hoisted
                        }
                        // `struct { ... } a, b;` declares both fields with one record
                        None => last_hoisted
                            .clone()
                            .ok_or_else(|| MappingError::AnonymousType.in_field(native))?,
                    };
                    scope = scope.with_anonymous_record(hoisted);
                }

                let ty = mapper
                    .map(&child.ty, position, &scope)
                    .map_err(|err| err.in_field(native))?;

                let mut name = escape_identifier(native);
                // members may not share the name of their enclosing type
                if name == emitted_name {
                    name.push('_');
                }
                members.push(MemberLayout {
                    name: name.clone(),
                    layout: child.ty.layout,
                    offset_bits: child.field_offset_bits,
                });
                fields.push(FieldBinding {
                    name,
                    native_name: native.to_string(),
                    ty,
                });
            }
            _ => {}
        }
    }

    if fields.is_empty() {
        return Err(MappingError::EmptyRecord);
    }

    let pack = match cursor.ty.layout {
        Some(record) => check_layout(record, &members, is_union)?,
        None => None,
    };

    out.push(BindingSymbol::new(
        SymbolKind::Struct,
        cursor.type_name().unwrap_or(emitted),
        emitted_name,
        SymbolBody::Record {
            is_union,
            pack,
            fields,
        },
    ));
    Ok(())
}

/// Whether the field's type is a nameless record, directly or through
/// pointers and arrays
fn refers_to_anonymous_record(ty: &TypeDescriptor) -> bool {
    match &ty.kind {
        TypeKind::Record { name: None, .. } => true,
        TypeKind::Pointer(inner) | TypeKind::IncompleteArray(inner) => {
            refers_to_anonymous_record(inner)
        }
        TypeKind::ConstantArray { element, .. } => refers_to_anonymous_record(element),
        _ => false,
    }
}

fn align_up(value: u64, align: u64) -> u64 {
    if align <= 1 {
        value
    } else {
        value.div_ceil(align) * align
    }
}

/// Recompute the managed sequential (or explicit, for unions) layout and
/// compare it with the native one. Returns the `Pack` value the managed
/// declaration needs, if any.
///
/// Skipped when a member's layout is unknown.
fn check_layout(
    record: Layout,
    members: &[MemberLayout],
    is_union: bool,
) -> Result<Option<u64>, MappingError> {
    let Some(layouts) = members
        .iter()
        .map(|member| member.layout)
        .collect::<Option<Vec<Layout>>>()
    else {
        return Ok(None);
    };

    let natural = layouts.iter().map(|layout| layout.align).max().unwrap_or(1);
    if record.align > natural {
        return Err(MappingError::OverAligned {
            align: record.align,
            natural,
        });
    }
    let pack = (record.align < natural).then_some(record.align);

    let mut end = 0;
    for (member, layout) in members.iter().zip(&layouts) {
        let align = layout.align.min(record.align);
        let offset = if is_union { 0 } else { align_up(end, align) };
        if let Some(bits) = member.offset_bits {
            if bits % 8 != 0 || bits / 8 != offset {
                return Err(MappingError::LayoutMismatch(format!(
                    "field `{}` is at bit offset {} but would be placed at byte {}",
                    member.name, bits, offset
                )));
            }
        }
        end = if is_union {
            end.max(layout.size)
        } else {
            offset + layout.size
        };
    }

    let size = align_up(end, record.align);
    if size != record.size {
        return Err(MappingError::LayoutMismatch(format!(
            "native size is {} bytes but the managed layout takes {}",
            record.size, size
        )));
    }

    Ok(pack)
}

/// Render a struct or union declaration
pub fn render(
    tera: &Tera,
    name: &str,
    is_union: bool,
    pack: Option<u64>,
    fields: &[FieldBinding],
) -> Result<String, tera::Error> {
    let context = RecordContext::new(name, is_union, pack, fields);
    render_partial(tera, "csharp/partials/struct.tera", &context)
}
