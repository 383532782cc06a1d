//! Template contexts for the C# partials.
//!
//! Every type string, attribute and literal is computed here through the
//! [`CSharpVisitor`]; the templates only lay the pieces out.

use super::{MEMBER_INDENT, TYPE_INDENT};
use crate::analysis::naming::string_literal;
use crate::frontend::CallingConvention;
use crate::generators::base::type_visitor::{CSharpVisitor, TypeVisitor};
use crate::models::{DelegateSignature, EnumMember, FieldBinding, MappedType, ParameterBinding, Primitive};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    pub name: String,
    pub type_name: String,
    pub marshal_as: Option<String>,
}

impl FieldContext {
    pub fn from_binding(field: &FieldBinding, visitor: &CSharpVisitor) -> Self {
        Self {
            name: field.name.clone(),
            type_name: visitor.visit_type(&field.ty),
            marshal_as: visitor.marshal_as(&field.ty),
        }
    }
}

/// Parameter with its `[MarshalAs]` prefix folded into the type
#[derive(Debug, Clone, Serialize)]
pub struct ParameterContext {
    pub name: String,
    pub type_name: String,
}

impl ParameterContext {
    pub fn from_binding(param: &ParameterBinding, visitor: &CSharpVisitor) -> Self {
        Self {
            name: param.name.clone(),
            type_name: visitor.visit_parameter(&param.ty),
        }
    }

    fn list(params: &[ParameterBinding], visitor: &CSharpVisitor) -> Vec<Self> {
        params
            .iter()
            .map(|param| Self::from_binding(param, visitor))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordContext {
    pub indent: &'static str,
    pub member_indent: &'static str,
    pub name: String,
    pub layout: String,
    pub is_union: bool,
    pub fields: Vec<FieldContext>,
}

impl RecordContext {
    pub fn new(name: &str, is_union: bool, pack: Option<u64>, fields: &[FieldBinding]) -> Self {
        let visitor = CSharpVisitor;
        let layout = match (is_union, pack) {
            (true, _) => "LayoutKind.Explicit".to_string(),
            (false, Some(pack)) => format!("LayoutKind.Sequential, Pack = {}", pack),
            (false, None) => "LayoutKind.Sequential".to_string(),
        };
        Self {
            indent: TYPE_INDENT,
            member_indent: MEMBER_INDENT,
            name: name.to_string(),
            layout,
            is_union,
            fields: fields
                .iter()
                .map(|field| FieldContext::from_binding(field, &visitor))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumMemberContext {
    pub name: String,
    /// Literal as written in C#; unsigned types show the raw bit pattern
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumContext {
    pub indent: &'static str,
    pub member_indent: &'static str,
    pub name: String,
    pub underlying: &'static str,
    pub members: Vec<EnumMemberContext>,
}

impl EnumContext {
    pub fn new(name: &str, underlying: Primitive, members: &[EnumMember]) -> Self {
        Self {
            indent: TYPE_INDENT,
            member_indent: MEMBER_INDENT,
            name: name.to_string(),
            underlying: underlying.keyword(),
            members: members
                .iter()
                .map(|member| EnumMemberContext {
                    name: member.name.clone(),
                    value: enum_literal(member.value, underlying),
                })
                .collect(),
        }
    }
}

fn enum_literal(value: i64, underlying: Primitive) -> String {
    let bits = match underlying {
        Primitive::Byte => 8,
        Primitive::UShort => 16,
        Primitive::UInt => 32,
        Primitive::ULong => 64,
        _ => return value.to_string(),
    };
    let raw = value as u64;
    let masked = if bits == 64 {
        raw
    } else {
        raw & ((1u64 << bits) - 1)
    };
    masked.to_string()
}

/// Wrapper struct around a typedef target
#[derive(Debug, Clone, Serialize)]
pub struct AliasContext {
    pub indent: &'static str,
    pub member_indent: &'static str,
    pub name: String,
    pub field: String,
    /// Constructor parameter
    pub param: String,
    pub field_type: String,
    pub marshal_as: Option<String>,
}

impl AliasContext {
    pub fn new(name: &str, field: &str, ty: &MappedType) -> Self {
        let visitor = CSharpVisitor;
        Self {
            indent: TYPE_INDENT,
            member_indent: MEMBER_INDENT,
            name: name.to_string(),
            field: field.to_string(),
            param: field.to_lowercase(),
            field_type: visitor.visit_type(ty),
            marshal_as: visitor.marshal_as(ty),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DelegateContext {
    pub indent: String,
    pub name: String,
    pub calling_convention: &'static str,
    pub return_type: String,
    pub return_marshal_as: Option<String>,
    pub params: Vec<ParameterContext>,
}

impl DelegateContext {
    pub fn new(delegate: &DelegateSignature, indent: &str) -> Self {
        let visitor = CSharpVisitor;
        Self {
            indent: indent.to_string(),
            name: visitor.visit_named(&delegate.name),
            calling_convention: visitor.calling_convention(delegate.calling_convention),
            return_type: visitor.visit_type(&delegate.return_type),
            return_marshal_as: visitor.marshal_as(&delegate.return_type),
            params: ParameterContext::list(&delegate.params, &visitor),
        }
    }
}

/// `DllImport` declaration inside the function container
#[derive(Debug, Clone, Serialize)]
pub struct ImportContext {
    pub indent: &'static str,
    pub library: String,
    pub entry_point: String,
    pub calling_convention: &'static str,
    pub name: String,
    pub return_type: String,
    pub return_marshal_as: Option<String>,
    pub params: Vec<ParameterContext>,
}

impl ImportContext {
    pub fn new(
        entry_point: &str,
        name: &str,
        return_type: &MappedType,
        params: &[ParameterBinding],
        convention: CallingConvention,
        library: &str,
    ) -> Self {
        let visitor = CSharpVisitor;
        Self {
            indent: MEMBER_INDENT,
            library: string_literal(library),
            entry_point: string_literal(entry_point),
            calling_convention: visitor.calling_convention(convention),
            name: name.to_string(),
            return_type: visitor.visit_type(return_type),
            return_marshal_as: visitor.marshal_as(return_type),
            params: ParameterContext::list(params, &visitor),
        }
    }
}
