use crate::frontend::CallingConvention;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Fixed-width C# primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
}

impl Primitive {
    /// Integer primitive with exactly `bits` bits, if one exists
    pub fn integer(bits: u32, signed: bool) -> Option<Self> {
        match (bits, signed) {
            (8, true) => Some(Primitive::SByte),
            (8, false) => Some(Primitive::Byte),
            (16, true) => Some(Primitive::Short),
            (16, false) => Some(Primitive::UShort),
            (32, true) => Some(Primitive::Int),
            (32, false) => Some(Primitive::UInt),
            (64, true) => Some(Primitive::Long),
            (64, false) => Some(Primitive::ULong),
            _ => None,
        }
    }

    pub fn floating(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Primitive::Float),
            64 => Some(Primitive::Double),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::SByte => "sbyte",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::UShort => "ushort",
            Primitive::Int => "int",
            Primitive::UInt => "uint",
            Primitive::Long => "long",
            Primitive::ULong => "ulong",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Primitive::Byte | Primitive::UShort | Primitive::UInt | Primitive::ULong
        )
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Primitive::Float | Primitive::Double)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A native type expressed in the target representation.
/// Generators render it through a [`crate::generators::base::type_visitor::TypeVisitor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappedType {
    Void,
    Primitive(Primitive),
    /// C `_Bool`/`bool`, marshalled as a single byte
    Bool,
    /// Address-sized handle; keeps the pointee mapping for documentation
    /// and for callers inspecting the model
    Handle(Box<MappedType>),
    /// Pointee that has no target representation of its own
    Opaque,
    /// `const char*` marshalled as a string
    String,
    /// Inline fixed-length array
    ByValArray { element: Box<MappedType>, len: u64 },
    /// Inline `char[N]` marshalled as a string
    ByValString { len: u64 },
    /// Function pointer without a typedef name of its own
    Delegate(Box<DelegateSignature>),
    /// Reference to an emitted struct, enum, alias or delegate
    Named(String),
}

impl MappedType {
    /// Synthesized delegates this type declares, innermost first. Pointees
    /// behind a handle are descriptive only and declare nothing.
    pub fn collect_delegates(&self, out: &mut Vec<DelegateSignature>) {
        match self {
            MappedType::Delegate(signature) => {
                signature.return_type.collect_delegates(out);
                for param in &signature.params {
                    param.ty.collect_delegates(out);
                }
                out.push((**signature).clone());
            }
            MappedType::ByValArray { element, .. } => element.collect_delegates(out),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateSignature {
    pub name: String,
    pub return_type: MappedType,
    pub params: Vec<ParameterBinding>,
    pub calling_convention: CallingConvention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBinding {
    pub name: String,
    pub ty: MappedType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    /// Name in the emitted declaration (synthesized for anonymous members)
    pub name: String,
    pub native_name: String,
    pub ty: MappedType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Struct,
    Typedef,
    Enum,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Struct => write!(f, "struct"),
            SymbolKind::Typedef => write!(f, "typedef"),
            SymbolKind::Enum => write!(f, "enum"),
            SymbolKind::Function => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolBody {
    Record {
        is_union: bool,
        /// `Pack` value when the native record is packed below its natural alignment
        pack: Option<u64>,
        fields: Vec<FieldBinding>,
    },
    Enum {
        underlying: Primitive,
        members: Vec<EnumMember>,
    },
    /// Wrapper struct preserving a typedef name; `field` is `Pointer` or `Value`
    Alias { field: String, ty: MappedType },
    Delegate(DelegateSignature),
    Function {
        return_type: MappedType,
        params: Vec<ParameterBinding>,
        calling_convention: CallingConvention,
    },
}

/// One declaration ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSymbol {
    pub kind: SymbolKind,
    pub native_name: String,
    pub emitted_name: String,
    pub body: SymbolBody,
}

impl BindingSymbol {
    pub fn new(
        kind: SymbolKind,
        native_name: impl Into<String>,
        emitted_name: impl Into<String>,
        body: SymbolBody,
    ) -> Self {
        Self {
            kind,
            native_name: native_name.into(),
            emitted_name: emitted_name.into(),
            body,
        }
    }

    /// Synthesized delegates this symbol's fields or parameters refer to
    pub fn delegates(&self) -> Vec<DelegateSignature> {
        let mut out = Vec::new();
        match &self.body {
            SymbolBody::Record { fields, .. } => {
                for field in fields {
                    field.ty.collect_delegates(&mut out);
                }
            }
            SymbolBody::Alias { ty, .. } => ty.collect_delegates(&mut out),
            SymbolBody::Delegate(signature) => {
                collect_signature(&signature.return_type, &signature.params, &mut out)
            }
            SymbolBody::Function {
                return_type,
                params,
                ..
            } => collect_signature(return_type, params, &mut out),
            SymbolBody::Enum { .. } => {}
        }
        out
    }
}

fn collect_signature(
    return_type: &MappedType,
    params: &[ParameterBinding],
    out: &mut Vec<DelegateSignature>,
) {
    return_type.collect_delegates(out);
    for param in params {
        param.ty.collect_delegates(out);
    }
}

/// A declaration the generator could not represent exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSymbol {
    pub kind: SymbolKind,
    pub name: String,
    pub reason: String,
}

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub parsed_files: Vec<PathBuf>,
    pub failed_files: Vec<PathBuf>,
    pub structs: usize,
    pub typedefs: usize,
    pub enums: usize,
    pub functions: usize,
    pub skipped: Vec<SkippedSymbol>,
}

impl GenerationReport {
    pub fn emitted(&self) -> usize {
        self.structs + self.typedefs + self.enums + self.functions
    }

    pub(crate) fn count(&mut self, kind: SymbolKind) {
        match kind {
            SymbolKind::Struct => self.structs += 1,
            SymbolKind::Typedef => self.typedefs += 1,
            SymbolKind::Enum => self.enums += 1,
            SymbolKind::Function => self.functions += 1,
        }
    }
}
