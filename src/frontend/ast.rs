use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declaration kind of a cursor, as reported by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorKind {
    TranslationUnit,
    Struct,
    Union,
    /// C++ `class`; never emitted
    Class,
    Enum,
    EnumConstant,
    Typedef,
    Function,
    /// C++ member function; never emitted
    Method,
    Field,
    Parameter,
    Variable,
    Namespace,
    /// `extern "C" { ... }`
    LinkageSpec,
    Unexposed,
    Other,
}

impl CursorKind {
    /// Containers the declaration walk looks through
    pub fn is_transparent(&self) -> bool {
        matches!(
            self,
            CursorKind::TranslationUnit | CursorKind::LinkageSpec | CursorKind::Unexposed
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(self, CursorKind::Struct | CursorKind::Union)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Linkage {
    #[default]
    External,
    Internal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallingConvention {
    #[default]
    C,
    StdCall,
    FastCall,
    ThisCall,
    /// Any convention without a P/Invoke counterpart (vectorcall, regcall, ...)
    Other(i32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: u32,
    pub column: u32,
    /// Whether the declaration lives in the file that was handed to the parser
    pub is_main_file: bool,
}

impl SourceLocation {
    pub fn main_file(line: u32) -> Self {
        Self {
            file: None,
            line,
            column: 1,
            is_main_file: true,
        }
    }

    pub fn included(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column: 1,
            is_main_file: false,
        }
    }
}

/// Size and alignment in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
}

impl Layout {
    pub fn new(size: u64, align: u64) -> Self {
        Self { size, align }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    pub return_type: Box<TypeDescriptor>,
    pub params: Vec<TypeDescriptor>,
    pub variadic: bool,
    pub calling_convention: CallingConvention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Void,
    Bool,
    /// Plain `char`, `signed char` or `unsigned char`
    Char { signed: bool },
    Integer { bits: u32, signed: bool },
    Float { bits: u32 },
    Pointer(Box<TypeDescriptor>),
    ConstantArray {
        element: Box<TypeDescriptor>,
        len: u64,
    },
    IncompleteArray(Box<TypeDescriptor>),
    Function(FunctionSignature),
    /// `name` is `None` for records that have neither a tag nor a typedef name
    Record { name: Option<String>, is_union: bool },
    Enum {
        name: Option<String>,
        integer: Box<TypeDescriptor>,
    },
    Typedef {
        name: String,
        underlying: Box<TypeDescriptor>,
    },
    /// Anything the front end could not describe structurally (templates,
    /// references, vectors, ...)
    Unexposed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub layout: Option<Layout>,
    #[serde(default)]
    pub is_const: bool,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            layout: None,
            is_const: false,
        }
    }

    pub fn with_layout(mut self, size: u64, align: u64) -> Self {
        self.layout = Some(Layout::new(size, align));
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Bool).with_layout(1, 1)
    }

    pub fn char(signed: bool) -> Self {
        Self::new(TypeKind::Char { signed }).with_layout(1, 1)
    }

    pub fn integer(bits: u32, signed: bool) -> Self {
        let bytes = u64::from(bits / 8);
        Self::new(TypeKind::Integer { bits, signed }).with_layout(bytes, bytes)
    }

    pub fn float(bits: u32) -> Self {
        let bytes = u64::from(bits / 8);
        Self::new(TypeKind::Float { bits }).with_layout(bytes, bytes)
    }

    /// Pointers are described for a 64-bit target
    pub fn pointer(pointee: TypeDescriptor) -> Self {
        Self::new(TypeKind::Pointer(Box::new(pointee))).with_layout(8, 8)
    }

    pub fn array(element: TypeDescriptor, len: u64) -> Self {
        let layout = element.layout.map(|l| Layout::new(l.size * len, l.align));
        Self {
            kind: TypeKind::ConstantArray {
                element: Box::new(element),
                len,
            },
            layout,
            is_const: false,
        }
    }

    pub fn incomplete_array(element: TypeDescriptor) -> Self {
        Self::new(TypeKind::IncompleteArray(Box::new(element)))
    }

    pub fn function(return_type: TypeDescriptor, params: Vec<TypeDescriptor>) -> Self {
        Self::new(TypeKind::Function(FunctionSignature {
            return_type: Box::new(return_type),
            params,
            variadic: false,
            calling_convention: CallingConvention::C,
        }))
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Record {
            name: Some(name.into()),
            is_union: false,
        })
    }

    pub fn anonymous_record(is_union: bool) -> Self {
        Self::new(TypeKind::Record {
            name: None,
            is_union,
        })
    }

    pub fn enumeration(name: impl Into<String>, integer: TypeDescriptor) -> Self {
        let layout = integer.layout;
        Self {
            kind: TypeKind::Enum {
                name: Some(name.into()),
                integer: Box::new(integer),
            },
            layout,
            is_const: false,
        }
    }

    pub fn typedef(name: impl Into<String>, underlying: TypeDescriptor) -> Self {
        let layout = underlying.layout;
        Self {
            kind: TypeKind::Typedef {
                name: name.into(),
                underlying: Box::new(underlying),
            },
            layout,
            is_const: false,
        }
    }

    pub fn unexposed(spelling: impl Into<String>) -> Self {
        Self::new(TypeKind::Unexposed(spelling.into()))
    }

    /// The type with every typedef resolved, including typedefs nested
    /// in pointers, arrays and function signatures
    pub fn canonical(&self) -> TypeDescriptor {
        let kind = match &self.kind {
            TypeKind::Typedef { underlying, .. } => {
                let mut canonical = underlying.canonical();
                canonical.is_const |= self.is_const;
                return canonical;
            }
            TypeKind::Pointer(pointee) => TypeKind::Pointer(Box::new(pointee.canonical())),
            TypeKind::ConstantArray { element, len } => TypeKind::ConstantArray {
                element: Box::new(element.canonical()),
                len: *len,
            },
            TypeKind::IncompleteArray(element) => {
                TypeKind::IncompleteArray(Box::new(element.canonical()))
            }
            TypeKind::Function(signature) => TypeKind::Function(FunctionSignature {
                return_type: Box::new(signature.return_type.canonical()),
                params: signature.params.iter().map(|p| p.canonical()).collect(),
                variadic: signature.variadic,
                calling_convention: signature.calling_convention,
            }),
            other => other.clone(),
        };
        TypeDescriptor {
            kind,
            layout: self.layout,
            is_const: self.is_const,
        }
    }

    /// Structural equivalence of the typedef-resolved forms
    pub fn is_equivalent(&self, other: &TypeDescriptor) -> bool {
        self.canonical() == other.canonical()
    }

    /// Strips typedefs from the outermost level only
    pub fn resolve_typedefs(&self) -> &TypeDescriptor {
        match &self.kind {
            TypeKind::Typedef { underlying, .. } => underlying.resolve_typedefs(),
            _ => self,
        }
    }

    /// The signature when this is a function or a pointer to one, looking
    /// through typedefs on both levels
    pub fn function_signature(&self) -> Option<&FunctionSignature> {
        match &self.resolve_typedefs().kind {
            TypeKind::Function(signature) => Some(signature),
            TypeKind::Pointer(pointee) => match &pointee.resolve_typedefs().kind {
                TypeKind::Function(signature) => Some(signature),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One node of a parsed translation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub kind: CursorKind,
    /// Source identifier; empty for anonymous declarations
    pub spelling: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub children: Vec<Cursor>,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub is_definition: bool,
    /// Record declared without a declarator inside another record (C11
    /// anonymous struct/union member)
    #[serde(default)]
    pub is_anonymous_member: bool,
    #[serde(default)]
    pub linkage: Linkage,
    /// Enum constant value; `None` when the source omitted it
    #[serde(default)]
    pub enum_value: Option<i64>,
    #[serde(default)]
    pub bit_width: Option<u32>,
    #[serde(default)]
    pub field_offset_bits: Option<u64>,
    /// Typedef target or enum integer type
    #[serde(default)]
    pub underlying: Option<TypeDescriptor>,
}

impl Cursor {
    pub fn new(kind: CursorKind, spelling: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            ty,
            children: Vec::new(),
            location: SourceLocation::main_file(1),
            is_definition: false,
            is_anonymous_member: false,
            linkage: Linkage::External,
            enum_value: None,
            bit_width: None,
            field_offset_bits: None,
            underlying: None,
        }
    }

    pub fn translation_unit(children: Vec<Cursor>) -> Self {
        let mut root = Self::new(CursorKind::TranslationUnit, "", TypeDescriptor::void());
        root.children = children;
        root
    }

    pub fn with_children(mut self, children: Vec<Cursor>) -> Self {
        self.children = children;
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self
    }

    /// The name a record or enum is known by: its tag, or the typedef name
    /// the front end attached to an otherwise anonymous declaration
    pub fn type_name(&self) -> Option<&str> {
        if !self.spelling.is_empty() {
            return Some(&self.spelling);
        }
        match &self.ty.kind {
            TypeKind::Record { name, .. } | TypeKind::Enum { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Restartable pre-order walk over the declarations reachable from this
    /// cursor (see [`Declarations`])
    pub fn declarations(&self) -> Declarations<'_> {
        Declarations {
            stack: vec![self.children.iter()],
        }
    }

    pub fn children_of_kind(&self, kind: CursorKind) -> impl Iterator<Item = &Cursor> {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}

/// Lazy depth-first pre-order iterator over declaration cursors.
///
/// Descends into transparent containers (`extern "C"` blocks, unexposed
/// declarations) and into record definitions, whose nested tags are file
/// scoped in C. Namespaces, C++ classes, functions and enums are yielded
/// but never entered.
pub struct Declarations<'a> {
    stack: Vec<std::slice::Iter<'a, Cursor>>,
}

impl<'a> Iterator for Declarations<'a> {
    type Item = &'a Cursor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(cursor) => {
                    let enter = cursor.kind.is_transparent()
                        || (cursor.kind.is_record() && cursor.is_definition);
                    if enter && !cursor.children.is_empty() {
                        self.stack.push(cursor.children.iter());
                    }
                    return Some(cursor);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
