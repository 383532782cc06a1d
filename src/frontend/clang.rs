//! libclang-backed front end.
//!
//! The native AST is converted into the owned model right after parsing and
//! the native translation unit is disposed before `parse` returns.

use super::{
    CallingConvention, Cursor, CursorKind, Diagnostic, Frontend, FunctionSignature, Layout,
    Linkage, ParseFailure, Severity, SourceLocation, TranslationUnit, TypeDescriptor, TypeKind,
};
use crate::error::{Error, Result};
use clang_sys::*;
use std::ffi::{CStr, CString};
use std::os::raw::{c_int, c_uint};
use std::path::{Path, PathBuf};
use std::ptr;

/// Front end parsing headers through a runtime-loaded libclang
pub struct ClangFrontend {
    index: CXIndex,
}

impl ClangFrontend {
    /// Load libclang and create an index
    pub fn new() -> Result<Self> {
        if !clang_sys::is_loaded() {
            clang_sys::load().map_err(Error::FrontendUnavailable)?;
        }
        let index = unsafe { clang_createIndex(0, 0) };
        if index.is_null() {
            return Err(Error::FrontendUnavailable(
                "failed to create clang index".to_string(),
            ));
        }
        Ok(Self { index })
    }
}

impl Drop for ClangFrontend {
    fn drop(&mut self) {
        unsafe { clang_disposeIndex(self.index) };
    }
}

impl Frontend for ClangFrontend {
    fn parse(
        &mut self,
        path: &Path,
        args: &[String],
    ) -> std::result::Result<TranslationUnit, ParseFailure> {
        let c_path = CString::new(path.to_string_lossy().as_ref())
            .map_err(|_| ParseFailure::new(path, "path contains a NUL byte"))?;
        let c_args = args
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ParseFailure::new(path, "compiler argument contains a NUL byte"))?;
        let arg_ptrs: Vec<_> = c_args.iter().map(|arg| arg.as_ptr()).collect();

        unsafe {
            let mut tu: CXTranslationUnit = ptr::null_mut();
            let code = clang_parseTranslationUnit2(
                self.index,
                c_path.as_ptr(),
                arg_ptrs.as_ptr(),
                arg_ptrs.len() as c_int,
                ptr::null_mut(),
                0,
                CXTranslationUnit_SkipFunctionBodies,
                &mut tu,
            );

            if code != CXError_Success || tu.is_null() {
                let mut failure =
                    ParseFailure::new(path, format!("libclang returned error code {}", code));
                if !tu.is_null() {
                    failure = failure.with_diagnostics(collect_diagnostics(tu));
                    clang_disposeTranslationUnit(tu);
                }
                return Err(failure);
            }

            let diagnostics = collect_diagnostics(tu);
            let root = convert_cursor(clang_getTranslationUnitCursor(tu));
            clang_disposeTranslationUnit(tu);

            Ok(TranslationUnit {
                path: path.to_path_buf(),
                root,
                diagnostics,
            })
        }
    }
}

unsafe fn cx_string(s: CXString) -> String {
    let c_str = clang_getCString(s);
    let result = if c_str.is_null() {
        String::new()
    } else {
        CStr::from_ptr(c_str).to_string_lossy().into_owned()
    };
    clang_disposeString(s);
    result
}

unsafe fn collect_diagnostics(tu: CXTranslationUnit) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for i in 0..clang_getNumDiagnostics(tu) {
        let diag = clang_getDiagnostic(tu, i);
        let severity = match clang_getDiagnosticSeverity(diag) {
            CXDiagnostic_Note => Some(Severity::Note),
            CXDiagnostic_Warning => Some(Severity::Warning),
            CXDiagnostic_Error => Some(Severity::Error),
            CXDiagnostic_Fatal => Some(Severity::Fatal),
            _ => None,
        };
        if let Some(severity) = severity {
            let message = cx_string(clang_formatDiagnostic(
                diag,
                clang_defaultDiagnosticDisplayOptions(),
            ));
            diagnostics.push(Diagnostic::new(severity, message));
        }
        clang_disposeDiagnostic(diag);
    }
    diagnostics
}

extern "C" fn collect_child(
    cursor: CXCursor,
    _parent: CXCursor,
    data: CXClientData,
) -> CXChildVisitResult {
    unsafe {
        let children = &mut *(data as *mut Vec<CXCursor>);
        children.push(cursor);
    }
    CXChildVisit_Continue
}

unsafe fn children(cursor: CXCursor) -> Vec<CXCursor> {
    let mut children: Vec<CXCursor> = Vec::new();
    clang_visitChildren(
        cursor,
        collect_child,
        &mut children as *mut Vec<CXCursor> as CXClientData,
    );
    children
}

fn cursor_kind(kind: CXCursorKind) -> CursorKind {
    match kind {
        CXCursor_TranslationUnit => CursorKind::TranslationUnit,
        CXCursor_StructDecl => CursorKind::Struct,
        CXCursor_UnionDecl => CursorKind::Union,
        CXCursor_ClassDecl | CXCursor_ClassTemplate => CursorKind::Class,
        CXCursor_EnumDecl => CursorKind::Enum,
        CXCursor_EnumConstantDecl => CursorKind::EnumConstant,
        CXCursor_TypedefDecl | CXCursor_TypeAliasDecl => CursorKind::Typedef,
        CXCursor_FunctionDecl => CursorKind::Function,
        CXCursor_CXXMethod | CXCursor_Constructor | CXCursor_Destructor => CursorKind::Method,
        CXCursor_FieldDecl => CursorKind::Field,
        CXCursor_ParmDecl => CursorKind::Parameter,
        CXCursor_VarDecl => CursorKind::Variable,
        CXCursor_Namespace => CursorKind::Namespace,
        CXCursor_LinkageSpec => CursorKind::LinkageSpec,
        CXCursor_UnexposedDecl => CursorKind::Unexposed,
        _ => CursorKind::Other,
    }
}

/// Kinds whose children the generator looks at
fn keeps_children(kind: CursorKind) -> bool {
    matches!(
        kind,
        CursorKind::TranslationUnit
            | CursorKind::LinkageSpec
            | CursorKind::Unexposed
            | CursorKind::Struct
            | CursorKind::Union
            | CursorKind::Enum
            | CursorKind::Typedef
            | CursorKind::Function
    )
}

unsafe fn location(cursor: CXCursor) -> SourceLocation {
    let loc = clang_getCursorLocation(cursor);
    let mut file: CXFile = ptr::null_mut();
    let mut line: c_uint = 0;
    let mut column: c_uint = 0;
    clang_getSpellingLocation(loc, &mut file, &mut line, &mut column, ptr::null_mut());

    let file = if file.is_null() {
        None
    } else {
        Some(PathBuf::from(cx_string(clang_getFileName(file))))
    };
    SourceLocation {
        file,
        line,
        column,
        is_main_file: clang_Location_isFromMainFile(loc) != 0,
    }
}

/// Spelling of an anonymous declaration is empty in the owned model
fn declaration_spelling(kind: CursorKind, spelling: String) -> String {
    if matches!(
        kind,
        CursorKind::Struct | CursorKind::Union | CursorKind::Enum
    ) && spelling.contains('(')
    {
        String::new()
    } else {
        spelling
    }
}

unsafe fn convert_cursor(cursor: CXCursor) -> Cursor {
    let kind = cursor_kind(clang_getCursorKind(cursor));
    let spelling = declaration_spelling(kind, cx_string(clang_getCursorSpelling(cursor)));
    let mut node = Cursor::new(kind, spelling, convert_type(clang_getCursorType(cursor)));
    node.location = location(cursor);
    node.is_definition = clang_isCursorDefinition(cursor) != 0;
    node.linkage = match clang_getCursorLinkage(cursor) {
        CXLinkage_Internal | CXLinkage_UniqueExternal => Linkage::Internal,
        CXLinkage_NoLinkage => Linkage::None,
        _ => Linkage::External,
    };

    match kind {
        CursorKind::Struct | CursorKind::Union => {
            node.is_anonymous_member = clang_Cursor_isAnonymousRecordDecl(cursor) != 0;
        }
        CursorKind::Field => {
            if clang_Cursor_isBitField(cursor) != 0 {
                node.bit_width = Some(clang_getFieldDeclBitWidth(cursor).max(0) as u32);
            }
            let offset = clang_Cursor_getOffsetOfField(cursor);
            if offset >= 0 {
                node.field_offset_bits = Some(offset as u64);
            }
        }
        CursorKind::EnumConstant => {
            let parent = clang_getCursorSemanticParent(cursor);
            let integer = clang_getCanonicalType(clang_getEnumDeclIntegerType(parent));
            node.enum_value = Some(if is_unsigned_kind(integer.kind) {
                clang_getEnumConstantDeclUnsignedValue(cursor) as i64
            } else {
                clang_getEnumConstantDeclValue(cursor)
            });
        }
        CursorKind::Enum => {
            node.underlying = Some(convert_type(clang_getEnumDeclIntegerType(cursor)));
        }
        CursorKind::Typedef => {
            node.underlying = Some(convert_type(clang_getTypedefDeclUnderlyingType(cursor)));
        }
        _ => {}
    }

    if keeps_children(kind) {
        node.children = children(cursor)
            .into_iter()
            .map(|child| convert_cursor(child))
            .collect();
    }
    node
}

fn is_unsigned_kind(kind: CXTypeKind) -> bool {
    matches!(
        kind,
        CXType_Char_U
            | CXType_UChar
            | CXType_Char16
            | CXType_Char32
            | CXType_UShort
            | CXType_UInt
            | CXType_ULong
            | CXType_ULongLong
            | CXType_UInt128
    )
}

unsafe fn layout(ty: CXType) -> Option<Layout> {
    let size = clang_Type_getSizeOf(ty);
    let align = clang_Type_getAlignOf(ty);
    if size < 0 || align < 0 {
        None
    } else {
        Some(Layout::new(size as u64, align as u64))
    }
}

/// Name a record or enum type is known by, `None` when anonymous
unsafe fn tag_name(decl: CXCursor) -> Option<String> {
    let spelling = cx_string(clang_getCursorSpelling(decl));
    if !spelling.is_empty() && !spelling.contains('(') {
        return Some(spelling);
    }
    // typedef names given to unnamed tags only show up in the type
    let type_spelling = cx_string(clang_getTypeSpelling(clang_getCursorType(decl)));
    unqualified_tag(&type_spelling).map(str::to_string)
}

/// Type spelling without the elaborated keyword and enclosing record
/// scopes, so `struct Shape::Origin` gives `Origin`
fn unqualified_tag(type_spelling: &str) -> Option<&str> {
    let name = ["struct ", "union ", "enum "]
        .iter()
        .find_map(|prefix| type_spelling.strip_prefix(prefix))
        .unwrap_or(type_spelling);
    if name.contains('(') {
        return None;
    }
    name.rsplit("::").next().filter(|name| !name.is_empty())
}

/// Declared inside a namespace, class or template. Records nested in a
/// plain struct or union keep their C meaning.
unsafe fn is_scoped(decl: CXCursor) -> bool {
    let mut parent = clang_getCursorSemanticParent(decl);
    while clang_Cursor_isNull(parent) == 0 {
        match clang_getCursorKind(parent) {
            CXCursor_Namespace
            | CXCursor_ClassDecl
            | CXCursor_ClassTemplate
            | CXCursor_ClassTemplatePartialSpecialization => return true,
            CXCursor_TranslationUnit => return false,
            kind if clang_isInvalid(kind) != 0 => return false,
            _ => parent = clang_getCursorSemanticParent(parent),
        }
    }
    false
}

unsafe fn convert_type(ty: CXType) -> TypeDescriptor {
    let is_const = clang_isConstQualifiedType(ty) != 0;
    let kind = match ty.kind {
        CXType_Elaborated => {
            let mut named = convert_type(clang_Type_getNamedType(ty));
            named.is_const |= is_const;
            return named;
        }
        CXType_Attributed => {
            let mut modified = convert_type(clang_Type_getModifiedType(ty));
            modified.is_const |= is_const;
            return modified;
        }
        CXType_Void => TypeKind::Void,
        CXType_Bool => TypeKind::Bool,
        CXType_Char_S | CXType_SChar => TypeKind::Char { signed: true },
        CXType_Char_U | CXType_UChar => TypeKind::Char { signed: false },
        CXType_Char16 | CXType_Char32 | CXType_WChar | CXType_UShort | CXType_UInt
        | CXType_ULong | CXType_ULongLong | CXType_UInt128 | CXType_Short | CXType_Int
        | CXType_Long | CXType_LongLong | CXType_Int128 => {
            let bits = (clang_Type_getSizeOf(ty).max(0) as u32) * 8;
            let signed = match ty.kind {
                // wchar_t signedness follows the target; treat it like int
                CXType_WChar => true,
                other => !is_unsigned_kind(other),
            };
            TypeKind::Integer { bits, signed }
        }
        CXType_Half | CXType_Float16 | CXType_Float | CXType_Double | CXType_LongDouble
        | CXType_Float128 => {
            let bits = (clang_Type_getSizeOf(ty).max(0) as u32) * 8;
            TypeKind::Float { bits }
        }
        CXType_Pointer => TypeKind::Pointer(Box::new(convert_type(clang_getPointeeType(ty)))),
        CXType_ConstantArray => TypeKind::ConstantArray {
            element: Box::new(convert_type(clang_getArrayElementType(ty))),
            len: clang_getArraySize(ty).max(0) as u64,
        },
        CXType_IncompleteArray => {
            TypeKind::IncompleteArray(Box::new(convert_type(clang_getArrayElementType(ty))))
        }
        CXType_FunctionProto | CXType_FunctionNoProto => {
            TypeKind::Function(convert_signature(ty))
        }
        CXType_Record => {
            let decl = clang_getTypeDeclaration(ty);
            if is_scoped(decl) {
                TypeKind::Unexposed(cx_string(clang_getTypeSpelling(ty)))
            } else {
                TypeKind::Record {
                    name: tag_name(decl),
                    is_union: clang_getCursorKind(decl) == CXCursor_UnionDecl,
                }
            }
        }
        CXType_Enum => {
            let decl = clang_getTypeDeclaration(ty);
            if is_scoped(decl) {
                TypeKind::Unexposed(cx_string(clang_getTypeSpelling(ty)))
            } else {
                TypeKind::Enum {
                    name: tag_name(decl),
                    integer: Box::new(convert_type(clang_getEnumDeclIntegerType(decl))),
                }
            }
        }
        CXType_Typedef => {
            let decl = clang_getTypeDeclaration(ty);
            TypeKind::Typedef {
                name: cx_string(clang_getTypedefName(ty)),
                underlying: Box::new(convert_type(clang_getTypedefDeclUnderlyingType(decl))),
            }
        }
        _ => {
            let canonical = clang_getCanonicalType(ty);
            if canonical.kind != ty.kind
                && canonical.kind != CXType_Unexposed
                && canonical.kind != CXType_Invalid
            {
                let mut resolved = convert_type(canonical);
                resolved.is_const |= is_const;
                return resolved;
            }
            TypeKind::Unexposed(cx_string(clang_getTypeSpelling(ty)))
        }
    };

    TypeDescriptor {
        kind,
        layout: layout(ty),
        is_const,
    }
}

unsafe fn convert_signature(ty: CXType) -> FunctionSignature {
    let count = clang_getNumArgTypes(ty).max(0) as c_uint;
    let params = (0..count)
        .map(|i| convert_type(clang_getArgType(ty, i)))
        .collect();
    let calling_convention = match clang_getFunctionTypeCallingConv(ty) {
        CXCallingConv_Default | CXCallingConv_C => CallingConvention::C,
        CXCallingConv_X86StdCall => CallingConvention::StdCall,
        CXCallingConv_X86FastCall => CallingConvention::FastCall,
        CXCallingConv_X86ThisCall => CallingConvention::ThisCall,
        other => CallingConvention::Other(other),
    };
    FunctionSignature {
        return_type: Box::new(convert_type(clang_getResultType(ty))),
        params,
        variadic: clang_isFunctionTypeVariadic(ty) != 0,
        calling_convention,
    }
}
