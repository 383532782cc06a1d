use crate::analysis::naming::escape_identifier;
use crate::analysis::registry::SymbolRegistry;
use crate::error::MappingError;
use crate::frontend::{CallingConvention, FunctionSignature, TypeDescriptor, TypeKind};
use crate::models::{DelegateSignature, MappedType, ParameterBinding, Primitive};

/// Where a type occurs; several rules depend on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Field { in_union: bool },
    Parameter,
    Return,
    AliasTarget,
    Pointee,
    ArrayElement,
}

const UNION_MEMBER: Position = Position::Field { in_union: true };

/// Names available to a mapping that synthesizes declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapScope {
    owner: String,
    member: String,
    anonymous_record: Option<String>,
}

impl MapScope {
    pub fn new(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
            anonymous_record: None,
        }
    }

    /// Name an anonymous record type met in this scope
    pub fn with_anonymous_record(mut self, name: impl Into<String>) -> Self {
        self.anonymous_record = Some(name.into());
        self
    }

    /// `<owner>_<member>`
    pub fn delegate_name(&self) -> String {
        format!("{}_{}", self.owner, self.member)
    }
}

pub fn calling_convention(cc: CallingConvention) -> Result<CallingConvention, MappingError> {
    match cc {
        CallingConvention::Other(raw) => Err(MappingError::UnsupportedCallingConvention(raw)),
        supported => Ok(supported),
    }
}

/// Maps native types to their P/Invoke representation
pub struct TypeMapper<'r> {
    registry: &'r SymbolRegistry,
    marshal_strings: bool,
}

impl<'r> TypeMapper<'r> {
    pub fn new(registry: &'r SymbolRegistry, marshal_strings: bool) -> Self {
        Self {
            registry,
            marshal_strings,
        }
    }

    pub fn map(
        &self,
        ty: &TypeDescriptor,
        position: Position,
        scope: &MapScope,
    ) -> Result<MappedType, MappingError> {
        match &ty.kind {
            TypeKind::Typedef { name, underlying } => {
                // delegates are references and cannot overlap in unions
                if position == UNION_MEMBER && ty.function_signature().is_some()
                {
                    return Ok(MappedType::Handle(Box::new(MappedType::Opaque)));
                }
                if self.registry.is_alias(name) {
                    if position == UNION_MEMBER && !self.registry.is_blittable(name) {
                        return Err(MappingError::UnionMember(format!(
                            "wrapper `{}` holding a managed reference",
                            name
                        )));
                    }
                    Ok(MappedType::Named(name.clone()))
                } else {
                    self.map(underlying, position, scope)
                }
            }
            TypeKind::Void => match position {
                Position::Return | Position::Pointee => Ok(MappedType::Void),
                _ => Err(MappingError::UnsupportedType("void".to_string())),
            },
            TypeKind::Bool => Ok(MappedType::Bool),
            TypeKind::Char { signed } => Ok(MappedType::Primitive(if *signed {
                Primitive::SByte
            } else {
                Primitive::Byte
            })),
            TypeKind::Integer { bits, signed } => Primitive::integer(*bits, *signed)
                .map(MappedType::Primitive)
                .ok_or_else(|| MappingError::UnsupportedType(format!("{}-bit integer", bits))),
            TypeKind::Float { bits } => Primitive::floating(*bits)
                .map(MappedType::Primitive)
                .ok_or_else(|| {
                    MappingError::UnsupportedType(format!("{}-bit floating point", bits))
                }),
            TypeKind::Pointer(pointee) => self.map_pointer(ty, pointee, position, scope),
            TypeKind::ConstantArray { element, .. } => match position {
                Position::Field { in_union: true } => {
                    Err(MappingError::UnionMember("inline array".to_string()))
                }
                Position::Parameter => Ok(MappedType::Handle(Box::new(
                    self.map_pointee(element, scope),
                ))),
                Position::Return => Err(MappingError::UnsupportedType(
                    "array return value".to_string(),
                )),
                _ => self.map_inline_array(ty, position, scope),
            },
            TypeKind::IncompleteArray(element) => match position {
                Position::Field { .. } => Err(MappingError::FlexibleArrayMember),
                _ => Ok(MappedType::Handle(Box::new(
                    self.map_pointee(element, scope),
                ))),
            },
            TypeKind::Function(_) => Err(MappingError::UnsupportedType(
                "function type used by value".to_string(),
            )),
            TypeKind::Record { name, .. } => match name {
                Some(name) if self.registry.has_record(name) => {
                    if position == UNION_MEMBER && !self.registry.is_blittable(name) {
                        return Err(MappingError::UnionMember(format!(
                            "struct `{}` holding a managed reference",
                            name
                        )));
                    }
                    Ok(MappedType::Named(name.clone()))
                }
                Some(name) => Err(MappingError::IncompleteType(name.clone())),
                None => scope
                    .anonymous_record
                    .clone()
                    .map(MappedType::Named)
                    .ok_or(MappingError::AnonymousType),
            },
            TypeKind::Enum { name, integer } => match name {
                Some(name) if self.registry.has_enum(name) => Ok(MappedType::Named(name.clone())),
                _ => self.map(integer, position, scope),
            },
            TypeKind::Unexposed(spelling) => Err(MappingError::UnsupportedType(spelling.clone())),
        }
    }

    /// Whether the managed form of `ty` holds no object reference. Union
    /// members must not, since they all start at offset 0.
    pub fn is_blittable(&self, ty: &MappedType) -> bool {
        match ty {
            MappedType::Void
            | MappedType::Primitive(_)
            | MappedType::Bool
            | MappedType::Handle(_)
            | MappedType::Opaque => true,
            MappedType::String
            | MappedType::ByValString { .. }
            | MappedType::ByValArray { .. }
            | MappedType::Delegate(_) => false,
            MappedType::Named(name) => {
                self.registry.has_enum(name) || self.registry.is_blittable(name)
            }
        }
    }

    /// Mapping of a pointee. Never fails: anything without a
    /// representation of its own becomes opaque.
    fn map_pointee(&self, pointee: &TypeDescriptor, scope: &MapScope) -> MappedType {
        match self.map(pointee, Position::Pointee, scope) {
            Ok(MappedType::Void) | Err(_) => MappedType::Opaque,
            Ok(mapped) => mapped,
        }
    }

    fn map_pointer(
        &self,
        ty: &TypeDescriptor,
        pointee: &TypeDescriptor,
        position: Position,
        scope: &MapScope,
    ) -> Result<MappedType, MappingError> {
        if let Some(signature) = ty.function_signature() {
            if matches!(
                position,
                Position::Field { in_union: true } | Position::Pointee | Position::ArrayElement
            ) {
                return Ok(MappedType::Handle(Box::new(MappedType::Opaque)));
            }
            if let TypeKind::Typedef { name, .. } = &pointee.kind {
                if self.registry.is_alias(name) {
                    return Ok(MappedType::Named(name.clone()));
                }
            }
            let delegate = self.delegate(scope.delegate_name(), signature, &[])?;
            return Ok(MappedType::Delegate(Box::new(delegate)));
        }

        let string_position = matches!(
            position,
            Position::Parameter | Position::Field { in_union: false }
        );
        if self.marshal_strings && string_position && is_const_char(pointee) {
            return Ok(MappedType::String);
        }

        Ok(MappedType::Handle(Box::new(
            self.map_pointee(pointee, scope),
        )))
    }

    fn map_inline_array(
        &self,
        ty: &TypeDescriptor,
        position: Position,
        scope: &MapScope,
    ) -> Result<MappedType, MappingError> {
        let (element, len, dimensions) = flatten_array(ty);
        if len == 0 {
            return Err(MappingError::FlexibleArrayMember);
        }

        let text_position = matches!(position, Position::Field { .. } | Position::AliasTarget);
        if self.marshal_strings
            && text_position
            && dimensions == 1
            && matches!(element.resolve_typedefs().kind, TypeKind::Char { .. })
        {
            return Ok(MappedType::ByValString { len });
        }

        let element = self.map(element, Position::ArrayElement, scope)?;
        Ok(MappedType::ByValArray {
            element: Box::new(element),
            len,
        })
    }

    /// Signature of a function or delegate named `owner`. Parameters without
    /// a name in `names` are called `arg<N>`.
    pub fn map_signature(
        &self,
        owner: &str,
        signature: &FunctionSignature,
        names: &[String],
    ) -> Result<(MappedType, Vec<ParameterBinding>), MappingError> {
        let return_type = self.map(
            &signature.return_type,
            Position::Return,
            &MapScope::new(owner, "return"),
        )?;

        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let native = names
                    .get(i)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("arg{}", i));
                let ty = self
                    .map(param, Position::Parameter, &MapScope::new(owner, native.as_str()))
                    .map_err(|err| err.in_parameter(&native))?;
                Ok(ParameterBinding {
                    name: escape_identifier(&native),
                    ty,
                })
            })
            .collect::<Result<Vec<_>, MappingError>>()?;

        Ok((return_type, params))
    }

    pub fn delegate(
        &self,
        name: String,
        signature: &FunctionSignature,
        names: &[String],
    ) -> Result<DelegateSignature, MappingError> {
        if signature.variadic {
            return Err(MappingError::Variadic);
        }
        let calling_convention = calling_convention(signature.calling_convention)?;
        let (return_type, params) = self.map_signature(&name, signature, names)?;
        Ok(DelegateSignature {
            name,
            return_type,
            params,
            calling_convention,
        })
    }
}

/// `char` qualified `const` anywhere along its typedef chain
fn is_const_char(ty: &TypeDescriptor) -> bool {
    let mut is_const = ty.is_const;
    let mut current = ty;
    while let TypeKind::Typedef { underlying, .. } = &current.kind {
        current = underlying;
        is_const |= current.is_const;
    }
    is_const && matches!(current.kind, TypeKind::Char { .. })
}

/// Innermost element, total element count and number of dimensions
fn flatten_array(ty: &TypeDescriptor) -> (&TypeDescriptor, u64, usize) {
    let mut current = ty;
    let mut len = 1u64;
    let mut dimensions = 0;
    while let TypeKind::ConstantArray { element, len: n } = &current.resolve_typedefs().kind {
        len = len.saturating_mul(*n);
        dimensions += 1;
        current = element;
    }
    (current, len, dimensions)
}
