use crate::analysis::naming::escape_identifier;
use crate::frontend::CallingConvention;
use crate::models::{MappedType, Primitive};

/// Visitor pattern for converting MappedType to target-specific type representations
pub trait TypeVisitor {
    /// Convert a MappedType to the target language's type string
    fn visit_type(&self, mapped: &MappedType) -> String {
        match mapped {
            MappedType::Void => self.visit_void(),
            MappedType::Primitive(prim) => self.visit_primitive(*prim),
            MappedType::Bool => self.visit_bool(),
            MappedType::Handle(_) | MappedType::Opaque => self.visit_handle(),
            MappedType::String | MappedType::ByValString { .. } => self.visit_string(),
            MappedType::ByValArray { element, .. } => self.visit_array(element),
            MappedType::Delegate(signature) => self.visit_named(&signature.name),
            MappedType::Named(name) => self.visit_named(name),
        }
    }

    /// Visit a fixed-width primitive
    fn visit_primitive(&self, primitive: Primitive) -> String;

    fn visit_void(&self) -> String {
        "void".to_string()
    }

    fn visit_bool(&self) -> String {
        "bool".to_string()
    }

    /// Visit a pointer-sized handle
    fn visit_handle(&self) -> String;

    fn visit_string(&self) -> String;

    /// Visit an inline array
    fn visit_array(&self, element: &MappedType) -> String {
        format!("{}[]", self.visit_type(element))
    }

    /// Visit a reference to an emitted declaration
    fn visit_named(&self, name: &str) -> String {
        name.to_string()
    }
}

/// C# visitor - converts MappedType to C# types and marshalling attributes
pub struct CSharpVisitor;

impl TypeVisitor for CSharpVisitor {
    fn visit_primitive(&self, primitive: Primitive) -> String {
        primitive.keyword().to_string()
    }

    fn visit_handle(&self) -> String {
        "IntPtr".to_string()
    }

    fn visit_string(&self) -> String {
        "string".to_string()
    }

    fn visit_named(&self, name: &str) -> String {
        escape_identifier(name)
    }
}

impl CSharpVisitor {
    /// `MarshalAs` arguments needed to give the type its native layout
    pub fn marshal_as(&self, mapped: &MappedType) -> Option<String> {
        match mapped {
            MappedType::Bool => Some("MarshalAs(UnmanagedType.U1)".to_string()),
            MappedType::String => Some("MarshalAs(UnmanagedType.LPStr)".to_string()),
            MappedType::ByValString { len } => Some(format!(
                "MarshalAs(UnmanagedType.ByValTStr, SizeConst = {})",
                len
            )),
            MappedType::ByValArray { element, len } => match **element {
                MappedType::Bool => Some(format!(
                    "MarshalAs(UnmanagedType.ByValArray, SizeConst = {}, ArraySubType = UnmanagedType.U1)",
                    len
                )),
                _ => Some(format!(
                    "MarshalAs(UnmanagedType.ByValArray, SizeConst = {})",
                    len
                )),
            },
            _ => None,
        }
    }

    /// Type with an inline `[MarshalAs]` prefix, as used for parameters
    pub fn visit_parameter(&self, mapped: &MappedType) -> String {
        match self.marshal_as(mapped) {
            Some(attribute) => format!("[{}] {}", attribute, self.visit_type(mapped)),
            None => self.visit_type(mapped),
        }
    }

    pub fn calling_convention(&self, cc: CallingConvention) -> &'static str {
        match cc {
            CallingConvention::C => "Cdecl",
            CallingConvention::StdCall => "StdCall",
            CallingConvention::FastCall => "FastCall",
            CallingConvention::ThisCall => "ThisCall",
            // rejected while lowering; the platform default is the closest match
            CallingConvention::Other(_) => "Winapi",
        }
    }
}
