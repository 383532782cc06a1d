use crate::interface::config::ConfigError;
use serde::{ser::Serializer, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No translation unit could be parsed ({0} input file(s) failed)")]
    NoTranslationUnits(usize),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("C/C++ front end unavailable: {0}")]
    FrontendUnavailable(String),
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Error::Template(message)
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

/// Why a single declaration could not be bound. The declaration is skipped
/// and reported; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    #[error("bit-field `{0}` has no managed layout equivalent")]
    BitField(String),

    #[error("variadic functions cannot be bound")]
    Variadic,

    #[error("flexible array member has no fixed size")]
    FlexibleArrayMember,

    #[error("`{0}` is incomplete or not emitted and cannot be used by value")]
    IncompleteType(String),

    #[error("anonymous type has no name to refer to")]
    AnonymousType,

    #[error("calling convention {0} has no P/Invoke equivalent")]
    UnsupportedCallingConvention(i32),

    #[error("alignment {align} exceeds the natural alignment {natural} of the fields")]
    OverAligned { align: u64, natural: u64 },

    #[error("layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("{0} cannot overlap other union members")]
    UnionMember(String),

    #[error("empty record has no managed equivalent")]
    EmptyRecord,

    #[error("name `{0}` is already used by another declaration")]
    NameCollision(String),

    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        source: Box<MappingError>,
    },

    #[error("parameter `{param}`: {source}")]
    Parameter {
        param: String,
        source: Box<MappingError>,
    },
}

impl MappingError {
    pub fn in_field(self, field: &str) -> Self {
        MappingError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    pub fn in_parameter(self, param: &str) -> Self {
        MappingError::Parameter {
            param: param.to_string(),
            source: Box::new(self),
        }
    }
}
