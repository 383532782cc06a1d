use crate::frontend::{Cursor, CursorKind};

/// Top-level declaration kinds the generator emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Record,
    Enum,
    Typedef,
    Function,
}

/// Decide whether `cursor` is a top-level declaration the generator handles.
///
/// Declarations pulled in from other headers, forward declarations and
/// records without a name (hoisted by their enclosing record) are not.
/// Anonymous enum definitions are classified so the enum emitter can report
/// them.
pub fn classify(cursor: &Cursor) -> Option<DeclKind> {
    if !cursor.location.is_main_file {
        return None;
    }

    match cursor.kind {
        CursorKind::Struct | CursorKind::Union => {
            let named = cursor.type_name().is_some();
            (cursor.is_definition && named && !cursor.is_anonymous_member)
                .then_some(DeclKind::Record)
        }
        CursorKind::Enum => cursor.is_definition.then_some(DeclKind::Enum),
        CursorKind::Typedef => Some(DeclKind::Typedef),
        CursorKind::Function => Some(DeclKind::Function),
        _ => None,
    }
}
