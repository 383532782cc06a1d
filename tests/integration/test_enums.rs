//! Integration tests for enum bindings

use crate::assert_generated_contains;
use crate::common::*;
use crate::fixtures;
use pinvoke_bindgen::frontend::{Cursor, CursorKind, TypeDescriptor, TypeKind};
use pinvoke_bindgen::SymbolKind;

#[test]
fn test_identical_enum_in_two_files_is_emitted_once() {
    let bindings = generate(&[fixtures::color("a.h"), fixtures::color("b.h")]);

    assert_eq!(bindings.count(SymbolKind::Enum), 1);
    assert_eq!(bindings.source.matches("public enum Color").count(), 1);
    assert!(bindings.skipped.is_empty());
}

#[test]
fn test_implicit_values_count_up() {
    let bindings = generate(&[fixtures::color("color.h")]);

    assert_generated_contains!(
        bindings.source,
        "    public enum Color : int\n    {\n        RED = 0,\n        GREEN = 1,\n        BLUE = 2,\n    }\n"
    );
}

#[test]
fn test_values_continue_after_explicit_value() {
    let level = enum_def(
        "Level",
        &[("LOW", Some(-1)), ("MID", None), ("HIGH", Some(10)), ("MAX", None)],
    );
    let bindings = generate(&[unit("level.h", vec![level])]);

    assert_generated_contains!(bindings.source, "        LOW = -1,\n");
    assert_generated_contains!(bindings.source, "        MID = 0,\n");
    assert_generated_contains!(bindings.source, "        MAX = 11,\n");
}

#[test]
fn test_unsigned_underlying_type() {
    let mut flags = enum_def("Flags", &[("NONE", Some(0)), ("ALL", Some(-1))]);
    flags.underlying = Some(TypeDescriptor::integer(32, false));
    let bindings = generate(&[unit("flags.h", vec![flags])]);

    assert_generated_contains!(bindings.source, "    public enum Flags : uint\n");
    assert_generated_contains!(bindings.source, "        ALL = 4294967295,\n");
}

#[test]
fn test_typedef_named_enum_is_used_by_name() {
    let bindings = generate(&[fixtures::device("device.h")]);

    assert_generated_contains!(
        bindings.source,
        "    public enum device_state : int\n    {\n        DEVICE_IDLE = 0,\n        DEVICE_BUSY = 4,\n    }\n"
    );
    assert_eq!(bindings.count(SymbolKind::Enum), 1);
}

#[test]
fn test_enum_parameter_refers_to_enum() {
    let set_color = function(
        "set_color",
        TypeDescriptor::void(),
        vec![("color", TypeDescriptor::enumeration("Color", int()))],
    );
    let mut color = fixtures::color("color.h");
    color.root.children.push(set_color);
    let bindings = generate(&[color]);

    assert_generated_contains!(bindings.source, "public static extern void set_color(Color color);");
}

#[test]
fn test_anonymous_enum_is_reported() {
    let anonymous = Cursor::new(
        CursorKind::Enum,
        "",
        TypeDescriptor::new(TypeKind::Enum {
            name: None,
            integer: Box::new(int()),
        }),
    )
    .definition()
    .with_children(vec![Cursor::new(CursorKind::EnumConstant, "LIMIT", int())]);
    let bindings = generate(&[unit("limits.h", vec![anonymous])]);

    assert_eq!(bindings.count(SymbolKind::Enum), 0);
    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "<anonymous>");
}
