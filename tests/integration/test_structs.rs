//! Integration tests for struct and union bindings

use crate::common::*;
use crate::fixtures;
use crate::{assert_generated_contains, assert_generated_not_contains};
use pinvoke_bindgen::frontend::{Cursor, CursorKind, TypeDescriptor};
use pinvoke_bindgen::SymbolKind;

fn placed(name: &str, ty: TypeDescriptor, offset_bytes: u64) -> Cursor {
    let mut cursor = field(name, ty);
    cursor.field_offset_bits = Some(offset_bytes * 8);
    cursor
}

fn laid_out(name: &str, size: u64, align: u64, fields: Vec<Cursor>) -> Cursor {
    let mut record = struct_def(name, fields);
    record.ty = record.ty.with_layout(size, align);
    record
}

#[test]
fn test_typedef_named_struct_is_emitted_once() {
    let bindings = generate(&[fixtures::point("point.h")]);

    assert_eq!(bindings.count(SymbolKind::Struct), 1);
    assert_eq!(bindings.count(SymbolKind::Typedef), 0);
    assert_generated_contains!(
        bindings.source,
        "    [StructLayout(LayoutKind.Sequential)]\n    public partial struct Point\n    {\n        public int x;\n        public int y;\n    }\n"
    );
}

#[test]
fn test_field_marshalling() {
    let bindings = generate(&[fixtures::device("device.h")]);
    let source = &bindings.source;

    assert_generated_contains!(
        source,
        "        [MarshalAs(UnmanagedType.ByValTStr, SizeConst = 32)]\n        public string name;\n"
    );
    assert_generated_contains!(source, "        public uint flags;\n");
    assert_generated_contains!(
        source,
        "        [MarshalAs(UnmanagedType.U1)]\n        public bool connected;\n"
    );
    assert_generated_contains!(source, "        public device_state state;\n");
}

#[test]
fn test_union_uses_explicit_layout() {
    let value = union_def(
        "Value",
        vec![field("i", int()), field("f", TypeDescriptor::float(32))],
    );
    let bindings = generate(&[unit("value.h", vec![value])]);

    assert_generated_contains!(
        bindings.source,
        "    [StructLayout(LayoutKind.Explicit)]\n    public partial struct Value\n    {\n        [FieldOffset(0)]\n        public int i;\n        [FieldOffset(0)]\n        public float f;\n    }\n"
    );
}

#[test]
fn test_packed_struct_gets_pack() {
    let packed = laid_out(
        "Packed",
        5,
        1,
        vec![
            placed("tag", TypeDescriptor::char(true), 0),
            placed("value", int(), 1),
        ],
    );
    let bindings = generate(&[unit("packed.h", vec![packed])]);

    assert!(bindings.skipped.is_empty(), "{:?}", bindings.skipped);
    assert_generated_contains!(
        bindings.source,
        "[StructLayout(LayoutKind.Sequential, Pack = 1)]"
    );
}

#[test]
fn test_naturally_aligned_struct_has_no_pack() {
    let sample = laid_out(
        "Sample",
        16,
        8,
        vec![
            placed("id", int(), 0),
            placed("timestamp", TypeDescriptor::integer(64, false), 8),
        ],
    );
    let bindings = generate(&[unit("sample.h", vec![sample])]);

    assert_eq!(bindings.count(SymbolKind::Struct), 1);
    assert_generated_contains!(bindings.source, "[StructLayout(LayoutKind.Sequential)]");
    assert_generated_contains!(bindings.source, "        public ulong timestamp;\n");
}

#[test]
fn test_layout_mismatch_is_skipped_and_reported() {
    let gap = laid_out(
        "Gap",
        12,
        4,
        vec![placed("a", int(), 0), placed("b", int(), 8)],
    );
    let after = struct_def("After", vec![field("n", int())]);
    let bindings = generate(&[unit("gap.h", vec![gap, after])]);

    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].kind, SymbolKind::Struct);
    assert_eq!(bindings.skipped[0].name, "Gap");
    assert!(bindings.skipped[0].reason.contains("layout mismatch"));
    assert_generated_not_contains!(bindings.source, "struct Gap");
    assert_generated_contains!(bindings.source, "public partial struct After");
}

#[test]
fn test_by_value_reference_to_later_struct() {
    let line = struct_def(
        "Line",
        vec![
            field("start", TypeDescriptor::record("Vec2")),
            field("end", TypeDescriptor::record("Vec2")),
        ],
    );
    let vec2 = struct_def(
        "Vec2",
        vec![
            field("x", TypeDescriptor::float(32)),
            field("y", TypeDescriptor::float(32)),
        ],
    );
    let bindings = generate(&[unit("geometry.h", vec![line, vec2])]);

    assert!(bindings.skipped.is_empty(), "{:?}", bindings.skipped);
    assert_generated_contains!(bindings.source, "        public Vec2 start;\n");
    assert_generated_contains!(bindings.source, "        public Vec2 end;\n");
}

#[test]
fn test_opaque_struct_by_value_is_skipped() {
    let take = function(
        "consume",
        TypeDescriptor::void(),
        vec![("handle", TypeDescriptor::record("Handle"))],
    );
    let bindings = generate(&[unit("opaque.h", vec![forward_decl("Handle"), take])]);

    assert_eq!(bindings.count(SymbolKind::Function), 0);
    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "consume");
    assert!(bindings.skipped[0].reason.contains("incomplete"));
}

#[test]
fn test_anonymous_member_is_hoisted_before_parent() {
    let mut payload = Cursor::new(
        CursorKind::Union,
        "",
        TypeDescriptor::anonymous_record(true),
    )
    .definition()
    .with_children(vec![
        field("i", int()),
        field("f", TypeDescriptor::float(32)),
    ]);
    payload.is_anonymous_member = true;
    let variant = struct_def("Variant", vec![field("kind", int()), payload]);

    let bindings = generate(&[unit("variant.h", vec![variant])]);
    let source = &bindings.source;

    assert_eq!(bindings.count(SymbolKind::Struct), 2);
    assert_generated_contains!(source, "        public Variant_Anonymous0 Anonymous0;\n");
    let hoisted = source.find("struct Variant_Anonymous0").unwrap();
    let parent = source.find("struct Variant\n").unwrap();
    assert!(hoisted < parent);
}

#[test]
fn test_named_anonymous_field_uses_field_name() {
    let origin = Cursor::new(
        CursorKind::Struct,
        "",
        TypeDescriptor::anonymous_record(false),
    )
    .definition()
    .with_children(vec![field("x", int()), field("y", int())]);
    let sprite = struct_def(
        "Sprite",
        vec![origin, field("origin", TypeDescriptor::anonymous_record(false))],
    );

    let bindings = generate(&[unit("sprite.h", vec![sprite])]);
    assert_generated_contains!(bindings.source, "public partial struct Sprite_origin");
    assert_generated_contains!(bindings.source, "        public Sprite_origin origin;\n");
}

#[test]
fn test_function_pointer_field_becomes_delegate() {
    let on_click = TypeDescriptor::pointer(TypeDescriptor::function(
        TypeDescriptor::void(),
        vec![int()],
    ));
    let widget = struct_def("Widget", vec![field("on_click", on_click)]);
    let bindings = generate(&[unit("widget.h", vec![widget])]);
    let source = &bindings.source;

    assert_generated_contains!(
        source,
        "    [UnmanagedFunctionPointer(CallingConvention.Cdecl)]\n    public delegate void Widget_on_click(int arg0);\n"
    );
    assert_generated_contains!(source, "        public Widget_on_click on_click;\n");
    assert!(source.find("delegate void Widget_on_click").unwrap() < source.find("struct Widget").unwrap());
}

#[test]
fn test_bit_field_skips_only_its_record() {
    let mut ready = field("ready", TypeDescriptor::integer(32, false));
    ready.bit_width = Some(1);
    let status = struct_def("Status", vec![ready]);
    let other = struct_def("Other", vec![field("n", int())]);
    let bindings = generate(&[unit("status.h", vec![status, other])]);

    assert_eq!(bindings.skipped.len(), 1);
    assert!(bindings.skipped[0].reason.contains("bit-field"));
    assert_generated_contains!(bindings.source, "public partial struct Other");
}

#[test]
fn test_keyword_struct_name_is_escaped() {
    let object = struct_def("object", vec![field("id", int())]);
    let holder = struct_def("holder", vec![field("item", TypeDescriptor::record("object"))]);
    let bindings = generate(&[unit("object.h", vec![object, holder])]);

    assert_generated_contains!(bindings.source, "public partial struct @object\n");
    assert_generated_contains!(bindings.source, "        public @object item;\n");
}

#[test]
fn test_union_member_holding_a_string_is_skipped() {
    // union Value { struct Named n; long long i; };
    let value = union_def(
        "Value",
        vec![
            field("n", TypeDescriptor::record("Named")),
            field("i", TypeDescriptor::integer(64, true)),
        ],
    );
    let named = struct_def("Named", vec![field("name", const_char_ptr())]);
    let bindings = generate(&[unit("value.h", vec![value, named])]);

    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "Value");
    assert!(bindings.skipped[0].reason.contains("cannot overlap"));
    assert_generated_not_contains!(bindings.source, "struct Value");
    assert_generated_contains!(bindings.source, "public partial struct Named");
}

#[test]
fn test_hoisted_union_member_holding_a_string_is_skipped() {
    let text = Cursor::new(
        CursorKind::Struct,
        "",
        TypeDescriptor::anonymous_record(false),
    )
    .definition()
    .with_children(vec![field("chars", const_char_ptr()), field("len", int())]);
    let token = union_def(
        "Token",
        vec![
            text,
            field("text", TypeDescriptor::anonymous_record(false)),
            field("number", TypeDescriptor::float(64)),
        ],
    );
    let bindings = generate(&[unit("token.h", vec![token])]);

    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "Token");
    assert_generated_not_contains!(bindings.source, "Token_text");
}

#[test]
fn test_union_member_of_plain_struct_overlaps() {
    let point = struct_def("Point", vec![field("x", int()), field("y", int())]);
    let shape = union_def(
        "Shape",
        vec![
            field("at", TypeDescriptor::record("Point")),
            field("radius", TypeDescriptor::float(64)),
        ],
    );
    let bindings = generate(&[unit("shape.h", vec![shape, point])]);

    assert!(bindings.skipped.is_empty(), "{:?}", bindings.skipped);
    assert_generated_contains!(
        bindings.source,
        "        [FieldOffset(0)]\n        public Point at;\n"
    );
}
