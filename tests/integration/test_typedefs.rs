//! Integration tests for typedef bindings: delegates and wrapper structs

use crate::common::*;
use crate::fixtures;
use crate::{assert_generated_contains, assert_generated_not_contains};
use pinvoke_bindgen::frontend::TypeDescriptor;
use pinvoke_bindgen::SymbolKind;

#[test]
fn test_function_pointer_typedef_becomes_delegate() {
    let bindings = generate(&[fixtures::device("device.h")]);

    assert_generated_contains!(
        bindings.source,
        "    [UnmanagedFunctionPointer(CallingConvention.Cdecl)]\n    public delegate void event_cb(IntPtr dev, int code);\n"
    );
    assert_generated_contains!(
        bindings.source,
        "public static extern void device_subscribe(IntPtr dev, event_cb callback);"
    );
}

#[test]
fn test_tag_typedefs_are_not_emitted() {
    let bindings = generate(&[fixtures::device("device.h")]);

    // only event_cb; `device` and `device_state` name their own tags
    assert_eq!(bindings.count(SymbolKind::Typedef), 1);
    assert_generated_not_contains!(bindings.source, "public partial struct device\n");
    assert_generated_not_contains!(bindings.source, "uint32_t");
}

#[test]
fn test_value_typedef_becomes_wrapper_struct() {
    let bindings = generate(&[unit("score.h", vec![typedef("score_t", int())])]);

    assert_generated_contains!(
        bindings.source,
        "    public partial struct score_t\n    {\n        public score_t(int value)\n        {\n            this.Value = value;\n        }\n\n        public int Value;\n    }\n"
    );
}

#[test]
fn test_pointer_typedef_wraps_a_pointer() {
    let bindings = generate(&[unit("buffer.h", vec![typedef("buffer_t", void_ptr())])]);

    assert_generated_contains!(bindings.source, "        public buffer_t(IntPtr pointer)\n");
    assert_generated_contains!(bindings.source, "            this.Pointer = pointer;\n");
    assert_generated_contains!(bindings.source, "        public IntPtr Pointer;\n");
}

#[test]
fn test_bool_typedef_keeps_marshalling() {
    let bindings = generate(&[unit("flag.h", vec![typedef("flag_t", TypeDescriptor::bool())])]);

    assert_generated_contains!(
        bindings.source,
        "        [MarshalAs(UnmanagedType.U1)]\n        public bool Value;\n"
    );
}

#[test]
fn test_wrapper_is_used_by_name() {
    let score = TypeDescriptor::typedef("score_t", int());
    let set_score = function("set_score", TypeDescriptor::void(), vec![("score", score.clone())]);
    let player = struct_def("player", vec![field("best", score)]);
    let bindings = generate(&[unit(
        "score.h",
        vec![typedef("score_t", int()), player, set_score],
    )]);

    assert_generated_contains!(bindings.source, "public static extern void set_score(score_t score);");
    assert_generated_contains!(bindings.source, "        public score_t best;\n");
}

#[test]
fn test_typedef_clashing_with_struct_is_reported() {
    let record = struct_def("Handle", vec![field("id", int())]);
    let alias = typedef("Handle", int());
    let bindings = generate(&[unit("handle.h", vec![record, alias])]);

    assert_eq!(bindings.count(SymbolKind::Struct), 1);
    assert_eq!(bindings.count(SymbolKind::Typedef), 0);
    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].kind, SymbolKind::Typedef);
    assert!(bindings.skipped[0].reason.contains("already used"));
}
