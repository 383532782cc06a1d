//! Integration tests for function imports

use crate::common::*;
use crate::fixtures;
use crate::{assert_generated_contains, assert_generated_not_contains};
use pinvoke_bindgen::analysis::NamingPolicy;
use pinvoke_bindgen::frontend::{Linkage, TypeDescriptor, TypeKind};
use pinvoke_bindgen::SymbolKind;

fn with_naming(naming: NamingPolicy) -> pinvoke_bindgen::generators::GeneratorOptions {
    let mut options = options();
    options.naming = naming;
    options
}

#[test]
fn test_prefix_is_stripped_from_the_managed_name() {
    let naming = NamingPolicy::new(Some("foo_"), Vec::<String>::new());
    let bindings = generate_with(with_naming(naming), &[fixtures::foo_bar("foo.h")]);

    assert_generated_contains!(
        bindings.source,
        "        [DllImport(\"native\", CallingConvention = CallingConvention.Cdecl, EntryPoint = \"foo_bar\")]\n        public static extern int bar(int a, float b);\n"
    );
}

#[test]
fn test_excluded_function_leaves_container_empty() {
    let naming = NamingPolicy::new(Some("foo_"), ["foo_bar"]);
    let bindings = generate_with(with_naming(naming), &[fixtures::foo_bar("foo.h")]);

    assert_eq!(bindings.count(SymbolKind::Function), 0);
    assert!(bindings.skipped.is_empty());
    assert_generated_contains!(
        bindings.source,
        "    public static partial class Methods\n    {\n    }\n"
    );
}

#[test]
fn test_string_parameters_are_marshalled() {
    let bindings = generate(&[fixtures::device("device.h")]);

    assert_generated_contains!(
        bindings.source,
        "public static extern IntPtr device_open([MarshalAs(UnmanagedType.LPStr)] string path);"
    );
    assert_generated_contains!(
        bindings.source,
        "public static extern int device_info_get(IntPtr dev, IntPtr info);"
    );
    assert_generated_contains!(bindings.source, "public static extern void device_close(IntPtr dev);");
}

#[test]
fn test_string_marshalling_can_be_disabled() {
    let mut options = options();
    options.marshal_strings = false;
    let bindings = generate_with(options, &[fixtures::device("device.h")]);

    assert_generated_contains!(bindings.source, "public static extern IntPtr device_open(IntPtr path);");
    assert_generated_not_contains!(bindings.source, "LPStr");
}

#[test]
fn test_bool_return_is_marshalled_as_byte() {
    let ready = function("is_ready", TypeDescriptor::bool(), vec![]);
    let bindings = generate(&[unit("ready.h", vec![ready])]);

    assert_generated_contains!(
        bindings.source,
        "        [return: MarshalAs(UnmanagedType.U1)]\n        public static extern bool is_ready();\n"
    );
}

#[test]
fn test_inline_callback_parameter_gets_nested_delegate() {
    let handler = TypeDescriptor::pointer(TypeDescriptor::function(int(), vec![void_ptr()]));
    let register = function("set_handler", TypeDescriptor::void(), vec![("handler", handler)]);
    let bindings = generate(&[unit("handler.h", vec![register])]);
    let source = &bindings.source;

    assert_generated_contains!(
        source,
        "        [UnmanagedFunctionPointer(CallingConvention.Cdecl)]\n        public delegate int set_handler_handler(IntPtr arg0);\n"
    );
    assert_generated_contains!(source, "public static extern void set_handler(set_handler_handler handler);");
    assert!(source.find("delegate int set_handler_handler").unwrap() > source.find("partial class Methods").unwrap());
}

#[test]
fn test_keyword_parameter_is_escaped() {
    let copy = function("copy", TypeDescriptor::void(), vec![("params", int()), ("out", int())]);
    let bindings = generate(&[unit("copy.h", vec![copy])]);

    assert_generated_contains!(bindings.source, "public static extern void copy(int @params, int @out);");
}

#[test]
fn test_variadic_function_is_reported() {
    let mut printf = function("log_printf", int(), vec![("format", const_char_ptr())]);
    if let TypeKind::Function(signature) = &mut printf.ty.kind {
        signature.variadic = true;
    }
    let log = function("log_flush", TypeDescriptor::void(), vec![]);
    let bindings = generate(&[unit("log.h", vec![printf, log])]);

    assert_eq!(bindings.count(SymbolKind::Function), 1);
    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "log_printf");
    assert!(bindings.skipped[0].reason.contains("variadic"));
}

#[test]
fn test_static_and_included_functions_are_not_bound() {
    let mut helper = function("helper", TypeDescriptor::void(), vec![]);
    helper.linkage = Linkage::Internal;
    let system = included(function("malloc", void_ptr(), vec![("size", TypeDescriptor::integer(64, false))]));
    let bindings = generate(&[unit("lib.h", vec![helper, system])]);

    assert_eq!(bindings.count(SymbolKind::Function), 0);
    assert!(bindings.skipped.is_empty());
}

#[test]
fn test_function_named_like_container_is_reported() {
    let methods = function("Methods", TypeDescriptor::void(), vec![]);
    let bindings = generate(&[unit("methods.h", vec![methods])]);

    assert_eq!(bindings.count(SymbolKind::Function), 0);
    assert_eq!(bindings.skipped.len(), 1);
    assert!(bindings.skipped[0].reason.contains("already used"));
}

#[test]
fn test_stripped_names_that_collide_are_reported() {
    let naming = NamingPolicy::new(Some("a_"), Vec::<String>::new());
    let first = function("a_run", TypeDescriptor::void(), vec![]);
    let second = function("run", TypeDescriptor::void(), vec![]);
    let bindings = generate_with(with_naming(naming), &[unit("run.h", vec![first, second])]);

    assert_eq!(bindings.count(SymbolKind::Function), 1);
    assert_eq!(bindings.skipped.len(), 1);
    assert_eq!(bindings.skipped[0].name, "run");
}

#[test]
fn test_function_declared_in_two_headers_is_bound_once() {
    let bindings = generate(&[fixtures::foo_bar("a.h"), fixtures::foo_bar("b.h")]);

    assert_eq!(bindings.count(SymbolKind::Function), 1);
    assert_eq!(bindings.source.matches("EntryPoint = \"foo_bar\"").count(), 1);
    assert!(bindings.skipped.is_empty());
}
