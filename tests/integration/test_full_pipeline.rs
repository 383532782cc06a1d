//! End-to-end tests: configuration, parsing through a front end, generation
//! and writing the output file

use crate::assert_generated_contains;
use crate::common::*;
use crate::fixtures;
use pinvoke_bindgen::frontend::{
    Diagnostic, InMemoryFrontend, ParseFailure, Severity, TypeDescriptor,
};
use pinvoke_bindgen::{generate_with_frontend, Error, GenerateConfig, Logger};
use std::fs;
use std::path::{Path, PathBuf};

fn quiet() -> Logger {
    Logger::new(false, false)
}

#[test]
fn test_writes_complete_compilation_unit() {
    let output = TestOutput::new();
    let frontend = InMemoryFrontend::new().with_unit(fixtures::device("device.h"));

    let report = generate_with_frontend(&output.config(&["device.h"]), frontend, &quiet()).unwrap();
    let content = output.read();

    assert!(content.starts_with("// <auto-generated>\n"));
    assert_generated_contains!(content, "namespace Test.Native\n{\n    using System;\n    using System.Runtime.InteropServices;\n");
    assert_generated_contains!(content, "    public static partial class Methods\n    {\n");
    assert!(content.ends_with("    }\n}\n"));
    assert!(!content.contains('\r'));

    assert_eq!(report.structs, 1);
    assert_eq!(report.typedefs, 1);
    assert_eq!(report.enums, 1);
    assert_eq!(report.functions, 4);
    assert_eq!(report.output_path, output.path());
}

#[test]
fn test_declaration_order_in_output() {
    let output = TestOutput::new();
    let frontend = InMemoryFrontend::new().with_unit(fixtures::device("device.h"));
    generate_with_frontend(&output.config(&["device.h"]), frontend, &quiet()).unwrap();
    let content = output.read();

    let position = |needle: &str| content.find(needle).unwrap();
    // records, typedefs, enums, then the function container
    assert!(position("struct device_info") < position("delegate void event_cb"));
    assert!(position("delegate void event_cb") < position("enum device_state"));
    assert!(position("enum device_state") < position("partial class Methods"));
    assert!(position("device_open(") < position("device_info_get("));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let output = TestOutput::new();
    let config = output.config(&["device.h", "point.h"]);

    let run = || {
        let frontend = InMemoryFrontend::new()
            .with_unit(fixtures::device("device.h"))
            .with_unit(fixtures::point("point.h"));
        generate_with_frontend(&config, frontend, &quiet()).unwrap();
        fs::read(output.path()).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_shared_declarations_across_inputs() {
    let output = TestOutput::new();
    let frontend = InMemoryFrontend::new()
        .with_unit(fixtures::color("red.h"))
        .with_unit(fixtures::color("green.h"));

    let report =
        generate_with_frontend(&output.config(&["red.h", "green.h"]), frontend, &quiet()).unwrap();

    assert_eq!(report.enums, 1);
    assert_eq!(output.read().matches("public enum Color").count(), 1);
}

#[test]
fn test_unparsable_file_does_not_stop_the_run() {
    let output = TestOutput::new();
    let failure = ParseFailure::new(Path::new("broken.h"), "AST could not be read")
        .with_diagnostics(vec![Diagnostic::new(Severity::Fatal, "expected ';'")]);
    let frontend = InMemoryFrontend::new()
        .with_failure(failure)
        .with_unit(fixtures::point("point.h"));

    let report =
        generate_with_frontend(&output.config(&["broken.h", "point.h"]), frontend, &quiet())
            .unwrap();

    assert_eq!(report.failed_files, vec![PathBuf::from("broken.h")]);
    assert_eq!(report.structs, 1);
    assert_generated_contains!(output.read(), "public partial struct Point");
}

#[test]
fn test_no_parsable_file_keeps_previous_output() {
    let output = TestOutput::new();
    fs::write(output.path(), "previous").unwrap();
    let frontend = InMemoryFrontend::new()
        .with_failure(ParseFailure::new(Path::new("broken.h"), "AST could not be read"));

    let result = generate_with_frontend(&output.config(&["broken.h"]), frontend, &quiet());

    assert!(matches!(result, Err(Error::NoTranslationUnits(1))));
    assert_eq!(output.read(), "previous");
}

#[test]
fn test_skipped_declarations_do_not_block_output() {
    let output = TestOutput::new();
    let mut ready = field("ready", TypeDescriptor::bool());
    ready.bit_width = Some(1);
    let frontend = InMemoryFrontend::new().with_unit(unit(
        "status.h",
        vec![struct_def("Status", vec![ready]), struct_def("Ok", vec![field("n", int())])],
    ));

    let report = generate_with_frontend(&output.config(&["status.h"]), frontend, &quiet()).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "Status");
    assert_eq!(report.structs, 1);
    assert!(output.exists());
}

#[test]
fn test_directory_input_expands_to_sorted_headers() {
    let output = TestOutput::new();
    let headers = output.temp_dir.path().join("include");
    fs::create_dir_all(headers.join("nested")).unwrap();
    for file in ["b.h", "a.hpp", "nested/c.h", "README.md"] {
        fs::write(headers.join(file), "").unwrap();
    }
    let a = headers.join("a.hpp").display().to_string();
    let b = headers.join("b.h").display().to_string();
    let c = headers.join("nested/c.h").display().to_string();
    let frontend = InMemoryFrontend::new()
        .with_unit(unit(&a, vec![]))
        .with_unit(unit(&b, vec![]))
        .with_unit(unit(&c, vec![]));

    let config = output.config(&[headers.to_str().unwrap()]);
    let report = generate_with_frontend(&config, frontend, &quiet()).unwrap();

    assert_eq!(
        report.parsed_files,
        vec![PathBuf::from(a), PathBuf::from(b), PathBuf::from(c)]
    );
    assert!(report.failed_files.is_empty());
}

#[test]
fn test_configuration_file_drives_the_run() {
    let output = TestOutput::new();
    let config_path = output.temp_dir.path().join("bindgen.json");
    let json = serde_json::json!({
        "inputs": ["foo.h"],
        "namespace": "Foo.Interop",
        "output": output.path(),
        "library": "foo",
        "prefix_strip": "foo_",
        "container": "FooApi"
    });
    fs::write(&config_path, json.to_string()).unwrap();

    let config = GenerateConfig::from_file(&config_path).unwrap();
    let frontend = InMemoryFrontend::new().with_unit(fixtures::foo_bar("foo.h"));
    generate_with_frontend(&config, frontend, &quiet()).unwrap();
    let content = output.read();

    assert_generated_contains!(content, "namespace Foo.Interop\n");
    assert_generated_contains!(content, "    public static partial class FooApi\n");
    assert_generated_contains!(content, "[DllImport(\"foo\", CallingConvention = CallingConvention.Cdecl, EntryPoint = \"foo_bar\")]");
    assert_generated_contains!(content, "public static extern int bar(int a, float b);");
}
