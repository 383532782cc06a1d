//! Translation units shaped like what the front end produces for small
//! headers. The header each one stands for is shown above it.

use crate::common::*;
use pinvoke_bindgen::frontend::{Cursor, CursorKind, TranslationUnit, TypeDescriptor};

/// ```c
/// typedef struct { int x; int y; } Point;
/// ```
pub fn point(path: &str) -> TranslationUnit {
    let record = Cursor::new(CursorKind::Struct, "", TypeDescriptor::record("Point"))
        .definition()
        .with_children(vec![field("x", int()), field("y", int())]);
    unit(
        path,
        vec![record, typedef("Point", TypeDescriptor::record("Point"))],
    )
}

/// ```c
/// int foo_bar(int a, float b);
/// ```
pub fn foo_bar(path: &str) -> TranslationUnit {
    unit(
        path,
        vec![function(
            "foo_bar",
            int(),
            vec![("a", int()), ("b", TypeDescriptor::float(32))],
        )],
    )
}

/// ```c
/// enum Color { RED, GREEN, BLUE };
/// ```
pub fn color(path: &str) -> TranslationUnit {
    unit(
        path,
        vec![enum_def(
            "Color",
            &[("RED", None), ("GREEN", None), ("BLUE", None)],
        )],
    )
}

/// ```c
/// #include <stdint.h>
///
/// typedef struct device device;
/// typedef void (*event_cb)(device* dev, int code);
///
/// typedef enum { DEVICE_IDLE, DEVICE_BUSY = 4 } device_state;
///
/// struct device_info {
///     char name[32];
///     uint32_t flags;
///     bool connected;
///     device_state state;
/// };
///
/// device* device_open(const char* path);
/// int device_info_get(device* dev, struct device_info* info);
/// void device_subscribe(device* dev, event_cb callback);
/// void device_close(device* dev);
/// ```
pub fn device(path: &str) -> TranslationUnit {
    let uint32 = TypeDescriptor::typedef("uint32_t", TypeDescriptor::integer(32, false));
    let device = TypeDescriptor::record("device");
    let device_ptr = TypeDescriptor::pointer(device.clone());
    let state = TypeDescriptor::enumeration("device_state", int());

    let event_cb = TypeDescriptor::pointer(TypeDescriptor::function(
        TypeDescriptor::void(),
        vec![device_ptr.clone(), int()],
    ));
    let mut callback = typedef("event_cb", event_cb.clone());
    callback.children = vec![
        Cursor::new(CursorKind::Parameter, "dev", device_ptr.clone()),
        Cursor::new(CursorKind::Parameter, "code", int()),
    ];

    let state_enum = Cursor::new(CursorKind::Enum, "", state.clone())
        .definition()
        .with_children(vec![
            Cursor::new(CursorKind::EnumConstant, "DEVICE_IDLE", int()),
            {
                let mut busy = Cursor::new(CursorKind::EnumConstant, "DEVICE_BUSY", int());
                busy.enum_value = Some(4);
                busy
            },
        ]);

    let info = struct_def(
        "device_info",
        vec![
            field("name", TypeDescriptor::array(TypeDescriptor::char(true), 32)),
            field("flags", uint32),
            field("connected", TypeDescriptor::bool()),
            field("state", TypeDescriptor::typedef("device_state", state.clone())),
        ],
    );

    unit(
        path,
        vec![
            included(typedef("uint32_t", TypeDescriptor::integer(32, false))),
            forward_decl("device"),
            typedef("device", device),
            callback,
            state_enum,
            typedef("device_state", state),
            info,
            function("device_open", device_ptr.clone(), vec![("path", const_char_ptr())]),
            function(
                "device_info_get",
                int(),
                vec![
                    ("dev", device_ptr.clone()),
                    ("info", TypeDescriptor::pointer(TypeDescriptor::record("device_info"))),
                ],
            ),
            function(
                "device_subscribe",
                TypeDescriptor::void(),
                vec![
                    ("dev", device_ptr.clone()),
                    ("callback", TypeDescriptor::typedef("event_cb", event_cb)),
                ],
            ),
            function("device_close", TypeDescriptor::void(), vec![("dev", device_ptr)]),
        ],
    )
}
