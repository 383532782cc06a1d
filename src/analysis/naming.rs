use std::collections::HashSet;

/// Reserved C# keywords; identifiers colliding with these are emitted with `@`
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub fn is_keyword(name: &str) -> bool {
    CSHARP_KEYWORDS.contains(&name)
}

/// Whether `name` can be used as a C# identifier (possibly after escaping)
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Escape an identifier that collides with a keyword
pub fn escape_identifier(name: &str) -> String {
    if is_keyword(name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// Quote a value as a regular C# string literal
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Split a comma-separated name list, trimming entries and dropping empty ones
pub fn parse_name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Function filter and caller-visible naming
#[derive(Debug, Clone, Default)]
pub struct NamingPolicy {
    prefix_strip: Option<String>,
    excluded: HashSet<String>,
}

impl NamingPolicy {
    pub fn new<I, S>(prefix_strip: Option<&str>, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix_strip: prefix_strip
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string),
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact native-name match against the exclusion set
    pub fn is_excluded(&self, native: &str) -> bool {
        self.excluded.contains(native)
    }

    /// Caller-visible function name. The prefix is only stripped when what
    /// remains is still a usable identifier.
    pub fn function_name(&self, native: &str) -> String {
        let stripped = self
            .prefix_strip
            .as_deref()
            .and_then(|prefix| native.strip_prefix(prefix))
            .filter(|rest| is_valid_identifier(rest));
        escape_identifier(stripped.unwrap_or(native))
    }
}
