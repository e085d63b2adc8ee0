//! BSD file flags (`st_flags`, as set by `chflags(1)`)

use serde_json::{Map, Value};

/// Known flags in report order
pub const FILE_FLAGS: [(&str, u32); 12] = [
    ("UF_NODUMP", 0x0000_0001),
    ("UF_IMMUTABLE", 0x0000_0002),
    ("UF_APPEND", 0x0000_0004),
    ("UF_OPAQUE", 0x0000_0008),
    ("UF_NOUNLINK", 0x0000_0010),
    ("UF_COMPRESSED", 0x0000_0020),
    ("UF_HIDDEN", 0x0000_8000),
    ("SF_ARCHIVED", 0x0001_0000),
    ("SF_IMMUTABLE", 0x0002_0000),
    ("SF_APPEND", 0x0004_0000),
    ("SF_NOUNLINK", 0x0010_0000),
    ("SF_SNAPSHOT", 0x0020_0000),
];

pub fn about_flags(flags: u32) -> Value {
    let map: Map<String, Value> = FILE_FLAGS
        .iter()
        .map(|(name, bit)| (name.to_string(), Value::Bool(flags & bit != 0)))
        .collect();
    Value::Object(map)
}
