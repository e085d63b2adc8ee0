/*!
 * Rendering of mode integers: octal, symbolic and per-bit forms
 */

use serde_json::{json, Map, Value};

use crate::filetype::FileTypeTable;

pub const S_ISUID: u32 = 0o4000;
pub const S_ISGID: u32 = 0o2000;
pub const S_ISVTX: u32 = 0o1000;
pub const S_IRUSR: u32 = 0o0400;
pub const S_IWUSR: u32 = 0o0200;
pub const S_IXUSR: u32 = 0o0100;
pub const S_IRGRP: u32 = 0o0040;
pub const S_IWGRP: u32 = 0o0020;
pub const S_IXGRP: u32 = 0o0010;
pub const S_IROTH: u32 = 0o0004;
pub const S_IWOTH: u32 = 0o0002;
pub const S_IXOTH: u32 = 0o0001;

/// Permission and special bits in report order
pub const MODE_BITS: [(&str, u32); 12] = [
    ("S_ISUID", S_ISUID),
    ("S_ISGID", S_ISGID),
    ("S_ISVTX", S_ISVTX),
    ("S_IRUSR", S_IRUSR),
    ("S_IWUSR", S_IWUSR),
    ("S_IXUSR", S_IXUSR),
    ("S_IRGRP", S_IRGRP),
    ("S_IWGRP", S_IWGRP),
    ("S_IXGRP", S_IXGRP),
    ("S_IROTH", S_IROTH),
    ("S_IWOTH", S_IWOTH),
    ("S_IXOTH", S_IXOTH),
];

/// Octal form with a leading `0`, e.g. `0100644`
pub fn octal(mode: u32) -> String {
    format!("0{:o}", mode)
}

/// Execute position: `special_set`/`special_unset` depending on the special bit
fn exec_char(mode: u32, exec: u32, special: u32, set: char, unset: char) -> char {
    match (mode & special != 0, mode & exec != 0) {
        (true, true) => set,
        (true, false) => unset,
        (false, true) => 'x',
        (false, false) => '-',
    }
}

/// Symbolic form in the style of `ls -l` and `strmode(3)`.
///
/// Always eleven characters. The last one is reserved for an ACL or
/// extended attribute marker and is currently always a space.
pub fn symbolic(mode: u32, types: &FileTypeTable) -> String {
    let flag = |bit: u32, c: char| if mode & bit != 0 { c } else { '-' };

    let mut s = String::with_capacity(11);
    s.push(types.classify(mode).glyph());
    s.push(flag(S_IRUSR, 'r'));
    s.push(flag(S_IWUSR, 'w'));
    s.push(exec_char(mode, S_IXUSR, S_ISUID, 's', 'S'));
    s.push(flag(S_IRGRP, 'r'));
    s.push(flag(S_IWGRP, 'w'));
    s.push(exec_char(mode, S_IXGRP, S_ISGID, 's', 'S'));
    s.push(flag(S_IROTH, 'r'));
    s.push(flag(S_IWOTH, 'w'));
    s.push(exec_char(mode, S_IXOTH, S_ISVTX, 't', 'T'));
    // TODO: '@' for extended attributes, '.' for a security context, '+' for ACLs
    s.push(' ');
    s
}

/// Ordered map of each permission/special bit to whether it is set
pub fn bits(mode: u32) -> Map<String, Value> {
    MODE_BITS
        .iter()
        .map(|(name, bit)| (name.to_string(), Value::Bool(mode & bit != 0)))
        .collect()
}

/// Full mode sub-record: `integer`, `octal`, `string`, `bits`
pub fn render(mode: u32, types: &FileTypeTable) -> Value {
    json!({
        "integer": mode,
        "octal": octal(mode),
        "string": symbolic(mode, types),
        "bits": bits(mode),
    })
}
