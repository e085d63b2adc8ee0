/*!
 * Core types shared by the record-building pipeline
 */

use serde::Serialize;
use serde_json::{Map, Value};

/// Raw attributes a status structure may expose.
///
/// The first thirteen are available wherever a POSIX `stat` is; the rest
/// depend on the host operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Mode,
    Ino,
    Dev,
    Nlink,
    Uid,
    Gid,
    Size,
    Atime,
    Mtime,
    Ctime,
    AtimeNs,
    MtimeNs,
    CtimeNs,
    Blocks,
    Blksize,
    Rdev,
    Flags,
    Gen,
    Birthtime,
}

/// A single attribute value read off a [`RawStatus`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    Unsigned(u64),
    Signed(i64),
    Real(f64),
}

impl RawValue {
    /// Value as an unsigned integer; negative and fractional values saturate
    pub fn as_u64(self) -> u64 {
        match self {
            RawValue::Unsigned(v) => v,
            RawValue::Signed(v) => v.max(0) as u64,
            RawValue::Real(v) => v as u64,
        }
    }

    /// Value as a float
    pub fn as_f64(self) -> f64 {
        match self {
            RawValue::Unsigned(v) => v as f64,
            RawValue::Signed(v) => v as f64,
            RawValue::Real(v) => v,
        }
    }
}

impl From<RawValue> for Value {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Unsigned(v) => Value::from(v),
            RawValue::Signed(v) => Value::from(v),
            RawValue::Real(v) => Value::from(v),
        }
    }
}

/// Platform file status, normalized into plain fields.
///
/// Attributes a platform does not provide are `None`; the record builder
/// omits their keys entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStatus {
    pub mode: u32,
    pub ino: u64,
    pub dev: u64,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Access time as fractional seconds since the epoch
    pub atime: f64,
    pub mtime: f64,
    pub ctime: f64,
    /// Access time as whole nanoseconds since the epoch
    pub atime_ns: Option<i64>,
    pub mtime_ns: Option<i64>,
    pub ctime_ns: Option<i64>,
    pub blocks: Option<u64>,
    pub blksize: Option<u64>,
    pub rdev: Option<u64>,
    pub flags: Option<u32>,
    pub gen: Option<u32>,
    pub birthtime: Option<f64>,
}

impl RawStatus {
    /// Probe for an attribute, returning `None` when the platform lacks it
    pub fn get(&self, attr: Attr) -> Option<RawValue> {
        use RawValue::*;

        match attr {
            Attr::Mode => Some(Unsigned(self.mode.into())),
            Attr::Ino => Some(Unsigned(self.ino)),
            Attr::Dev => Some(Unsigned(self.dev)),
            Attr::Nlink => Some(Unsigned(self.nlink)),
            Attr::Uid => Some(Unsigned(self.uid.into())),
            Attr::Gid => Some(Unsigned(self.gid.into())),
            Attr::Size => Some(Unsigned(self.size)),
            Attr::Atime => Some(Real(self.atime)),
            Attr::Mtime => Some(Real(self.mtime)),
            Attr::Ctime => Some(Real(self.ctime)),
            Attr::AtimeNs => self.atime_ns.map(Signed),
            Attr::MtimeNs => self.mtime_ns.map(Signed),
            Attr::CtimeNs => self.ctime_ns.map(Signed),
            Attr::Blocks => self.blocks.map(Unsigned),
            Attr::Blksize => self.blksize.map(Unsigned),
            Attr::Rdev => self.rdev.map(Unsigned),
            Attr::Flags => self.flags.map(|f| Unsigned(f.into())),
            Attr::Gen => self.gen.map(|g| Unsigned(g.into())),
            Attr::Birthtime => self.birthtime.map(Real),
        }
    }
}

/// Which of the two key schemes a record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Naming {
    /// Raw attribute style keys, e.g. `st_blocks`
    #[default]
    Short,
    /// Descriptive keys, e.g. `blocks`, `access_time`
    Human,
}

impl Naming {
    pub fn from_human(human: bool) -> Self {
        if human {
            Naming::Human
        } else {
            Naming::Short
        }
    }
}

/// Where a value lands in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key of the record itself
    Top(&'static str),
    /// A key inside an already present sub-record
    Nested(&'static str, &'static str),
}

/// An ordered, nested mapping produced for each input path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatRecord(Map<String, Value>);

impl StatRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Append a top-level key
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Place a value at `key`.
    ///
    /// Nested keys only merge into a sub-record that already exists; returns
    /// `false` (and inserts nothing) when the parent is missing or is not a
    /// sub-record.
    pub fn insert_at(&mut self, key: Key, value: Value) -> bool {
        match key {
            Key::Top(name) => {
                self.0.insert(name.to_string(), value);
                true
            }
            Key::Nested(parent, child) => match self.0.get_mut(parent) {
                Some(Value::Object(sub)) => {
                    sub.insert(child.to_string(), value);
                    true
                }
                _ => false,
            },
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Top-level keys in record order
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Whether this record describes a successful status query
    pub fn is_success(&self) -> bool {
        self.0
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
