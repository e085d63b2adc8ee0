/*!
 * Registry of every status attribute statjson knows how to report
 */

use serde_json::Value;

use crate::device::DeviceNumbering;
use crate::filetype::FileTypeTable;
use crate::flags::about_flags;
use crate::mode;
use crate::owner::{resolve_group, resolve_user, NameResolver};
use crate::time::TimeDecorator;
use crate::types::{Attr, Key, Naming, RawValue};

/// How a raw attribute value is turned into report output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Numeric pass-through
    Identity,
    Mode,
    Device,
    User,
    Group,
    Time,
    Flags,
}

/// Collaborators the formatters draw on
pub struct FormatContext<'a> {
    pub file_types: &'a FileTypeTable,
    pub resolver: &'a dyn NameResolver,
    pub devices: DeviceNumbering,
    pub times: TimeDecorator,
}

impl Formatter {
    pub fn apply(self, value: RawValue, ctx: &FormatContext<'_>) -> Value {
        match self {
            Formatter::Identity => value.into(),
            Formatter::Mode => mode::render(value.as_u64() as u32, ctx.file_types),
            Formatter::Device => ctx.devices.decompose(value.as_u64()),
            Formatter::User => resolve_user(ctx.resolver, value.as_u64() as u32),
            Formatter::Group => resolve_group(ctx.resolver, value.as_u64() as u32),
            Formatter::Time => ctx.times.decorate(value.as_f64(), None),
            Formatter::Flags => about_flags(value.as_u64() as u32),
        }
    }
}

/// One reportable attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub attr: Attr,
    pub short: Key,
    pub human: Key,
    pub formatter: Formatter,
}

impl FieldDescriptor {
    const fn new(attr: Attr, short: Key, human: Key, formatter: Formatter) -> Self {
        Self {
            attr,
            short,
            human,
            formatter,
        }
    }

    pub fn key(&self, naming: Naming) -> Key {
        match naming {
            Naming::Short => self.short,
            Naming::Human => self.human,
        }
    }
}

use Formatter::*;
use Key::{Nested, Top};

/// All fields, in output order
pub static FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(Attr::Mode, Top("st_mode"), Top("mode"), Mode),
    FieldDescriptor::new(Attr::Ino, Top("st_ino"), Top("inode"), Identity),
    FieldDescriptor::new(Attr::Dev, Top("st_dev"), Top("device"), Device),
    FieldDescriptor::new(Attr::Nlink, Top("st_nlink"), Top("links"), Identity),
    FieldDescriptor::new(Attr::Uid, Top("st_uid"), Top("user"), User),
    FieldDescriptor::new(Attr::Gid, Top("st_gid"), Top("group"), Group),
    FieldDescriptor::new(Attr::Size, Top("st_size"), Top("size"), Identity),
    FieldDescriptor::new(Attr::Atime, Top("st_atime"), Top("access_time"), Time),
    FieldDescriptor::new(Attr::Mtime, Top("st_mtime"), Top("modification_time"), Time),
    FieldDescriptor::new(Attr::Ctime, Top("st_ctime"), Top("change_time"), Time),
    FieldDescriptor::new(
        Attr::AtimeNs,
        Nested("st_atime", "nanoseconds"),
        Nested("access_time", "nanoseconds"),
        Identity,
    ),
    FieldDescriptor::new(
        Attr::MtimeNs,
        Nested("st_mtime", "nanoseconds"),
        Nested("modification_time", "nanoseconds"),
        Identity,
    ),
    FieldDescriptor::new(
        Attr::CtimeNs,
        Nested("st_ctime", "nanoseconds"),
        Nested("change_time", "nanoseconds"),
        Identity,
    ),
    // Linux
    FieldDescriptor::new(Attr::Blocks, Top("st_blocks"), Top("blocks"), Identity),
    FieldDescriptor::new(Attr::Blksize, Top("st_blksize"), Top("block_size"), Identity),
    // device ID, if a special file
    FieldDescriptor::new(Attr::Rdev, Top("st_rdev"), Top("rdev"), Device),
    FieldDescriptor::new(Attr::Flags, Top("st_flags"), Top("flags"), Flags),
    // FreeBSD and macOS
    FieldDescriptor::new(Attr::Gen, Top("st_gen"), Top("generation"), Identity),
    FieldDescriptor::new(Attr::Birthtime, Top("st_birthtime"), Top("creation_time"), Time),
    // Not reported: st_ftype, st_attrs, st_obtype (RISC OS), st_fstype (Solaris),
    // st_rsize, st_creator, st_type (classic Mac OS), st_file_attributes (Windows)
];
