/*!
 * File type classification from the type bits of a mode
 */

use once_cell::sync::Lazy;
use strum::{Display, EnumProperty, IntoStaticStr};

/// Mask selecting the file type bits of a mode
pub const S_IFMT: u32 = 0o170000;

pub const S_IFSOCK: u32 = 0o140000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFIFO: u32 = 0o010000;

/// Kinds of filesystem entry a mode can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumProperty)]
#[strum(serialize_all = "snake_case")]
pub enum FileKind {
    #[strum(props(glyph = "-"))]
    Regular,
    #[strum(props(glyph = "d"))]
    Directory,
    #[strum(props(glyph = "l"))]
    Symlink,
    #[strum(props(glyph = "b"))]
    Block,
    #[strum(props(glyph = "c"))]
    Character,
    #[strum(serialize = "FIFO", props(glyph = "p"))]
    Fifo,
    #[strum(props(glyph = "s"))]
    Socket,
    /// Solaris doors
    #[strum(props(glyph = "D"))]
    Door,
    /// Solaris event ports
    #[strum(props(glyph = "P"))]
    EventPort,
    /// BSD union-mount whiteouts
    #[strum(props(glyph = "w"))]
    Whiteout,
    #[strum(props(glyph = "?"))]
    Unknown,
}

impl FileKind {
    /// Canonical label, e.g. `regular` or `FIFO`
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Single character used in symbolic mode strings
    pub fn glyph(self) -> char {
        self.get_str("glyph")
            .and_then(|g| g.chars().next())
            .unwrap_or('?')
    }
}

/// Type bit patterns that exist only on some hosts.
///
/// A `None` entry means the host does not define that type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub door: Option<u32>,
    pub event_port: Option<u32>,
    pub whiteout: Option<u32>,
}

impl HostCapabilities {
    /// Capabilities of the platform this binary was built for
    pub fn probe() -> Self {
        let mut caps = Self::default();
        if cfg!(any(target_os = "solaris", target_os = "illumos")) {
            caps.door = Some(0o150000);
            caps.event_port = Some(0o160000);
        }
        if cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd",
            target_os = "dragonfly"
        )) {
            caps.whiteout = Some(0o160000);
        }
        caps
    }
}

/// Lookup table from type bits to [`FileKind`]
#[derive(Debug, Clone)]
pub struct FileTypeTable {
    entries: Vec<(u32, FileKind)>,
}

impl FileTypeTable {
    /// Build the table for a given set of optional capabilities
    pub fn new(caps: HostCapabilities) -> Self {
        let mut entries = vec![
            (S_IFBLK, FileKind::Block),
            (S_IFCHR, FileKind::Character),
            (S_IFDIR, FileKind::Directory),
            (S_IFIFO, FileKind::Fifo),
            (S_IFLNK, FileKind::Symlink),
            (S_IFREG, FileKind::Regular),
            (S_IFSOCK, FileKind::Socket),
        ];

        let optional = [
            (caps.door, FileKind::Door),
            (caps.event_port, FileKind::EventPort),
            (caps.whiteout, FileKind::Whiteout),
        ];
        for (bits, kind) in optional {
            if let Some(bits) = bits.filter(|&b| b != 0) {
                entries.push((bits, kind));
            }
        }

        Self { entries }
    }

    /// Table for the current host
    pub fn host() -> &'static FileTypeTable {
        &HOST_FILE_TYPES
    }

    /// Classify the type bits of `mode`; total over all inputs
    pub fn classify(&self, mode: u32) -> FileKind {
        let bits = mode & S_IFMT;
        self.entries
            .iter()
            .find(|(mask, _)| *mask == bits)
            .map(|(_, kind)| *kind)
            .unwrap_or(FileKind::Unknown)
    }
}

static HOST_FILE_TYPES: Lazy<FileTypeTable> =
    Lazy::new(|| FileTypeTable::new(HostCapabilities::probe()));
