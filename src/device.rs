/*!
 * Splitting device numbers into major and minor parts
 */

use serde_json::{json, Value};

/// How an operating system packs major/minor numbers into a `dev_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceNumbering {
    /// glibc/musl `gnu_dev_major`/`gnu_dev_minor`
    Linux,
    /// 8-bit major, 24-bit minor
    Darwin,
    /// FreeBSD 12+ 64-bit layout
    FreeBsd,
    /// OpenBSD split of a 32-bit value
    OpenBsd,
    /// NetBSD 12-bit major, 20-bit minor
    NetBsd,
}

impl DeviceNumbering {
    /// Convention of the platform this binary was built for
    pub fn host() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            DeviceNumbering::Darwin
        } else if cfg!(any(target_os = "freebsd", target_os = "dragonfly")) {
            DeviceNumbering::FreeBsd
        } else if cfg!(target_os = "openbsd") {
            DeviceNumbering::OpenBsd
        } else if cfg!(target_os = "netbsd") {
            DeviceNumbering::NetBsd
        } else {
            DeviceNumbering::Linux
        }
    }

    pub fn major(self, dev: u64) -> u64 {
        match self {
            DeviceNumbering::Linux => ((dev >> 32) & 0xffff_f000) | ((dev >> 8) & 0x0000_0fff),
            DeviceNumbering::Darwin => (dev >> 24) & 0xff,
            DeviceNumbering::FreeBsd => ((dev >> 32) & 0xffff_ff00) | ((dev >> 8) & 0xff),
            DeviceNumbering::OpenBsd => (dev >> 8) & 0xff,
            DeviceNumbering::NetBsd => (dev & 0x000f_ff00) >> 8,
        }
    }

    pub fn minor(self, dev: u64) -> u64 {
        match self {
            DeviceNumbering::Linux => ((dev >> 12) & 0xffff_ff00) | (dev & 0x0000_00ff),
            DeviceNumbering::Darwin => dev & 0x00ff_ffff,
            DeviceNumbering::FreeBsd => ((dev >> 24) & 0xff00) | (dev & 0xffff_00ff),
            DeviceNumbering::OpenBsd => (dev & 0xff) | ((dev & 0xffff_0000) >> 8),
            DeviceNumbering::NetBsd => ((dev & 0xfff0_0000) >> 12) | (dev & 0xff),
        }
    }

    /// Inverse of [`major`](Self::major)/[`minor`](Self::minor)
    pub fn makedev(self, major: u64, minor: u64) -> u64 {
        match self {
            DeviceNumbering::Linux => {
                ((major & 0xffff_f000) << 32)
                    | ((major & 0x0000_0fff) << 8)
                    | ((minor & 0xffff_ff00) << 12)
                    | (minor & 0x0000_00ff)
            }
            DeviceNumbering::Darwin => ((major & 0xff) << 24) | (minor & 0x00ff_ffff),
            DeviceNumbering::FreeBsd => {
                ((major & 0xffff_ff00) << 32)
                    | ((major & 0xff) << 8)
                    | ((minor & 0xff00) << 24)
                    | (minor & 0xffff_00ff)
            }
            DeviceNumbering::OpenBsd => {
                ((major & 0xff) << 8) | (minor & 0xff) | ((minor & 0xff_ff00) << 8)
            }
            DeviceNumbering::NetBsd => {
                ((major << 8) & 0x000f_ff00) | ((minor << 12) & 0xfff0_0000) | (minor & 0xff)
            }
        }
    }

    /// `{device_id, major_id, minor_id}`
    pub fn decompose(self, dev: u64) -> Value {
        json!({
            "device_id": dev,
            "major_id": self.major(dev),
            "minor_id": self.minor(dev),
        })
    }
}
