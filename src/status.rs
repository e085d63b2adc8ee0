/*!
 * Status queries: reading platform metadata into a [`RawStatus`]
 */

use std::fs::{self, Metadata};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_os = "dragonfly")]
use std::os::dragonfly::fs::MetadataExt as BsdMetadataExt;
#[cfg(target_os = "freebsd")]
use std::os::freebsd::fs::MetadataExt as BsdMetadataExt;
#[cfg(target_os = "ios")]
use std::os::ios::fs::MetadataExt as BsdMetadataExt;
#[cfg(target_os = "macos")]
use std::os::macos::fs::MetadataExt as BsdMetadataExt;
#[cfg(target_os = "netbsd")]
use std::os::netbsd::fs::MetadataExt as BsdMetadataExt;
#[cfg(target_os = "openbsd")]
use std::os::openbsd::fs::MetadataExt as BsdMetadataExt;

use crate::types::RawStatus;

/// `stat` (following a final symlink) or `lstat` (not following it)
pub fn query(path: &Path, follow_symlinks: bool) -> io::Result<RawStatus> {
    let meta = if follow_symlinks {
        fs::metadata(path)?
    } else {
        fs::symlink_metadata(path)?
    };
    Ok(RawStatus::from(&meta))
}

/// Whether `path` itself is a symbolic link; false if it cannot be examined
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

fn float_secs(secs: i64, nsec: i64) -> f64 {
    secs as f64 + nsec as f64 / 1e9
}

fn whole_nanos(secs: i64, nsec: i64) -> Option<i64> {
    secs.checked_mul(1_000_000_000)?.checked_add(nsec)
}

fn system_time_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

impl From<&Metadata> for RawStatus {
    fn from(meta: &Metadata) -> Self {
        let mut st = RawStatus {
            mode: meta.mode(),
            ino: meta.ino(),
            dev: meta.dev(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.size(),
            atime: float_secs(meta.atime(), meta.atime_nsec()),
            mtime: float_secs(meta.mtime(), meta.mtime_nsec()),
            ctime: float_secs(meta.ctime(), meta.ctime_nsec()),
            atime_ns: whole_nanos(meta.atime(), meta.atime_nsec()),
            mtime_ns: whole_nanos(meta.mtime(), meta.mtime_nsec()),
            ctime_ns: whole_nanos(meta.ctime(), meta.ctime_nsec()),
            blocks: Some(meta.blocks()),
            blksize: Some(meta.blksize()),
            rdev: Some(meta.rdev()),
            flags: None,
            gen: None,
            // Errors when the platform or filesystem keeps no birth time
            birthtime: meta.created().ok().map(system_time_secs),
        };
        bsd_extras(meta, &mut st);
        st
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
fn bsd_extras(meta: &Metadata, st: &mut RawStatus) {
    st.flags = Some(meta.st_flags());
    st.gen = Some(meta.st_gen());
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
)))]
fn bsd_extras(_meta: &Metadata, _st: &mut RawStatus) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_query_regular_file() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.bin");
        File::create(&path)?.write_all(&[7u8; 100])?;

        let st = query(&path, true)?;
        assert_eq!(st.mode & 0o170000, 0o100000);
        assert_eq!(st.size, 100);
        assert_eq!(st.nlink, 1);
        assert!(st.blocks.is_some());
        assert!(st.atime_ns.is_some());

        let ns = st.mtime_ns.unwrap();
        assert!((ns as f64 / 1e9 - st.mtime).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn test_query_missing_path() {
        let dir = tempdir().unwrap();
        let err = query(&dir.path().join("absent"), true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_lstat_sees_link() -> io::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        File::create(&target)?;
        std::os::unix::fs::symlink(&target, &link)?;

        assert_eq!(query(&link, false)?.mode & 0o170000, 0o120000);
        assert_eq!(query(&link, true)?.mode & 0o170000, 0o100000);
        assert!(is_symlink(&link));
        assert!(!is_symlink(&target));
        assert!(!is_symlink(&dir.path().join("absent")));
        Ok(())
    }

    #[test]
    fn test_time_helpers() {
        assert_eq!(float_secs(10, 500_000_000), 10.5);
        assert_eq!(whole_nanos(2, 5), Some(2_000_000_005));
        assert_eq!(whole_nanos(i64::MAX, 0), None);
        assert_eq!(system_time_secs(UNIX_EPOCH), 0.0);
    }
}
