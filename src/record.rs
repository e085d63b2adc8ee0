/*!
 * Assembly of per-path stat records
 */

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde_json::json;

use crate::device::DeviceNumbering;
use crate::error::{error_class, Result};
use crate::fields::{FieldDescriptor, FormatContext, FIELDS};
use crate::filetype::FileTypeTable;
use crate::owner::{NameResolver, SystemNames};
use crate::status;
use crate::time::TimeDecorator;
use crate::types::{Naming, RawStatus, StatRecord};
use crate::utils::decode_os;

/// Builds one record per path from its status
pub struct StatRecordBuilder<'a> {
    fields: &'a [FieldDescriptor],
    file_types: &'a FileTypeTable,
    resolver: &'a dyn NameResolver,
    devices: DeviceNumbering,
    times: TimeDecorator,
}

impl Default for StatRecordBuilder<'static> {
    fn default() -> Self {
        static SYSTEM_NAMES: SystemNames = SystemNames;
        Self::new(&SYSTEM_NAMES)
    }
}

impl<'a> StatRecordBuilder<'a> {
    /// Builder using the host's file types, device numbering and local time
    pub fn new(resolver: &'a dyn NameResolver) -> Self {
        Self {
            fields: FIELDS,
            file_types: FileTypeTable::host(),
            resolver,
            devices: DeviceNumbering::host(),
            times: TimeDecorator::local(),
        }
    }

    pub fn with_file_types(mut self, file_types: &'a FileTypeTable) -> Self {
        self.file_types = file_types;
        self
    }

    pub fn with_devices(mut self, devices: DeviceNumbering) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_times(mut self, times: TimeDecorator) -> Self {
        self.times = times;
        self
    }

    fn context(&self) -> FormatContext<'_> {
        FormatContext {
            file_types: self.file_types,
            resolver: self.resolver,
            devices: self.devices,
            times: self.times,
        }
    }

    /// Registry-driven part of a record: every field the status exposes
    pub fn fields_record(&self, st: &RawStatus, naming: Naming) -> StatRecord {
        let mut about = StatRecord::new();
        self.append_fields(&mut about, st, naming);
        about
    }

    fn append_fields(&self, about: &mut StatRecord, st: &RawStatus, naming: Naming) {
        let ctx = self.context();
        for field in self.fields {
            let Some(raw) = st.get(field.attr) else {
                continue;
            };
            let key = field.key(naming);
            if !about.insert_at(key, field.formatter.apply(raw, &ctx)) {
                warn!("no sub-record for {:?}; dropping {:?}", key, field.attr);
            }
        }
    }

    /// Full record for one path, or an error record if it cannot be examined
    pub fn build(&self, path: &Path, follow_symlinks: bool, naming: Naming) -> StatRecord {
        debug!(
            "stat {} (follow symlinks: {})",
            path.display(),
            follow_symlinks
        );
        let filename = decode_os(path.as_os_str());

        let st = match status::query(path, follow_symlinks) {
            Ok(st) => st,
            Err(e) => return error_record(filename, &e),
        };
        let is_link = status::is_symlink(path);

        let mut about = StatRecord::new();
        about.insert("filename", filename.clone());
        about.insert("success", true);
        about.insert("followed_symlink", follow_symlinks && is_link);
        if !follow_symlinks && is_link {
            match fs::read_link(path) {
                Ok(target) => about.insert("target", decode_os(target.as_os_str())),
                Err(e) => return error_record(filename, &e),
            }
        }
        about.insert("filetype", self.file_types.classify(st.mode).label());
        about.insert("realpath", decode_os(realpath(path).as_os_str()));
        self.append_fields(&mut about, &st, naming);
        about
    }

    /// Records for many paths, in input order.
    ///
    /// Paths are examined in parallel on the current rayon pool; run it
    /// inside [`worker_pool`] to bound the number of threads.
    pub fn build_all(
        &self,
        paths: &[OsString],
        follow_symlinks: bool,
        naming: Naming,
    ) -> Vec<StatRecord> {
        paths
            .par_iter()
            .map(|p| self.build(Path::new(p), follow_symlinks, naming))
            .collect()
    }
}

/// Rayon pool with exactly `num_threads` workers
pub fn worker_pool(num_threads: usize) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("statjson-{}", i))
        .build()?;
    debug!("worker pool with {} threads", pool.current_num_threads());
    Ok(pool)
}

/// `{filename, success: false, error: {class, message}}`
pub fn error_record(filename: String, err: &io::Error) -> StatRecord {
    debug!("{}: {}", filename, err);
    let mut about = StatRecord::new();
    about.insert("filename", filename);
    about.insert("success", false);
    about.insert(
        "error",
        json!({
            "class": error_class(err),
            "message": err.to_string(),
        }),
    );
    about
}

/// Fully resolved path.
///
/// Falls back to the absolute, unresolved path when resolution fails, e.g.
/// for a dangling symlink examined without following it.
pub fn realpath(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(real) => real,
        Err(e) => {
            warn!("cannot resolve {}: {}", path.display(), e);
            std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
        }
    }
}
