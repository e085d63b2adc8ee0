/*!
 * Tests for statjson record building
 */

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::Path;
use std::collections::HashSet;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

use chrono::FixedOffset;
use filetime::{set_file_times, FileTime};
use serde_json::{json, Value};
use tempfile::tempdir;

use crate::device::DeviceNumbering;
use crate::filetype::{FileTypeTable, HostCapabilities};
use crate::owner::NameResolver;
use crate::record::{worker_pool, StatRecordBuilder};
use crate::time::{TimeDecorator, Zone};
use crate::types::{Naming, RawStatus, StatRecord};
use crate::writer::JsonWriter;

/// Resolver answering for one user and one group, recording every lookup
#[derive(Default)]
struct MockNames {
    lookups: Mutex<Vec<String>>,
}

impl NameResolver for MockNames {
    fn user_name(&self, uid: u32) -> Option<String> {
        self.lookups.lock().unwrap().push(format!("uid {}", uid));
        (uid == 1000).then(|| "a_user".to_string())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        self.lookups.lock().unwrap().push(format!("gid {}", gid));
        (gid == 1001).then(|| "a_grp".to_string())
    }
}

fn eastern_daylight() -> TimeDecorator {
    TimeDecorator::new(Zone::Fixed(FixedOffset::west_opt(4 * 3600).unwrap()))
}

fn plain_types() -> FileTypeTable {
    FileTypeTable::new(HostCapabilities::default())
}

fn synthetic_status() -> RawStatus {
    RawStatus {
        mode: 0o100644,
        ino: 1185930,
        dev: 64769,
        nlink: 1,
        uid: 1000,
        gid: 1001,
        size: 4102,
        atime: 1535036782.6969066,
        mtime: 1535036783.6969066,
        ctime: 1535036784.6969066,
        atime_ns: Some(1535036782696906483),
        mtime_ns: Some(1535036783696906483),
        ctime_ns: Some(1535036784696906483),
        ..Default::default()
    }
}

fn expected_mode() -> Value {
    json!({
        "integer": 33188,
        "octal": "0100644",
        "string": "-rw-r--r-- ",
        "bits": {
            "S_ISUID": false,
            "S_ISGID": false,
            "S_ISVTX": false,
            "S_IRUSR": true,
            "S_IWUSR": true,
            "S_IXUSR": false,
            "S_IRGRP": true,
            "S_IWGRP": false,
            "S_IXGRP": false,
            "S_IROTH": true,
            "S_IWOTH": false,
            "S_IXOTH": false,
        },
    })
}

fn object_keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn build_synthetic(naming: Naming, names: &MockNames) -> StatRecord {
    let types = plain_types();
    StatRecordBuilder::new(names)
        .with_file_types(&types)
        .with_devices(DeviceNumbering::Linux)
        .with_times(eastern_daylight())
        .fields_record(&synthetic_status(), naming)
}

// Short names for a synthetic status structure
#[test]
fn test_short_names_record() {
    let names = MockNames::default();
    let about = build_synthetic(Naming::Short, &names);

    assert_eq!(
        about.keys(),
        vec![
            "st_mode", "st_ino", "st_dev", "st_nlink", "st_uid", "st_gid", "st_size", "st_atime",
            "st_mtime", "st_ctime",
        ]
    );
    assert_eq!(about.get("st_mode"), Some(&expected_mode()));
    assert_eq!(about.get("st_ino"), Some(&json!(1185930)));
    assert_eq!(
        about.get("st_dev"),
        Some(&json!({"device_id": 64769, "major_id": 253, "minor_id": 1}))
    );
    assert_eq!(about.get("st_nlink"), Some(&json!(1)));
    assert_eq!(about.get("st_uid"), Some(&json!({"uid": 1000, "name": "a_user"})));
    assert_eq!(about.get("st_gid"), Some(&json!({"gid": 1001, "name": "a_grp"})));
    assert_eq!(about.get("st_size"), Some(&json!(4102)));

    let atime = about.get("st_atime").unwrap();
    assert_eq!(object_keys(atime), vec!["seconds", "iso8601", "nanoseconds"]);
    assert_eq!(atime["seconds"], 1535036782.6969066);
    assert_eq!(atime["iso8601"], "2018-08-23T11:06:22.696907-04:00");
    assert_eq!(atime["nanoseconds"], 1535036782696906483i64);

    let mtime = about.get("st_mtime").unwrap();
    assert_eq!(mtime["iso8601"], "2018-08-23T11:06:23.696907-04:00");
    let ctime = about.get("st_ctime").unwrap();
    assert_eq!(ctime["iso8601"], "2018-08-23T11:06:24.696907-04:00");
    assert_eq!(ctime["nanoseconds"], 1535036784696906483i64);

    // Each id is looked up exactly once
    assert_eq!(
        *names.lookups.lock().unwrap(),
        vec!["uid 1000".to_string(), "gid 1001".to_string()]
    );
}

// Human names for the same status structure
#[test]
fn test_human_names_record() {
    let names = MockNames::default();
    let about = build_synthetic(Naming::Human, &names);

    assert_eq!(
        about.keys(),
        vec![
            "mode",
            "inode",
            "device",
            "links",
            "user",
            "group",
            "size",
            "access_time",
            "modification_time",
            "change_time",
        ]
    );
    assert_eq!(about.get("mode"), Some(&expected_mode()));
    assert_eq!(about.get("user"), Some(&json!({"uid": 1000, "name": "a_user"})));

    let atime = about.get("access_time").unwrap();
    assert_eq!(atime["nanoseconds"], 1535036782696906483i64);
    assert!(about.get("access_time_nano").is_none());
    assert!(about.get("nanoseconds").is_none());
}

// Both naming schemes carry the same values
#[test]
fn test_naming_changes_keys_not_values() {
    let names = MockNames::default();
    let short = build_synthetic(Naming::Short, &names).into_value();
    let human = build_synthetic(Naming::Human, &names).into_value();

    let short_values: Vec<&Value> = short.as_object().unwrap().values().collect();
    let human_values: Vec<&Value> = human.as_object().unwrap().values().collect();
    assert_eq!(short_values, human_values);
    assert_ne!(object_keys(&short), object_keys(&human));
}

// Platform-only attributes appear only when present
#[test]
fn test_optional_fields_follow_presence() {
    let names = MockNames::default();
    let types = plain_types();
    let builder = StatRecordBuilder::new(&names)
        .with_file_types(&types)
        .with_devices(DeviceNumbering::Linux)
        .with_times(eastern_daylight());

    let plain = builder.fields_record(&synthetic_status(), Naming::Short);
    for key in ["st_gen", "st_blocks", "st_blksize", "st_rdev", "st_flags", "st_birthtime"] {
        assert!(plain.get(key).is_none(), "{} should be absent", key);
    }

    let bsd = RawStatus {
        blocks: Some(16),
        blksize: Some(4096),
        rdev: Some(0),
        flags: Some(0x2),
        gen: Some(7),
        birthtime: Some(1535036780.0),
        ..synthetic_status()
    };
    let about = builder.fields_record(&bsd, Naming::Human);
    let keys = about.keys();
    assert_eq!(
        &keys[10..],
        &["blocks", "block_size", "rdev", "flags", "generation", "creation_time"]
    );
    assert_eq!(about.get("generation"), Some(&json!(7)));
    assert_eq!(
        about.get("rdev"),
        Some(&json!({"device_id": 0, "major_id": 0, "minor_id": 0}))
    );
    assert_eq!(about.get("flags").unwrap()["UF_IMMUTABLE"], true);
    assert_eq!(
        about.get("creation_time"),
        Some(&json!({"seconds": 1535036780.0, "iso8601": "2018-08-23T11:06:20-04:00"}))
    );
}

// Missing nanosecond sub-fields leave the time records alone
#[test]
fn test_missing_nanoseconds_are_omitted() {
    let names = MockNames::default();
    let st = RawStatus {
        atime_ns: None,
        mtime_ns: None,
        ctime_ns: None,
        ..synthetic_status()
    };
    let types = plain_types();
    let about = StatRecordBuilder::new(&names)
        .with_file_types(&types)
        .with_times(eastern_daylight())
        .fields_record(&st, Naming::Short);
    assert_eq!(object_keys(about.get("st_atime").unwrap()), vec!["seconds", "iso8601"]);
}

// Unresolvable owner degrades to a null name
#[test]
fn test_unknown_owner_has_null_name() {
    let names = MockNames::default();
    let st = RawStatus {
        uid: 31337,
        gid: 31338,
        ..synthetic_status()
    };
    let about = StatRecordBuilder::new(&names).fields_record(&st, Naming::Short);
    assert_eq!(about.get("st_uid"), Some(&json!({"uid": 31337, "name": null})));
    assert_eq!(about.get("st_gid"), Some(&json!({"gid": 31338, "name": null})));
}

fn builder(names: &MockNames) -> StatRecordBuilder<'_> {
    StatRecordBuilder::new(names)
}

fn make_file(dir: &Path, name: &str, mode: u32) -> io::Result<()> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    writeln!(file, "some content")?;
    fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

// Full record for a real regular file
#[test]
fn test_build_regular_file() -> io::Result<()> {
    let dir = tempdir()?;
    make_file(dir.path(), "file.txt", 0o644)?;
    let path = dir.path().join("file.txt");
    set_file_times(&path, FileTime::from_unix_time(1535036782, 500_000_000), FileTime::from_unix_time(1535036783, 0))?;

    let names = MockNames::default();
    let about = builder(&names).build(&path, true, Naming::Short);

    assert!(about.is_success());
    let keys = about.keys();
    assert_eq!(
        &keys[..7],
        &["filename", "success", "followed_symlink", "filetype", "realpath", "st_mode", "st_ino"]
    );
    assert_eq!(about.get("filename"), Some(&json!(path.to_str().unwrap())));
    assert_eq!(about.get("followed_symlink"), Some(&json!(false)));
    assert_eq!(about.get("filetype"), Some(&json!("regular")));
    assert_eq!(
        about.get("realpath"),
        Some(&json!(fs::canonicalize(&path)?.to_str().unwrap()))
    );

    let mode = about.get("st_mode").unwrap();
    assert_eq!(mode["string"], "-rw-r--r-- ");
    assert_eq!(mode["octal"], "0100644");
    assert_eq!(about.get("st_size"), Some(&json!(13)));

    let atime = about.get("st_atime").unwrap();
    assert_eq!(atime["seconds"], 1535036782.5);
    assert_eq!(atime["nanoseconds"], 1535036782500000000i64);
    let mtime = about.get("st_mtime").unwrap();
    assert_eq!(mtime["seconds"], 1535036783.0);
    assert!(mtime["iso8601"].as_str().unwrap().starts_with("2018-08-2"));

    Ok(())
}

// Timestamps on either side of a DST change carry their own offset
#[test]
fn test_build_renders_times_in_named_zone() -> io::Result<()> {
    let dir = tempdir()?;
    make_file(dir.path(), "dst.txt", 0o644)?;
    let path = dir.path().join("dst.txt");
    set_file_times(
        &path,
        FileTime::from_unix_time(1520751599, 0),
        FileTime::from_unix_time(1520751600, 0),
    )?;

    let names = MockNames::default();
    let about = builder(&names)
        .with_times(TimeDecorator::new(Zone::Named(chrono_tz::America::New_York)))
        .build(&path, true, Naming::Human);

    assert_eq!(about.get("access_time").unwrap()["iso8601"], "2018-03-11T01:59:59-05:00");
    assert_eq!(about.get("modification_time").unwrap()["iso8601"], "2018-03-11T03:00:00-04:00");
    Ok(())
}

// Nonexistent paths yield an error record and nothing else
#[test]
fn test_build_missing_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist");

    let names = MockNames::default();
    let about = builder(&names).build(&path, true, Naming::Short);

    assert_eq!(about.keys(), vec!["filename", "success", "error"]);
    assert!(!about.is_success());
    let error = about.get("error").unwrap();
    assert_eq!(object_keys(error), vec!["class", "message"]);
    assert_eq!(error["class"], "NotFound");
    assert!(!error["message"].as_str().unwrap().is_empty());
    assert!(names.lookups.lock().unwrap().is_empty());
}

// Symlinks: followed by default, reported with a target under -P
#[test]
fn test_build_symlink() -> io::Result<()> {
    let dir = tempdir()?;
    make_file(dir.path(), "target.txt", 0o600)?;
    let link = dir.path().join("link");
    symlink("target.txt", &link)?;

    let names = MockNames::default();
    let b = builder(&names);

    let followed = b.build(&link, true, Naming::Short);
    assert_eq!(followed.get("followed_symlink"), Some(&json!(true)));
    assert_eq!(followed.get("filetype"), Some(&json!("regular")));
    assert!(followed.get("target").is_none());
    assert_eq!(followed.get("st_mode").unwrap()["string"], "-rw------- ");

    let own = b.build(&link, false, Naming::Short);
    assert_eq!(
        &own.keys()[..6],
        &["filename", "success", "followed_symlink", "target", "filetype", "realpath"]
    );
    assert_eq!(own.get("followed_symlink"), Some(&json!(false)));
    assert_eq!(own.get("target"), Some(&json!("target.txt")));
    assert_eq!(own.get("filetype"), Some(&json!("symlink")));
    assert_eq!(own.get("st_mode").unwrap()["string"].as_str().unwrap().chars().next(), Some('l'));
    assert_eq!(
        own.get("realpath"),
        Some(&json!(fs::canonicalize(dir.path().join("target.txt"))?.to_str().unwrap()))
    );
    Ok(())
}

// A dangling link still describes itself under -P
#[test]
fn test_build_dangling_symlink() -> io::Result<()> {
    let dir = tempdir()?;
    let link = dir.path().join("dangling");
    symlink("nowhere", &link)?;

    let names = MockNames::default();
    let b = builder(&names);

    let followed = b.build(&link, true, Naming::Short);
    assert!(!followed.is_success());
    assert_eq!(followed.get("error").unwrap()["class"], "NotFound");

    let own = b.build(&link, false, Naming::Short);
    assert!(own.is_success());
    assert_eq!(own.get("target"), Some(&json!("nowhere")));
    assert!(own.get("realpath").unwrap().as_str().unwrap().ends_with("dangling"));
    Ok(())
}

// Directories and special permission bits
#[test]
fn test_build_sticky_directory() -> io::Result<()> {
    let dir = tempdir()?;
    let sub = dir.path().join("shared");
    fs::create_dir(&sub)?;
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o1777))?;

    let names = MockNames::default();
    let about = builder(&names).build(&sub, true, Naming::Human);
    assert_eq!(about.get("filetype"), Some(&json!("directory")));
    let mode = about.get("mode").unwrap();
    assert_eq!(mode["string"], "drwxrwxrwt ");
    assert_eq!(mode["bits"]["S_ISVTX"], true);
    assert!(about.get("st_mode").is_none());
    Ok(())
}

// Names that are not UTF-8 are escaped; the base64 prefix rule applies to
// the whole name only
#[test]
fn test_build_escapes_filenames() -> io::Result<()> {
    let dir = tempdir()?;
    let names = MockNames::default();
    let b = builder(&names);

    // Other platforms refuse such names at creation time
    if cfg!(target_os = "linux") {
        let raw = OsString::from_vec(vec![b'b', b'a', b'd', 0xff]);
        let path = dir.path().join(&raw);
        File::create(&path)?;
        let about = b.build(&path, true, Naming::Short);
        assert!(about.is_success());
        let filename = about.get("filename").unwrap().as_str().unwrap();
        assert!(filename.starts_with("base64:"), "{}", filename);
        let realpath = about.get("realpath").unwrap().as_str().unwrap();
        assert!(realpath.starts_with("base64:"), "{}", realpath);
    }

    let inner = dir.path().join("base64:Zm9v");
    File::create(&inner)?;
    let about = b.build(&inner, true, Naming::Short);
    assert_eq!(about.get("filename"), Some(&json!(inner.to_str().unwrap())));
    Ok(())
}

// Batch building keeps input order and mixes successes with failures
#[test]
fn test_build_all_and_write() -> io::Result<()> {
    let dir = tempdir()?;
    make_file(dir.path(), "one", 0o644)?;
    make_file(dir.path(), "two", 0o755)?;

    let paths: Vec<OsString> = ["one", "missing", "two"]
        .iter()
        .map(|n| dir.path().join(n).into_os_string())
        .collect();

    let names = MockNames::default();
    let records = builder(&names).build_all(&paths, true, Naming::Short);
    assert_eq!(records.len(), 3);
    assert!(records[0].is_success());
    assert!(!records[1].is_success());
    assert!(records[2].is_success());
    assert_eq!(records[2].get("st_mode").unwrap()["string"], "-rwxr-xr-x ");

    let text = JsonWriter::compact(false).to_string(&records).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 3);
    for (record, path) in list.iter().zip(&paths) {
        assert_eq!(record["filename"], path.to_str().unwrap());
    }
    assert_eq!(list[1]["success"], false);
    Ok(())
}

/// Resolver noting which threads perform lookups
#[derive(Default)]
struct ThreadTally {
    threads: Mutex<HashSet<ThreadId>>,
}

impl NameResolver for ThreadTally {
    fn user_name(&self, _uid: u32) -> Option<String> {
        self.threads.lock().unwrap().insert(thread::current().id());
        None
    }

    fn group_name(&self, _gid: u32) -> Option<String> {
        self.threads.lock().unwrap().insert(thread::current().id());
        None
    }
}

fn many_files(dir: &Path, count: usize) -> io::Result<Vec<OsString>> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("f{:02}", i));
            File::create(&path)?;
            Ok(path.into_os_string())
        })
        .collect()
}

// One worker means every path is examined on the same thread, whatever the
// size of rayon's global pool
#[test]
fn test_single_worker_builds_on_one_thread() -> io::Result<()> {
    let dir = tempdir()?;
    let paths = many_files(dir.path(), 32)?;

    let tally = ThreadTally::default();
    let builder = StatRecordBuilder::new(&tally);
    let pool = worker_pool(1).unwrap();
    let records = pool.install(|| builder.build_all(&paths, true, Naming::Short));

    assert_eq!(records.len(), 32);
    assert!(records.iter().all(StatRecord::is_success));
    assert_eq!(tally.threads.lock().unwrap().len(), 1);
    Ok(())
}

#[test]
fn test_worker_pool_bounds_threads_and_keeps_order() -> io::Result<()> {
    let dir = tempdir()?;
    let paths = many_files(dir.path(), 32)?;

    let tally = ThreadTally::default();
    let builder = StatRecordBuilder::new(&tally);
    let pool = worker_pool(3).unwrap();
    let records = pool.install(|| builder.build_all(&paths, true, Naming::Short));

    assert!(tally.threads.lock().unwrap().len() <= 3);
    for (record, path) in records.iter().zip(&paths) {
        assert_eq!(record.get("filename").unwrap(), path.to_str().unwrap());
    }
    Ok(())
}
