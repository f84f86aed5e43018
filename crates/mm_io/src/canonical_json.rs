//! Canonical JSON utilities (mm_io)
//! - Objects: keys sorted lexicographically (UTF-8 codepoint order)
//! - Arrays: order preserved (caller is responsible for stable ordering)
//! - Output: compact (no extra spaces, no trailing newline)
//! - Artifacts are written through a sibling temp file and a rename, so a
//!   reader never sees a half-written comparison.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::IoError;

/// Convert a serde_json `Value` to canonical JSON bytes.
pub fn to_canonical_json_bytes(v: &Value) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::with_capacity(1024);
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

/// Canonical bytes of any serializable value (goes through `serde_json::Value`).
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, IoError> {
    let v = serde_json::to_value(value)?;
    to_canonical_json_bytes(&v)
}

/// Canonical JSON of `value`, written with `write_atomic`.
pub fn write_canonical_file<T: Serialize>(value: &T, path: &Path) -> Result<(), IoError> {
    let bytes = to_canonical_bytes(value)?;
    write_atomic(path, &bytes).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))
}

/// Artifact write: sibling temp file, fsync, then rename over `path`.
/// The temp file lives in the target's directory, so the rename never
/// crosses a filesystem boundary.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    fs::create_dir_all(&dir)?;

    let tmp = sibling_tmp(path);
    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    sync_dir(&dir);
    Ok(())
}

fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, k)?;
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

/// "<name>.<pid>-<seq>.part" next to `target`.
fn sibling_tmp(target: &Path) -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static SEQ: AtomicU32 = AtomicU32::new(0);

    let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("artifact");
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{name}.{}-{seq}.part", std::process::id()))
}

/// Best effort; directory fsync only exists on Unix.
fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    {
        if let Ok(d) = fs::File::open(dir) {
            let _ = d.sync_all();
        }
    }
    #[cfg(not(unix))]
    let _ = dir;
}
