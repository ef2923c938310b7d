// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Result, RrError};

/// Output path from `-o`. A trailing separator or an existing directory means
/// "put the default file in there".
pub fn resolve_out_path(user_o: &str, default_filename: &str) -> Result<PathBuf> {
    if user_o.is_empty() {
        return Ok(PathBuf::from(default_filename));
    }
    let p = PathBuf::from(normalize_separators(user_o));
    if looks_like_dir_hint(&p) || p.is_dir() {
        ensure_directory(&p)?;
        Ok(p.join(default_filename))
    } else {
        Ok(p)
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(RrError::config(format!("path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// Write `contents` beside `path`, then rename over it. Readers see either the
/// old file or the new one, never a partial write.
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".part");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Race files named one per line. Blank lines are skipped.
pub fn read_race_list(path: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path)
        .map_err(|e| RrError::config(format!("cannot read race list {}: {e}", path.display())))?;
    let files: Vec<PathBuf> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect();
    if files.is_empty() {
        return Err(RrError::config(format!("race list {} names no files", path.display())));
    }
    Ok(files)
}
