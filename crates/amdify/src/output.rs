//! Writing conversion results

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::{ConvertError, IoAction, Result},
    types::ConversionTable,
    util::SOURCE_EXTENSION,
};

/// Where converted text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One file; parent directories are created
    File(PathBuf),
    /// One `<identity>.js` file per converted module
    Directory(PathBuf),
    Stdout,
}

/// Write `contents` to `path`, creating missing parent directories first
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConvertError::io(IoAction::CreateDir, dir, e))?;
    }
    std::fs::write(path, contents).map_err(|e| ConvertError::io(IoAction::Write, path, e))
}

/// Write every table entry to `dir/<identity>.js`, returning the written paths
pub fn write_modules(dir: &Path, table: &ConversionTable) -> Result<Vec<PathBuf>> {
    table
        .iter()
        .map(|(identity, code)| {
            let path = dir.join(format!("{identity}{SOURCE_EXTENSION}"));
            write_file(&path, code)?;
            info!("Convert {identity} -> {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Write `contents` plus a newline to `out`
pub fn write_stream(out: &mut impl Write, contents: &str) -> Result<()> {
    writeln!(out, "{contents}")
        .and_then(|()| out.flush())
        .map_err(|e| ConvertError::io(IoAction::Write, "<stdout>", e))
}
