//! Output writing: both artifacts land together or not at all

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ShaderGenError;

fn tmp_path_for(path: &Path) -> io::Result<PathBuf> {
    match path.file_name() {
        Some(name) => {
            let mut tmp_name = OsString::from(name);
            tmp_name.push(".tmp");
            Ok(path.with_file_name(tmp_name))
        }
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output path has no file name",
        )),
    }
}

fn write_synced(path: &Path, contents: &str) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())?;
    f.sync_all()
}

fn replace(tmp_path: &Path, path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path)?;
        }
    }
    fs::rename(tmp_path, path)
}

/// Write every `(path, contents)` pair via sibling `.tmp` files.
///
/// All temporaries are written and synced before the first rename, so an
/// error while producing content never touches existing outputs. Leftover
/// temporaries are removed on failure.
pub fn write_all_atomic(files: &[(PathBuf, String)]) -> Result<(), ShaderGenError> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(files.len());

    let result = stage_and_replace(files, &mut staged);

    if result.is_err() {
        for tmp_path in &staged {
            if tmp_path.exists() {
                let _ = fs::remove_file(tmp_path);
            }
        }
    }

    result
}

fn stage_and_replace(
    files: &[(PathBuf, String)],
    staged: &mut Vec<PathBuf>,
) -> Result<(), ShaderGenError> {
    for (path, contents) in files {
        let tmp_path = tmp_path_for(path).map_err(|e| ShaderGenError::io(path, e))?;
        staged.push(tmp_path.clone());
        write_synced(&tmp_path, contents).map_err(|e| ShaderGenError::io(&tmp_path, e))?;
    }
    for ((path, _), tmp_path) in files.iter().zip(staged.iter()) {
        replace(tmp_path, path).map_err(|e| ShaderGenError::io(path, e))?;
        tracing::info!("Generated {}", path.display());
    }
    Ok(())
}
