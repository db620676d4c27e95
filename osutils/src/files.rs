use std::{
    fs::File,
    io::ErrorKind,
    path::Path,
};

use anyhow::{Context, Error};

/// Creates a file and all parent directories if they don't exist
pub fn create_file<S>(path: S) -> Result<File, Error>
where
    S: AsRef<Path>,
{
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create path: {}", parent.display()))?;
    }

    File::create(path.as_ref())
        .with_context(|| format!("Could not create file: {}", path.as_ref().display()))
}

/// Reads a file to a string, returning `None` when the file does not exist
pub fn read_optional<S>(path: S) -> Result<Option<String>, Error>
where
    S: AsRef<Path>,
{
    match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!("Could not read file contents: {}", path.as_ref().display())
        }),
    }
}
