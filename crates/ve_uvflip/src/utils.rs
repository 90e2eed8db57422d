use atomicwrites::{AtomicFile, OverwriteBehavior};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

pub fn file_name(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()
}

pub fn combine_path(directory: &Path, file_name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}.{}", file_name, extension))
}

pub fn read_file(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Replaces the content of `target`.
/// With `atomic` the data goes to a temporary file next to `target`, which takes over its
/// permissions and is then renamed over it. Otherwise `target` is truncated and written directly.
pub fn write_file(target: &Path, data: &[u8], atomic: bool) -> io::Result<()> {
    if atomic {
        // the temporary file is placed in the parent, which a bare file name doesn't have
        let target = fs::canonicalize(target)?;
        let permissions = fs::metadata(&target)?.permissions();
        AtomicFile::new(&target, OverwriteBehavior::AllowOverwrite)
            .write(|f| {
                f.set_permissions(permissions)?;
                f.write_all(data)?;
                f.flush()
            })
            .map_err(|err| match err {
                atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => err,
            })
    } else {
        let mut buffer = File::create(target)?;
        buffer.write_all(data)?;
        buffer.flush()
    }
}
