/*
    dir_lock.rs - Single-writer guard for a data directory

    A persistent store holds an exclusive advisory lock on `<data_dir>/LOCK`
    for as long as it is open. A second store on the same directory, in this
    process or another, fails to open instead of handing out indices the
    first one already used. The lock is released when the file is closed,
    including when the process dies.
*/

use crate::core_board::store::errors::{BoardError, BoardResult};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::io::AsRawFd;

pub const LOCK_FILE: &str = "LOCK";

/// Exclusive hold on a data directory, released on drop
#[derive(Debug)]
pub struct DirLock {
    path: PathBuf,
    _file: File,
}

impl DirLock {
    /// Take the lock on `data_dir`, creating the directory if needed.
    ///
    /// Fails with `Storage` without waiting when another store holds it.
    pub fn acquire(data_dir: &Path) -> BoardResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new().create(true).truncate(false).write(true).open(&path)?;

        if !try_lock_exclusive(&file)? {
            return Err(BoardError::Storage(format!(
                "Data directory {} is in use by another store",
                data_dir.display()
            )));
        }

        Ok(DirLock { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    let fd = file.as_raw_fd();
    // SAFETY: `fd` comes from an open `File` that outlives this call, and
    // `LOCK_EX | LOCK_NB` is a valid `flock` operation.
    let rc = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(libc::EWOULDBLOCK) {
        return Ok(false);
    }
    Err(err)
}

#[cfg(not(unix))]
fn try_lock_exclusive(_: &File) -> io::Result<bool> {
    Ok(true)
}
