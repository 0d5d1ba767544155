// File primitives for the catalog update: backups, atomic writes, restores.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

use chrono::{DateTime, Local};
use log::warn;
use tempfile::NamedTempFile;

use crate::gened::*;

/// `<file>.backup_<YYYYMMDD_HHMMSS>`, with `_<n>` appended for the n-th
/// backup taken within the same second.
pub fn backup_path(path: &Path, at: &DateTime<Local>, n: u32) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".backup_{}", at.format("%Y%m%d_%H%M%S")));
    if n > 0 {
        name.push(format!("_{}", n));
    }
    PathBuf::from(name)
}

/// Copies the file to a new timestamped backup next to it and returns the
/// path of the backup. An existing file is never overwritten. Permissions
/// and modification time are carried over.
pub fn create_backup(path: &Path, at: &DateTime<Local>) -> GenEdResult<PathBuf> {
    let meta = fs::metadata(path).context(ReadingFileSnafu { path })?;
    let mut source = File::open(path).context(ReadingFileSnafu { path })?;

    let mut n = 0;
    let (backup, mut dest) = loop {
        let candidate = backup_path(path, at, n);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(f) => break (candidate, f),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("create_backup: {:?} already exists", candidate);
                n += 1;
            }
            Err(e) => return Err(e).context(BackupSnafu { backup: candidate }),
        }
    };

    io::copy(&mut source, &mut dest).context(BackupSnafu {
        backup: backup.clone(),
    })?;
    dest.sync_all().context(BackupSnafu {
        backup: backup.clone(),
    })?;
    dest.set_permissions(meta.permissions())
        .context(BackupSnafu {
            backup: backup.clone(),
        })?;
    let modified = meta.modified().context(ReadingFileSnafu { path })?;
    dest.set_modified(modified).context(BackupSnafu {
        backup: backup.clone(),
    })?;
    info!("Backup created: {:?}", backup);
    Ok(backup)
}

/// Replaces the content of the file in one step: the content goes to a
/// temporary file of the same directory, which is then renamed over the
/// target.
pub fn write_atomic(path: &Path, contents: &str) -> GenEdResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).context(WritingSnafu { path })?;
    tmp.write_all(contents.as_bytes())
        .context(WritingSnafu { path })?;
    tmp.as_file().sync_all().context(WritingSnafu { path })?;
    // The temporary file is created with restricted permissions.
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .context(WritingSnafu { path })?;
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .context(WritingSnafu { path })?;
    debug!("write_atomic: {} bytes to {:?}", contents.len(), path);
    Ok(())
}

/// Copies a backup back over the file it was taken from.
pub fn restore(backup: &Path, path: &Path) -> GenEdResult<()> {
    fs::copy(backup, path).context(RestoreSnafu { path, backup })?;
    warn!("Restored {:?} from {:?}", path, backup);
    Ok(())
}
