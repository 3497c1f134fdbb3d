//! Reads back settings the cluster writes to disk.

use super::BoxError;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use postgresql_embedded::Settings;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;

/// Replaces the configured password with the one in the password file.
pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let (dir, file_name) = open_parent_dir(&settings.password_file)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Box::new(err) as BoxError),
    }
}

/// Adopts the port the server reports in `postmaster.pid`.
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let data_dir = Dir::open_ambient_dir(&settings.data_dir, ambient_authority())?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(Box::new(err) as BoxError),
    };

    // Line four of postmaster.pid holds the port.
    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}

fn open_parent_dir(path: &Path) -> Result<(Dir, &OsStr), BoxError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Box::new(std::io::Error::other("path must name a file")) as BoxError)?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}
