//! Environment preparation for the embedded cluster.

use super::BoxError;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::env;
use std::ffi::OsString;
use std::net::TcpListener;
use std::path::PathBuf;

const WORKER_VAR: &str = "PG_EMBEDDED_WORKER";
const PORT_VAR: &str = "PG_PORT";

pub(super) fn env_vars_to_os(
    env_vars: &[(String, Option<String>)],
) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Variables to set while bootstrapping: a free port unless one is pinned,
/// and the worker binary when running as root.
pub(super) fn worker_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if env::var_os(PORT_VAR).is_none() {
        changes.push((OsString::from(PORT_VAR), Some(free_port()?)));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && env::var_os(WORKER_VAR).is_none()
    {
        let worker = locate_pg_worker().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set and the pg_worker binary was not found",
            )) as BoxError
        })?;
        changes.push((OsString::from(WORKER_VAR), Some(worker.into_os_string())));
    }
    Ok(changes)
}

fn free_port() -> Result<OsString, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(OsString::from(port.to_string()))
}

fn locate_pg_worker() -> Option<PathBuf> {
    option_env!("CARGO_BIN_EXE_pg_worker")
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(locate_pg_worker_near_target)
}

fn locate_pg_worker_near_target() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let target_dir = exe.parent()?.parent()?;
    let worker = target_dir.join("pg_worker");
    worker.is_file().then_some(worker)
}
