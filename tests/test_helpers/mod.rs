//! Process-environment overrides shared by the taskdesk integration tests.
//!
//! The configuration tests point `TASKDESK_*` variables at temporary files,
//! and the `PostgreSQL` cluster exports `PG_*` settings while it boots. Both
//! go through [`EnvVarGuard`].

use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Holds a set of variable overrides and restores the previous values when
/// dropped.
///
/// Only one guard exists at a time within a test binary.
pub struct EnvVarGuard {
    restore: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes`, where `None` unsets the variable.
    pub fn set_many<K, V>(changes: &[(K, Option<V>)]) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let lock = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let restore = changes
            .iter()
            .map(|(key, value)| {
                let name = key.as_ref();
                let previous = env::var_os(name);
                apply(name, value.as_ref().map(V::as_ref));
                (name.to_os_string(), previous)
            })
            .collect();

        Self {
            restore,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (name, previous) in self.restore.drain(..).rev() {
            apply(&name, previous.as_deref());
        }
    }
}

fn apply(name: &OsStr, value: Option<&OsStr>) {
    // SAFETY: ENV_MUTEX is held by the calling guard for every mutation.
    unsafe {
        match value {
            Some(new_value) => env::set_var(name, new_value),
            None => env::remove_var(name),
        }
    }
}
