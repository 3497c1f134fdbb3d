//! Runs one embedded `PostgreSQL` lifecycle step on behalf of the test cluster.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! `PostgreSQL` refuses to initialise or run as root, so when the integration
//! tests run as root the cluster delegates each step to this binary. The
//! payload is the JSON [`WorkerPayload`] written by `pg-embed-setup-unpriv`;
//! it is read before the process switches to the `nobody` account.
//!
//! [`WorkerPayload`]: pg_embedded_setup_unpriv::worker::WorkerPayload

#[cfg(unix)]
mod worker {
    use camino::{Utf8Path, Utf8PathBuf};
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use std::env;
    use std::ffi::{CString, OsString};
    use std::io::Read;
    use thiserror::Error;
    use tokio::runtime::Builder;

    const UNPRIVILEGED_USER: &str = "nobody";

    /// Failures of a single worker invocation.
    #[derive(Debug, Error)]
    pub enum WorkerError {
        #[error("usage: pg_worker <setup|start|stop> <payload-path>: {0}")]
        Usage(String),
        #[error("failed to read payload {path}: {message}")]
        ReadPayload { path: Utf8PathBuf, message: String },
        #[error("failed to parse payload: {0}")]
        ParsePayload(#[from] serde_json::Error),
        #[error("invalid PostgreSQL settings: {0}")]
        Settings(String),
        #[error("failed to switch to {user}: {message}")]
        PrivilegeDrop { user: &'static str, message: String },
        #[error("failed to build runtime: {0}")]
        Runtime(#[source] std::io::Error),
        #[error("PostgreSQL {operation} failed: {message}")]
        Postgres {
            operation: &'static str,
            message: String,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Operation {
        Setup,
        Start,
        Stop,
    }

    impl Operation {
        const fn as_str(self) -> &'static str {
            match self {
                Self::Setup => "setup",
                Self::Start => "start",
                Self::Stop => "stop",
            }
        }

        fn failed(self, err: &impl std::fmt::Display) -> WorkerError {
            WorkerError::Postgres {
                operation: self.as_str(),
                message: err.to_string(),
            }
        }
    }

    impl TryFrom<&str> for Operation {
        type Error = WorkerError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            match value {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::Usage(format!("unknown operation '{other}'"))),
            }
        }
    }

    /// Executes the operation named on the command line.
    pub fn run(args: impl IntoIterator<Item = OsString>) -> Result<(), WorkerError> {
        let (operation, payload_path) = parse_args(args)?;
        let payload = load_payload(&payload_path)?;
        drop_privileges(UNPRIVILEGED_USER)?;
        apply_environment(&payload.environment);
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Runtime)?;
        let mut postgres = PostgreSQL::new(settings);
        runtime.block_on(async {
            match operation {
                Operation::Setup => postgres
                    .setup()
                    .await
                    .map_err(|err| operation.failed(&err)),
                Operation::Start => {
                    if !matches!(postgres.status(), Status::Started) {
                        postgres
                            .start()
                            .await
                            .map_err(|err| operation.failed(&err))?;
                    }
                    // Dropping the handle would stop the server this step started.
                    std::mem::forget(postgres);
                    Ok(())
                }
                Operation::Stop => postgres.stop().await.map_err(|err| operation.failed(&err)),
            }
        })
    }

    fn parse_args(
        args: impl IntoIterator<Item = OsString>,
    ) -> Result<(Operation, Utf8PathBuf), WorkerError> {
        let mut values = args.into_iter().skip(1).map(|arg| {
            arg.into_string()
                .map_err(|_| WorkerError::Usage("arguments must be UTF-8".to_owned()))
        });
        let operation = values
            .next()
            .ok_or_else(|| WorkerError::Usage("missing operation".to_owned()))??;
        let payload_path = values
            .next()
            .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))??;
        if let Some(extra) = values.next() {
            return Err(WorkerError::Usage(format!(
                "unexpected argument '{}'",
                extra?
            )));
        }
        Ok((
            Operation::try_from(operation.as_str())?,
            Utf8PathBuf::from(payload_path),
        ))
    }

    fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
        let unreadable = |message: String| WorkerError::ReadPayload {
            path: path.to_owned(),
            message,
        };
        let (dir, relative) =
            ambient_dir_and_path(path).map_err(|err| unreadable(err.to_string()))?;
        let mut file = dir
            .open(relative.as_std_path())
            .map_err(|err| unreadable(err.to_string()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|err| unreadable(err.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn drop_privileges(user_name: &'static str) -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }
        let denied = |message: String| WorkerError::PrivilegeDrop {
            user: user_name,
            message,
        };

        let user = User::from_name(user_name)
            .map_err(|err| denied(err.to_string()))?
            .ok_or_else(|| denied("no such user".to_owned()))?;
        let c_name = CString::new(user.name.clone()).map_err(|err| denied(err.to_string()))?;
        initgroups(&c_name, user.gid).map_err(|err| denied(err.to_string()))?;
        setgid(user.gid).map_err(|err| denied(err.to_string()))?;
        setuid(user.uid).map_err(|err| denied(err.to_string()))?;
        env::set_current_dir("/").map_err(|err| denied(err.to_string()))?;

        // SAFETY: the worker is single-threaded until the runtime is built.
        unsafe {
            env::set_var("HOME", &user.dir);
            env::set_var("USER", &user.name);
            env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: the worker is single-threaded until the runtime is built.
            unsafe {
                match value {
                    Some(secret) => env::set_var(key, secret.expose()),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), worker::WorkerError> {
    worker::run(std::env::args_os())
}

#[cfg(not(unix))]
fn main() -> Result<(), &'static str> {
    Err("pg_worker requires a Unix host")
}
