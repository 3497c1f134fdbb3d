//! Embedded `PostgreSQL` cluster shared by the integration tests.
//!
//! The cluster starts once per test binary. Unprivileged runs drive
//! `postgresql_embedded` in process; root runs hand each lifecycle step to
//! the `pg_worker` binary, which switches to `nobody` first.

mod env_utils;
mod fs_utils;

use self::env_utils::{env_vars_to_os, worker_env_changes};
use self::fs_utils::{sync_password_from_file, sync_port_from_pid};
use crate::test_helpers::EnvVarGuard;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Status};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Boxed error type used by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared cluster handle.
pub type PostgresCluster = &'static ManagedCluster;

static SHARED_CLUSTER: OnceLock<ManagedCluster> = OnceLock::new();
static START_LOCK: Mutex<()> = Mutex::new(());

/// Running embedded cluster.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn start() -> Result<Self, BoxError> {
        let worker_env = worker_env_changes()?;
        let worker_guard = EnvVarGuard::set_many(&worker_env);
        let bootstrap = bootstrap_for_tests();
        drop(worker_guard);

        let mut cluster = Self {
            bootstrap: bootstrap.map_err(|err| Box::new(err) as BoxError)?,
            env_vars: Vec::new(),
            runtime: None,
            postgres: None,
        };
        sync_password_from_file(&mut cluster.bootstrap.settings)?;
        cluster.env_vars = cluster.bootstrap.environment.to_env();
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_via_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        sync_port_from_pid(&mut cluster.bootstrap.settings)?;
        Ok(cluster)
    }

    /// Connection URL for `database` on this cluster.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        let started = runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        });
        drop(env_guard);
        started?;

        self.bootstrap.settings = postgres.settings().clone();
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&self) -> Result<(), BoxError> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)
    }

    fn run_worker_operation(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set for worker operation",
            )) as BoxError
        })?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).map_err(|err| Box::new(err) as BoxError)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        let stopped = match (&self.runtime, self.postgres.take()) {
            (Some(runtime), Some(postgres)) => runtime
                .block_on(postgres.stop())
                .map_err(|err| Box::new(err) as BoxError),
            _ if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) => self
                .run_worker_operation(WorkerOperation::Stop, self.bootstrap.shutdown_timeout),
            _ => Ok(()),
        };
        if let Err(err) = stopped {
            tracing::warn!(error = %err, "failed to stop embedded PostgreSQL");
        }
    }
}

/// Returns the cluster for this test binary, starting it on first use.
///
/// Blocks while the cluster boots, so async callers should invoke it from
/// `spawn_blocking`.
///
/// # Errors
///
/// Returns an error when the cluster cannot be bootstrapped or started.
pub fn shared_cluster() -> Result<PostgresCluster, BoxError> {
    let _guard = START_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(cluster) = SHARED_CLUSTER.get() {
        return Ok(cluster);
    }
    let cluster = ManagedCluster::start()?;
    Ok(SHARED_CLUSTER.get_or_init(|| cluster))
}
