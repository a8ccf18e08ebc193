use super::Context;
use crate::config::ExecConfig;
use crate::error::KrunResult;
use crate::marshal::{CStringArray, array_ptr, c_string};
use crate::status::check_status;

impl Context {
    /// Set the executable, its arguments and its environment.
    ///
    /// With `env: None` libkrun builds the guest environment from the current
    /// process; `Some(vec![])` gives the guest no variables at all.
    pub fn set_exec(&self, exec: &ExecConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_set_exec";
        tracing::debug!(
            ctx_id = self.ctx_id,
            path = %exec.path,
            args = ?exec.args,
            env_count = exec.env.as_ref().map(Vec::len),
            "Setting exec"
        );

        let path_c = c_string(FUNC, &exec.path)?;
        let argv = CStringArray::new(FUNC, &exec.args)?;
        let envp = CStringArray::from_option(FUNC, exec.env.as_deref())?;

        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_exec(
                self.ctx_id,
                path_c.as_ptr(),
                argv.as_ptr(),
                array_ptr(envp.as_ref()),
            )
        })
    }

    /// Replace the guest environment. `None` inherits the host's.
    pub fn set_env<S: AsRef<str>>(&self, env: Option<&[S]>) -> KrunResult<()> {
        const FUNC: &str = "krun_set_env";
        tracing::debug!(
            ctx_id = self.ctx_id,
            env_count = env.map(<[S]>::len),
            "Setting environment"
        );
        let envp = CStringArray::from_option(FUNC, env)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_env(self.ctx_id, array_ptr(envp.as_ref()))
        })
    }

    /// Working directory of the guest process, relative to the guest root.
    pub fn set_workdir(&self, workdir: &str) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, workdir, "Setting workdir");
        let workdir_c = c_string("krun_set_workdir", workdir)?;
        check_status("krun_set_workdir", unsafe {
            libkrun_sys::krun_set_workdir(self.ctx_id, workdir_c.as_ptr())
        })
    }

    /// Resource limits for the guest process, as `"RESOURCE=CUR:MAX"`
    /// entries (`"6=4096:8192"` sets RLIMIT_NPROC). An empty slice is sent as
    /// an empty array, not NULL.
    pub fn set_rlimits<S: AsRef<str>>(&self, rlimits: &[S]) -> KrunResult<()> {
        const FUNC: &str = "krun_set_rlimits";
        tracing::debug!(ctx_id = self.ctx_id, count = rlimits.len(), "Setting rlimits");
        let rlimits = CStringArray::new(FUNC, rlimits)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_rlimits(self.ctx_id, rlimits.as_ptr())
        })
    }
}
