//! Owned handle to a libkrun configuration context.
//!
//! A [`Context`] is created with [`Context::create`], configured through the
//! setters in the sibling modules and finished with either
//! [`Context::start_enter`] or [`Context::free`]. Both finishers take `self`
//! by value, so a context cannot be touched after it was started or freed:
//!
//! ```compile_fail,E0382
//! let ctx = krun::Context::create().unwrap();
//! let _ = ctx.start_enter();
//! ctx.set_workdir("/").unwrap();
//! ```
//!
//! Dropping a context that was never finished frees its native state.

use std::cell::Cell;
use std::marker::PhantomData;

use crate::error::{KrunError, KrunResult};
use crate::status::check_status;

mod console;
mod disk;
mod exec;
mod fs;
mod gpu;
mod kernel;
mod net;
mod tee;
mod vm;
mod vsock;

/// Thin wrapper that owns a libkrun context.
///
/// `Send` but not `Sync`: a context may move to another thread, but it must
/// not be configured from two threads at once.
#[derive(Debug)]
pub struct Context {
    ctx_id: u32,
    _not_sync: PhantomData<Cell<()>>,
}

impl Context {
    /// Create a new, empty context.
    pub fn create() -> KrunResult<Self> {
        tracing::trace!("Calling krun_create_ctx()");
        let ctx = unsafe { libkrun_sys::krun_create_ctx() };
        if ctx < 0 {
            tracing::debug!(status = ctx, "krun_create_ctx failed");
            return Err(KrunError::from_status("krun_create_ctx", ctx));
        }
        tracing::trace!(ctx_id = ctx, "krun_create_ctx succeeded");
        Ok(Self {
            ctx_id: ctx as u32,
            _not_sync: PhantomData,
        })
    }

    /// The native context id.
    pub fn id(&self) -> u32 {
        self.ctx_id
    }

    /// Release the context and report what libkrun said about it.
    pub fn free(self) -> KrunResult<()> {
        let ctx_id = self.into_id();
        tracing::trace!(ctx_id, "Calling krun_free_ctx");
        check_status("krun_free_ctx", unsafe {
            libkrun_sys::krun_free_ctx(ctx_id)
        })
    }

    /// Start the microVM and hand the calling process over to it.
    ///
    /// On success this never returns: libkrun exits the process with the
    /// guest workload's exit status once it finishes. An `Err` means the VM
    /// did not start. The context is consumed in both cases and its native
    /// state is not freed here.
    pub fn start_enter(self) -> KrunResult<()> {
        let ctx_id = self.into_id();
        tracing::trace!(ctx_id, "Calling krun_start_enter");
        let status = unsafe { libkrun_sys::krun_start_enter(ctx_id) };
        tracing::trace!(status, "krun_start_enter returned");
        check_status("krun_start_enter", status)
    }

    // Gives up ownership without running Drop.
    fn into_id(self) -> u32 {
        let ctx_id = self.ctx_id;
        std::mem::forget(self);
        ctx_id
    }

    /// A context id libkrun never handed out, for exercising paths that fail
    /// before any native call.
    #[cfg(test)]
    pub(crate) fn unregistered() -> Self {
        Self {
            ctx_id: u32::MAX,
            _not_sync: PhantomData,
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        tracing::trace!(ctx_id = self.ctx_id, "Freeing dropped context");
        unsafe {
            let _ = libkrun_sys::krun_free_ctx(self.ctx_id);
        }
    }
}
