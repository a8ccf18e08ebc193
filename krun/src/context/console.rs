use std::path::Path;

use super::Context;
use crate::config::{
    ConsolePortInOutConfig, ConsolePortTtyConfig, SerialConsoleConfig, VirtioConsoleConfig,
};
use crate::error::KrunResult;
use crate::marshal::{c_path, c_string};
use crate::status::{check_status, status_to_value};

impl Context {
    /// Redirect the implicit console to a file.
    ///
    /// This allows capturing kernel and init output for debugging.
    pub fn set_console_output(&self, filepath: impl AsRef<Path>) -> KrunResult<()> {
        let filepath = filepath.as_ref();
        tracing::debug!(ctx_id = self.ctx_id, filepath = %filepath.display(), "Setting console output path");
        let filepath_c = c_path("krun_set_console_output", filepath)?;
        check_status("krun_set_console_output", unsafe {
            libkrun_sys::krun_set_console_output(self.ctx_id, filepath_c.as_ptr())
        })
    }

    /// Don't create the implicit console device.
    pub fn disable_implicit_console(&self) -> KrunResult<()> {
        check_status("krun_disable_implicit_console", unsafe {
            libkrun_sys::krun_disable_implicit_console(self.ctx_id)
        })
    }

    /// Kernel console argument, e.g. `"hvc0"` or `"ttyS0"`.
    pub fn set_kernel_console(&self, console_id: &str) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, console_id, "Setting kernel console");
        let console_c = c_string("krun_set_kernel_console", console_id)?;
        check_status("krun_set_kernel_console", unsafe {
            libkrun_sys::krun_set_kernel_console(self.ctx_id, console_c.as_ptr())
        })
    }

    pub fn add_virtio_console_default(&self, console: &VirtioConsoleConfig) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, ?console, "Adding virtio console");
        check_status("krun_add_virtio_console_default", unsafe {
            libkrun_sys::krun_add_virtio_console_default(
                self.ctx_id,
                console.input_fd,
                console.output_fd,
                console.err_fd,
            )
        })
    }

    pub fn add_serial_console_default(&self, console: &SerialConsoleConfig) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, ?console, "Adding serial console");
        check_status("krun_add_serial_console_default", unsafe {
            libkrun_sys::krun_add_serial_console_default(
                self.ctx_id,
                console.input_fd,
                console.output_fd,
            )
        })
    }

    /// Add a virtio-console device without ports. Returns its console id,
    /// which the `add_console_port_*` methods take.
    pub fn add_virtio_console_multiport(&self) -> KrunResult<u32> {
        let console_id = status_to_value("krun_add_virtio_console_multiport", unsafe {
            libkrun_sys::krun_add_virtio_console_multiport(self.ctx_id)
        })?;
        tracing::debug!(ctx_id = self.ctx_id, console_id, "Added multiport console");
        Ok(console_id)
    }

    pub fn add_console_port_tty(&self, port: &ConsolePortTtyConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_console_port_tty";
        tracing::debug!(ctx_id = self.ctx_id, ?port, "Adding console tty port");
        let name_c = c_string(FUNC, &port.name)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_console_port_tty(
                self.ctx_id,
                port.console_id,
                name_c.as_ptr(),
                port.tty_fd,
            )
        })
    }

    pub fn add_console_port_inout(&self, port: &ConsolePortInOutConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_console_port_inout";
        tracing::debug!(ctx_id = self.ctx_id, ?port, "Adding console in/out port");
        let name_c = c_string(FUNC, &port.name)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_console_port_inout(
                self.ctx_id,
                port.console_id,
                name_c.as_ptr(),
                port.input_fd,
                port.output_fd,
            )
        })
    }
}
