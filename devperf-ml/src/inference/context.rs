//! Execution context threaded through an evaluation pass.

use std::cell::Cell;

use super::device::Device;

/// Device placement and gradient-tracking mode for one caller.
#[derive(Debug)]
pub struct ExecutionContext {
    device: Device,
    grad_enabled: Cell<bool>,
}

impl ExecutionContext {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            grad_enabled: Cell::new(true),
        }
    }

    pub fn cpu() -> Self {
        Self::new(Device::Cpu)
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn grad_enabled(&self) -> bool {
        self.grad_enabled.get()
    }

    /// Disable gradient tracking until the returned guard is dropped.
    pub fn no_grad(&self) -> NoGradGuard<'_> {
        let previous = self.grad_enabled.replace(false);
        NoGradGuard { ctx: self, previous }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::cpu()
    }
}

/// Restores the previous gradient mode on drop.
#[derive(Debug)]
pub struct NoGradGuard<'a> {
    ctx: &'a ExecutionContext,
    previous: bool,
}

impl Drop for NoGradGuard<'_> {
    fn drop(&mut self) {
        self.ctx.grad_enabled.set(self.previous);
    }
}
