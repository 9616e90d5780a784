//! Runtime Builder API
//!
//! Provides a builder-style API for the process entry point (and tests) to wire
//! the collaborators into a `HalManager`, create the control channel and get a
//! `ControlHandle` for the event sources.

use tokio::sync::mpsc;
use tracing::info;
use wifi_hal_core::{HalConfig, HalResult, SupplicantGlobal, Terminator};

use crate::control::{ControlHandle, ControlLoop};
use crate::logging;
use crate::manager::HalManager;

// ----------------------------------------------------------------------------
// Runtime Builder
// ----------------------------------------------------------------------------

pub struct HalRuntimeBuilder<'g> {
    global: &'g dyn SupplicantGlobal,
    terminator: &'g dyn Terminator,
    config: HalConfig,
    enable_logging: bool,
}

impl<'g> HalRuntimeBuilder<'g> {
    pub fn new(global: &'g dyn SupplicantGlobal, terminator: &'g dyn Terminator) -> Self {
        Self {
            global,
            terminator,
            config: HalConfig::default(),
            enable_logging: false,
        }
    }

    pub fn with_config(mut self, config: HalConfig) -> Self {
        self.config = config;
        self
    }

    /// Install the console subscriber described by the logging config
    pub fn with_console_logging(mut self) -> Self {
        self.enable_logging = true;
        self
    }

    pub fn with_no_logging(mut self) -> Self {
        self.enable_logging = false;
        self
    }

    pub fn command_buffer_size(mut self, size: usize) -> Self {
        self.config.channels.command_buffer_size = size;
        self
    }

    pub fn build(self) -> HalResult<HalRuntime<'g>> {
        self.config.validate()?;

        if self.enable_logging {
            logging::init(&self.config.logging);
        }

        let (sender, receiver) = mpsc::channel(self.config.channels.command_buffer_size);
        let manager = HalManager::new(self.global, self.terminator, &self.config);
        info!(
            "Built wifi-hal runtime (command buffer {}, max {} listeners per scope)",
            self.config.channels.command_buffer_size, self.config.dispatch.max_listeners_per_scope
        );

        Ok(HalRuntime {
            control: ControlLoop::new(manager, receiver),
            handle: ControlHandle::new(sender),
        })
    }
}

// ----------------------------------------------------------------------------
// Runtime
// ----------------------------------------------------------------------------

/// A built runtime: the control loop plus a handle to feed it
pub struct HalRuntime<'g> {
    control: ControlLoop<'g>,
    handle: ControlHandle,
}

impl<'g> HalRuntime<'g> {
    pub fn handle(&self) -> ControlHandle {
        self.handle.clone()
    }

    pub fn manager(&self) -> &HalManager<'g> {
        self.control.manager()
    }

    pub fn manager_mut(&mut self) -> &mut HalManager<'g> {
        self.control.manager_mut()
    }

    /// Drive the control loop to completion and hand back the manager.
    ///
    /// The runtime's own handle is dropped first, so the loop also ends once
    /// every handle obtained from `handle()` is gone.
    pub async fn run(self) -> HalResult<HalManager<'g>> {
        let HalRuntime { mut control, handle } = self;
        drop(handle);
        control.run().await?;
        Ok(control.into_manager())
    }
}
