//! wifi-hal Runtime Engine
//!
//! This crate contains the registry engine behind the wifi-hal service:
//! - `HalManager`: the lifecycle coordinator owning every registry
//! - `ObjectRegistry` and `CallbackStore`: identity-keyed object and listener stores
//! - `Dispatcher`: version-aware sequential fan-out
//! - `DeathWatch`: fail-fast termination when a controlling client goes away
//! - `ControlLoop`: the single-writer task draining collaborator commands
//! - `HostapdManager`: the access point coordinator
//!
//! `wifi-hal-core` provides the contracts; this crate owns the state.

pub mod builder;
pub mod control;
pub mod death_watch;
pub mod dispatch;
pub mod hostapd;
pub mod logging;
pub mod manager;
pub mod managers;

pub use builder::{HalRuntime, HalRuntimeBuilder};
pub use control::{CallbackRegistration, CallbackTarget, ControlCommand, ControlHandle, ControlLoop};
pub use death_watch::DeathWatch;
pub use dispatch::{DispatchReport, Dispatcher};
pub use hostapd::HostapdManager;
pub use manager::{HalManager, ManagerStats};
pub use managers::*;

// Re-export core types for convenience
pub use wifi_hal_core::{
    DeliveryError, EndpointId, EntityKind, HalConfig, HalError, HalResult, ListenerHandle,
    ObjectKey, RemoteCallback,
};
