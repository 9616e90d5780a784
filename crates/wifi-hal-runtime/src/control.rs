//! Single-writer control loop
//!
//! Collaborators (the supplicant core's event source, the RPC layer, transport
//! death notifications) never touch the manager directly. They send
//! `ControlCommand`s through a cloneable `ControlHandle`; `ControlLoop` drains
//! the channel and applies each command to the manager in arrival order.
//!
//! A listener that needs to re-enter the coordinator while being notified
//! (for example to unregister itself) uses the non-blocking `try_*` methods:
//! the command is queued and runs after the current fan-out.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use wifi_hal_core::{
    DebugParams, EndpointId, HalError, HalResult, ListenerHandle, P2pIfaceCall, P2pIfaceEvent,
    P2pNetworkCall, StaIfaceCall, StaIfaceEvent, StaNetworkCall, StaNetworkEvent, SupplicantCall,
    VendorP2pIfaceCall, VendorP2pIfaceEvent, VendorStaIfaceCall, VendorStaIfaceEvent,
};

use crate::manager::HalManager;

/// Reply channel for commands whose caller awaits the result
pub type Reply<T> = Option<oneshot::Sender<HalResult<T>>>;

// ----------------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------------

/// A listener to add, with the scope it is registered for
#[derive(Debug)]
pub enum CallbackRegistration {
    Supplicant(ListenerHandle<SupplicantCall>),
    StaIface {
        ifname: String,
        handle: ListenerHandle<StaIfaceCall>,
    },
    P2pIface {
        ifname: String,
        handle: ListenerHandle<P2pIfaceCall>,
    },
    StaNetwork {
        ifname: String,
        network_id: u32,
        handle: ListenerHandle<StaNetworkCall>,
    },
    P2pNetwork {
        ifname: String,
        network_id: u32,
        handle: ListenerHandle<P2pNetworkCall>,
    },
    VendorStaIface {
        ifname: String,
        handle: ListenerHandle<VendorStaIfaceCall>,
    },
    VendorP2pIface {
        ifname: String,
        handle: ListenerHandle<VendorP2pIfaceCall>,
    },
}

/// Scope a listener is removed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackTarget {
    Supplicant,
    StaIface(String),
    P2pIface(String),
    StaNetwork(String, u32),
    P2pNetwork(String, u32),
    VendorStaIface(String),
    VendorP2pIface(String),
}

#[derive(Debug)]
pub enum ControlCommand {
    InterfaceAdded {
        ifname: String,
        reply: Reply<()>,
    },
    InterfaceRemoved {
        ifname: String,
        reply: Reply<bool>,
    },
    NetworkAdded {
        ifname: String,
        network_id: u32,
        reply: Reply<()>,
    },
    NetworkRemoved {
        ifname: String,
        network_id: u32,
        reply: Reply<bool>,
    },
    AddCallback {
        registration: CallbackRegistration,
        reply: Reply<()>,
    },
    RemoveCallback {
        target: CallbackTarget,
        endpoint: EndpointId,
        reply: Reply<()>,
    },
    StaIfaceEvent {
        ifname: String,
        event: StaIfaceEvent,
    },
    P2pIfaceEvent {
        ifname: String,
        event: P2pIfaceEvent,
    },
    StaNetworkEvent {
        ifname: String,
        network_id: u32,
        event: StaNetworkEvent,
    },
    VendorStaIfaceEvent {
        ifname: String,
        event: VendorStaIfaceEvent,
    },
    VendorP2pIfaceEvent {
        ifname: String,
        event: VendorP2pIfaceEvent,
    },
    SetDebugParams {
        params: DebugParams,
        reply: Reply<()>,
    },
    WatchClient(EndpointId),
    EndpointDied(EndpointId),
    ClientConnectionLost,
    Shutdown,
}

impl ControlCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::InterfaceAdded { .. } => "interface_added",
            ControlCommand::InterfaceRemoved { .. } => "interface_removed",
            ControlCommand::NetworkAdded { .. } => "network_added",
            ControlCommand::NetworkRemoved { .. } => "network_removed",
            ControlCommand::AddCallback { .. } => "add_callback",
            ControlCommand::RemoveCallback { .. } => "remove_callback",
            ControlCommand::StaIfaceEvent { .. } => "sta_iface_event",
            ControlCommand::P2pIfaceEvent { .. } => "p2p_iface_event",
            ControlCommand::StaNetworkEvent { .. } => "sta_network_event",
            ControlCommand::VendorStaIfaceEvent { .. } => "vendor_sta_iface_event",
            ControlCommand::VendorP2pIfaceEvent { .. } => "vendor_p2p_iface_event",
            ControlCommand::SetDebugParams { .. } => "set_debug_params",
            ControlCommand::WatchClient(_) => "watch_client",
            ControlCommand::EndpointDied(_) => "endpoint_died",
            ControlCommand::ClientConnectionLost => "client_connection_lost",
            ControlCommand::Shutdown => "shutdown",
        }
    }
}

// ----------------------------------------------------------------------------
// Control Handle
// ----------------------------------------------------------------------------

/// Cloneable sender side of the control channel
#[derive(Debug, Clone)]
pub struct ControlHandle {
    sender: mpsc::Sender<ControlCommand>,
}

impl ControlHandle {
    pub fn new(sender: mpsc::Sender<ControlCommand>) -> Self {
        Self { sender }
    }

    pub async fn interface_added(&self, ifname: impl Into<String>) -> HalResult<()> {
        let ifname = ifname.into();
        self.request(|reply| ControlCommand::InterfaceAdded { ifname, reply })
            .await
    }

    pub async fn interface_removed(&self, ifname: impl Into<String>) -> HalResult<bool> {
        let ifname = ifname.into();
        self.request(|reply| ControlCommand::InterfaceRemoved { ifname, reply })
            .await
    }

    pub async fn network_added(&self, ifname: impl Into<String>, network_id: u32) -> HalResult<()> {
        let ifname = ifname.into();
        self.request(|reply| ControlCommand::NetworkAdded {
            ifname,
            network_id,
            reply,
        })
        .await
    }

    pub async fn network_removed(
        &self,
        ifname: impl Into<String>,
        network_id: u32,
    ) -> HalResult<bool> {
        let ifname = ifname.into();
        self.request(|reply| ControlCommand::NetworkRemoved {
            ifname,
            network_id,
            reply,
        })
        .await
    }

    pub async fn add_callback(&self, registration: CallbackRegistration) -> HalResult<()> {
        self.request(|reply| ControlCommand::AddCallback {
            registration,
            reply,
        })
        .await
    }

    pub async fn remove_callback(
        &self,
        target: CallbackTarget,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.request(|reply| ControlCommand::RemoveCallback {
            target,
            endpoint,
            reply,
        })
        .await
    }

    pub async fn set_debug_params(&self, params: DebugParams) -> HalResult<()> {
        self.request(|reply| ControlCommand::SetDebugParams { params, reply })
            .await
    }

    /// Queue a command without waiting for it to be processed
    pub async fn send(&self, command: ControlCommand) -> HalResult<()> {
        self.sender
            .send(command)
            .await
            .map_err(|_| HalError::channel_error("control loop closed"))
    }

    /// Queue a command without blocking; usable from inside a listener
    pub fn try_send(&self, command: ControlCommand) -> HalResult<()> {
        self.sender.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => HalError::channel_error("control channel full"),
            mpsc::error::TrySendError::Closed(_) => HalError::channel_error("control loop closed"),
        })
    }

    /// Queue a listener removal from inside a fan-out
    pub fn try_remove_callback(
        &self,
        target: CallbackTarget,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.try_send(ControlCommand::RemoveCallback {
            target,
            endpoint,
            reply: None,
        })
    }

    pub async fn sta_iface_event(
        &self,
        ifname: impl Into<String>,
        event: StaIfaceEvent,
    ) -> HalResult<()> {
        self.send(ControlCommand::StaIfaceEvent {
            ifname: ifname.into(),
            event,
        })
        .await
    }

    pub async fn p2p_iface_event(
        &self,
        ifname: impl Into<String>,
        event: P2pIfaceEvent,
    ) -> HalResult<()> {
        self.send(ControlCommand::P2pIfaceEvent {
            ifname: ifname.into(),
            event,
        })
        .await
    }

    pub async fn sta_network_event(
        &self,
        ifname: impl Into<String>,
        network_id: u32,
        event: StaNetworkEvent,
    ) -> HalResult<()> {
        self.send(ControlCommand::StaNetworkEvent {
            ifname: ifname.into(),
            network_id,
            event,
        })
        .await
    }

    pub async fn vendor_sta_iface_event(
        &self,
        ifname: impl Into<String>,
        event: VendorStaIfaceEvent,
    ) -> HalResult<()> {
        self.send(ControlCommand::VendorStaIfaceEvent {
            ifname: ifname.into(),
            event,
        })
        .await
    }

    pub async fn vendor_p2p_iface_event(
        &self,
        ifname: impl Into<String>,
        event: VendorP2pIfaceEvent,
    ) -> HalResult<()> {
        self.send(ControlCommand::VendorP2pIfaceEvent {
            ifname: ifname.into(),
            event,
        })
        .await
    }

    pub async fn endpoint_died(&self, endpoint: EndpointId) -> HalResult<()> {
        self.send(ControlCommand::EndpointDied(endpoint)).await
    }

    pub async fn client_connection_lost(&self) -> HalResult<()> {
        self.send(ControlCommand::ClientConnectionLost).await
    }

    pub async fn shutdown(&self) -> HalResult<()> {
        self.send(ControlCommand::Shutdown).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> ControlCommand,
    ) -> HalResult<T> {
        let (reply, response) = oneshot::channel();
        self.send(build(Some(reply))).await?;
        response
            .await
            .map_err(|_| HalError::channel_error("control loop dropped the reply"))?
    }
}

// ----------------------------------------------------------------------------
// Control Loop
// ----------------------------------------------------------------------------

/// Task that owns the manager and applies commands one at a time
pub struct ControlLoop<'g> {
    manager: HalManager<'g>,
    receiver: mpsc::Receiver<ControlCommand>,
    processed: u64,
    running: bool,
}

impl<'g> ControlLoop<'g> {
    pub fn new(manager: HalManager<'g>, receiver: mpsc::Receiver<ControlCommand>) -> Self {
        Self {
            manager,
            receiver,
            processed: 0,
            running: true,
        }
    }

    /// Run until shutdown, termination, or every handle is dropped
    pub async fn run(&mut self) -> HalResult<()> {
        info!("Control loop starting");

        while self.running {
            match self.receiver.recv().await {
                Some(command) => {
                    debug!("Processing {}", command.name());
                    self.process_command(command);
                    self.processed += 1;
                }
                None => {
                    info!("Control channel closed, shutting down");
                    break;
                }
            }
        }

        self.receiver.close();
        info!("Control loop stopped after {} command(s)", self.processed);
        Ok(())
    }

    pub fn process_command(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::InterfaceAdded { ifname, reply } => {
                let result = self.manager.register_interface(&ifname).map(|_| ());
                respond("interface_added", reply, result);
            }
            ControlCommand::InterfaceRemoved { ifname, reply } => {
                let result = self.manager.unregister_interface(&ifname);
                respond("interface_removed", reply, result);
            }
            ControlCommand::NetworkAdded {
                ifname,
                network_id,
                reply,
            } => {
                let result = self
                    .manager
                    .register_network(&ifname, network_id)
                    .map(|_| ());
                respond("network_added", reply, result);
            }
            ControlCommand::NetworkRemoved {
                ifname,
                network_id,
                reply,
            } => {
                let result = self.manager.unregister_network(&ifname, network_id);
                respond("network_removed", reply, result);
            }
            ControlCommand::AddCallback {
                registration,
                reply,
            } => {
                let result = self.add_callback(registration);
                respond("add_callback", reply, result);
            }
            ControlCommand::RemoveCallback {
                target,
                endpoint,
                reply,
            } => {
                let result = self.remove_callback(target, endpoint);
                respond("remove_callback", reply, result);
            }
            ControlCommand::StaIfaceEvent { ifname, event } => {
                self.manager.notify_sta_iface(&ifname, &event);
            }
            ControlCommand::P2pIfaceEvent { ifname, event } => {
                self.manager.notify_p2p_iface(&ifname, &event);
            }
            ControlCommand::StaNetworkEvent {
                ifname,
                network_id,
                event,
            } => {
                self.manager.notify_sta_network(&ifname, network_id, &event);
            }
            ControlCommand::VendorStaIfaceEvent { ifname, event } => {
                self.manager.notify_vendor_sta_iface(&ifname, &event);
            }
            ControlCommand::VendorP2pIfaceEvent { ifname, event } => {
                self.manager.notify_vendor_p2p_iface(&ifname, &event);
            }
            ControlCommand::SetDebugParams { params, reply } => {
                let result = self.manager.set_debug_params(params);
                respond("set_debug_params", reply, result);
            }
            ControlCommand::WatchClient(endpoint) => {
                self.manager.watch_client(endpoint);
            }
            ControlCommand::EndpointDied(endpoint) => {
                self.manager.on_endpoint_died(endpoint);
                if self.manager.has_terminated() {
                    self.running = false;
                }
            }
            ControlCommand::ClientConnectionLost => {
                self.manager.on_client_connection_lost();
                self.running = false;
            }
            ControlCommand::Shutdown => {
                self.manager.shutdown();
                self.running = false;
            }
        }
    }

    pub fn manager(&self) -> &HalManager<'g> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut HalManager<'g> {
        &mut self.manager
    }

    pub fn into_manager(self) -> HalManager<'g> {
        self.manager
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn add_callback(&mut self, registration: CallbackRegistration) -> HalResult<()> {
        match registration {
            CallbackRegistration::Supplicant(handle) => {
                self.manager.add_supplicant_callback(handle)
            }
            CallbackRegistration::StaIface { ifname, handle } => {
                self.manager.add_sta_iface_callback(&ifname, handle)
            }
            CallbackRegistration::P2pIface { ifname, handle } => {
                self.manager.add_p2p_iface_callback(&ifname, handle)
            }
            CallbackRegistration::StaNetwork {
                ifname,
                network_id,
                handle,
            } => self
                .manager
                .add_sta_network_callback(&ifname, network_id, handle),
            CallbackRegistration::P2pNetwork {
                ifname,
                network_id,
                handle,
            } => self
                .manager
                .add_p2p_network_callback(&ifname, network_id, handle),
            CallbackRegistration::VendorStaIface { ifname, handle } => {
                self.manager.add_vendor_sta_iface_callback(&ifname, handle)
            }
            CallbackRegistration::VendorP2pIface { ifname, handle } => {
                self.manager.add_vendor_p2p_iface_callback(&ifname, handle)
            }
        }
    }

    fn remove_callback(&mut self, target: CallbackTarget, endpoint: EndpointId) -> HalResult<()> {
        match target {
            CallbackTarget::Supplicant => self.manager.remove_supplicant_callback(endpoint),
            CallbackTarget::StaIface(ifname) => {
                self.manager.remove_sta_iface_callback(&ifname, endpoint)
            }
            CallbackTarget::P2pIface(ifname) => {
                self.manager.remove_p2p_iface_callback(&ifname, endpoint)
            }
            CallbackTarget::StaNetwork(ifname, network_id) => self
                .manager
                .remove_sta_network_callback(&ifname, network_id, endpoint),
            CallbackTarget::P2pNetwork(ifname, network_id) => self
                .manager
                .remove_p2p_network_callback(&ifname, network_id, endpoint),
            CallbackTarget::VendorStaIface(ifname) => {
                self.manager.remove_vendor_sta_iface_callback(&ifname, endpoint)
            }
            CallbackTarget::VendorP2pIface(ifname) => {
                self.manager.remove_vendor_p2p_iface_callback(&ifname, endpoint)
            }
        }
    }
}

/// Hand a result back to the caller, or log it if nobody is waiting
fn respond<T>(command: &str, reply: Reply<T>, result: HalResult<T>) {
    match reply {
        Some(reply) => {
            if reply.send(result).is_err() {
                debug!("Caller of {} went away before the reply", command);
            }
        }
        None => match result {
            Ok(_) => {}
            Err(e) if e.is_not_found() => warn!("{} ignored: {}", command, e),
            Err(e) => error!("{} failed: {}", command, e),
        },
    }
}
