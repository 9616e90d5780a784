//! P2P network callback contract
//!
//! The contract declares no notifications. Listeners can still be registered
//! and are purged with their network; no event ever reaches them.

use crate::version::{CallbackContract, ContractVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum P2pNetworkCall {}

impl CallbackContract for P2pNetworkCall {
    const NAME: &'static str = "p2p_network";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0];

    fn method(&self) -> &'static str {
        match *self {}
    }
}
