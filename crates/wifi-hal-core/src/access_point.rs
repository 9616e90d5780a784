//! Access point parameters
//!
//! A request naming more than one channel describes a bridged (concurrent)
//! access point: `ifname` is then the bridge, and one instance is brought up per
//! bridge member.

use serde::{Deserialize, Serialize};

use crate::errors::{HalError, HalResult};
use crate::wire::{ApBand, EncryptionType};

const MAX_SSID_LEN: usize = 32;
const MIN_PASSPHRASE_LEN: usize = 8;
const MAX_PASSPHRASE_LEN: usize = 63;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HwModeParams {
    pub enable_80211n: bool,
    pub enable_80211ac: bool,
    pub enable_80211ax: bool,
    pub enable_he_single_user_beamformer: bool,
    pub enable_he_target_wake_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// `ApBand` bits
    pub band_mask: u32,
    /// Fixed channel, ignored when ACS is enabled
    pub channel: u32,
    pub enable_acs: bool,
    pub acs_exclude_dfs: bool,
}

impl ChannelParams {
    pub fn bands(&self) -> Vec<ApBand> {
        ApBand::from_mask(self.band_mask)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub ssid: Vec<u8>,
    pub is_hidden: bool,
    pub encryption: EncryptionType,
    pub passphrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointParams {
    pub ifname: String,
    pub hw_mode: HwModeParams,
    pub channels: Vec<ChannelParams>,
    pub network: NetworkParams,
}

impl AccessPointParams {
    /// Whether this request describes a bridged access point
    pub fn is_bridged(&self) -> bool {
        self.channels.len() > 1
    }

    /// Parameters for a single instance on `member`, using channel `index`
    pub fn instance(&self, member: &str, index: usize) -> Option<AccessPointParams> {
        let channel = self.channels.get(index)?.clone();
        Some(AccessPointParams {
            ifname: member.to_string(),
            hw_mode: self.hw_mode.clone(),
            channels: vec![channel],
            network: self.network.clone(),
        })
    }

    pub fn validate(&self) -> HalResult<()> {
        if self.ifname.is_empty() {
            return Err(HalError::invalid_argument("access point ifname is empty"));
        }
        if self.channels.is_empty() {
            return Err(HalError::invalid_argument("no channel parameters"));
        }
        if let Some(channel) = self.channels.iter().find(|c| c.bands().is_empty()) {
            return Err(HalError::invalid_argument(format!(
                "invalid band mask: {:#x}",
                channel.band_mask
            )));
        }

        let ssid_len = self.network.ssid.len();
        if ssid_len == 0 || ssid_len > MAX_SSID_LEN {
            return Err(HalError::invalid_argument(format!(
                "invalid SSID length: {}",
                ssid_len
            )));
        }

        let passphrase_len = self.network.passphrase.len();
        match self.network.encryption {
            EncryptionType::None | EncryptionType::Wpa3OweTransition | EncryptionType::Wpa3Owe => {}
            EncryptionType::Wpa3Sae => {
                if passphrase_len == 0 {
                    return Err(HalError::invalid_argument("SAE requires a password"));
                }
            }
            _ => {
                if !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&passphrase_len) {
                    return Err(HalError::invalid_argument(format!(
                        "invalid passphrase length: {}",
                        passphrase_len
                    )));
                }
            }
        }
        Ok(())
    }
}
