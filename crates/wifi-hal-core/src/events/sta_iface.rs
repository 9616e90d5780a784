//! Station interface events
//!
//! The station callback contract has the most generations (1.0 through 1.4).
//! Several events gained richer call shapes over time; listeners registered
//! under an older generation keep receiving the shape they were written for.

use serde::{Deserialize, Serialize};

use crate::types::MacAddr;
use crate::version::{CallbackContract, ContractVersion, VersionedEvent};
use crate::wire::{
    BssidChangeReason, DppAkm, DppFailureCode, DppProgressCode, DppSuccessCode, EapErrorCode,
    OsuMethod, SupplicantState, WpsConfigError, WpsErrorIndication,
};

// ----------------------------------------------------------------------------
// Payloads
// ----------------------------------------------------------------------------

/// Connection state transition reported by the station state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub new_state: SupplicantState,
    pub bssid: MacAddr,
    pub network_id: u32,
    pub ssid: Vec<u8>,
    /// FILS HLP frames were sent during association
    pub fils_hlp_sent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssocRejectData {
    pub ssid: Vec<u8>,
    pub bssid: MacAddr,
    pub status_code: u16,
    pub timed_out: bool,
    pub mbo_assoc_disallowed_reason: Option<u8>,
    pub oce_retry_delay_ms: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnqpData {
    pub venue_name: Vec<u8>,
    pub roaming_consortium: Vec<u8>,
    pub ip_addr_type_availability: Vec<u8>,
    pub nai_realm: Vec<u8>,
    pub anqp_3gpp: Vec<u8>,
    pub domain_name: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hs20AnqpData {
    pub operator_friendly_name: Vec<u8>,
    pub wan_metrics: Vec<u8>,
    pub connection_capability: Vec<u8>,
    pub osu_providers_list: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DppConfiguration {
    pub ssid: Vec<u8>,
    pub password: String,
    pub psk: Vec<u8>,
    pub security_akm: DppAkm,
}

/// BSS transition management outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BssTmData {
    pub status: u8,
    pub flags: u32,
    pub assoc_retry_delay_ms: u32,
    pub mbo_transition_reason: u8,
    pub mbo_cell_preference: u8,
}

// ----------------------------------------------------------------------------
// Events
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaIfaceEvent {
    NetworkAdded {
        network_id: u32,
    },
    NetworkRemoved {
        network_id: u32,
    },
    StateChanged(StateChange),
    Disconnected {
        bssid: MacAddr,
        locally_generated: bool,
        reason_code: u16,
    },
    AssociationRejected(AssocRejectData),
    AuthenticationTimeout {
        bssid: MacAddr,
    },
    BssidChanged {
        reason: BssidChangeReason,
        bssid: MacAddr,
    },
    WpsEventFail {
        bssid: MacAddr,
        config_error: WpsConfigError,
        error_indication: WpsErrorIndication,
    },
    WpsEventSuccess,
    WpsEventPbcOverlap,
    AnqpQueryDone {
        bssid: MacAddr,
        data: AnqpData,
        venue_url: Vec<u8>,
        hs20_data: Hs20AnqpData,
    },
    Hs20IconQueryDone {
        bssid: MacAddr,
        file_name: String,
        image: Vec<u8>,
    },
    Hs20SubscriptionRemediation {
        bssid: MacAddr,
        osu_method: OsuMethod,
        url: String,
    },
    Hs20DeauthImminentNotice {
        bssid: MacAddr,
        reason_code: u32,
        reauth_delay_secs: u32,
        url: String,
    },
    Hs20TermsAndConditionsAcceptanceRequested {
        bssid: MacAddr,
        url: String,
    },
    /// Raw EAP error code from the EAP peer
    EapFailure {
        error_code: u32,
    },
    ExtRadioWorkStart {
        id: u32,
    },
    ExtRadioWorkTimeout {
        id: u32,
    },
    DppConfigReceived(DppConfiguration),
    DppConfigSent,
    DppProgress {
        code: DppProgressCode,
    },
    DppSuccess {
        code: DppSuccessCode,
    },
    DppFailure {
        code: DppFailureCode,
        ssid: String,
        channel_list: String,
        band_list: Vec<u16>,
    },
    PmkCacheAdded {
        expiration_time_secs: i64,
        serialized_entry: Vec<u8>,
    },
    BssTmHandlingDone(BssTmData),
    NetworkNotFound {
        ssid: Vec<u8>,
    },
}

// ----------------------------------------------------------------------------
// Call Shapes
// ----------------------------------------------------------------------------

/// Every call shape declared by the station callback contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaIfaceCall {
    NetworkAdded {
        network_id: u32,
    },
    NetworkRemoved {
        network_id: u32,
    },
    StateChanged {
        new_state: SupplicantState,
        bssid: MacAddr,
        network_id: u32,
        ssid: Vec<u8>,
    },
    /// 1.3
    StateChangedWithFils(StateChange),
    Disconnected {
        bssid: MacAddr,
        locally_generated: bool,
        reason_code: u16,
    },
    AssociationRejected {
        bssid: MacAddr,
        status_code: u16,
        timed_out: bool,
    },
    /// 1.4
    AssociationRejectedWithData(AssocRejectData),
    AuthenticationTimeout {
        bssid: MacAddr,
    },
    BssidChanged {
        reason: BssidChangeReason,
        bssid: MacAddr,
    },
    WpsEventFail {
        bssid: MacAddr,
        config_error: WpsConfigError,
        error_indication: WpsErrorIndication,
    },
    WpsEventSuccess,
    WpsEventPbcOverlap,
    AnqpQueryDone {
        bssid: MacAddr,
        data: AnqpData,
        hs20_data: Hs20AnqpData,
    },
    /// 1.4
    AnqpQueryDoneWithVenueUrl {
        bssid: MacAddr,
        data: AnqpData,
        venue_url: Vec<u8>,
        hs20_data: Hs20AnqpData,
    },
    Hs20IconQueryDone {
        bssid: MacAddr,
        file_name: String,
        image: Vec<u8>,
    },
    Hs20SubscriptionRemediation {
        bssid: MacAddr,
        osu_method: OsuMethod,
        url: String,
    },
    Hs20DeauthImminentNotice {
        bssid: MacAddr,
        reason_code: u32,
        reauth_delay_secs: u32,
        url: String,
    },
    /// 1.4
    Hs20TermsAndConditionsAcceptanceRequested {
        bssid: MacAddr,
        url: String,
    },
    EapFailure,
    /// 1.1
    EapFailureWithErrorCode {
        code: EapErrorCode,
    },
    /// 1.3
    EapFailureWithRawCode {
        error_code: u32,
    },
    ExtRadioWorkStart {
        id: u32,
    },
    ExtRadioWorkTimeout {
        id: u32,
    },
    /// 1.2
    DppConfigReceived(DppConfiguration),
    /// 1.2
    DppConfigSent,
    /// 1.2, extended code set in 1.3
    DppProgress {
        code: DppProgressCode,
    },
    /// 1.3
    DppSuccess {
        code: DppSuccessCode,
    },
    /// 1.2
    DppFailure {
        code: DppFailureCode,
    },
    /// 1.3
    DppFailureWithDetails {
        code: DppFailureCode,
        ssid: String,
        channel_list: String,
        band_list: Vec<u16>,
    },
    /// 1.3
    PmkCacheAdded {
        expiration_time_secs: i64,
        serialized_entry: Vec<u8>,
    },
    /// 1.3
    BssTmHandlingDone(BssTmData),
    /// 1.4
    NetworkNotFound {
        ssid: Vec<u8>,
    },
}

impl CallbackContract for StaIfaceCall {
    const NAME: &'static str = "sta_iface";
    const VERSIONS: &'static [ContractVersion] = &ContractVersion::ALL;

    fn method(&self) -> &'static str {
        match self {
            StaIfaceCall::NetworkAdded { .. } => "on_network_added",
            StaIfaceCall::NetworkRemoved { .. } => "on_network_removed",
            StaIfaceCall::StateChanged { .. } => "on_state_changed",
            StaIfaceCall::StateChangedWithFils(_) => "on_state_changed_1_3",
            StaIfaceCall::Disconnected { .. } => "on_disconnected",
            StaIfaceCall::AssociationRejected { .. } => "on_association_rejected",
            StaIfaceCall::AssociationRejectedWithData(_) => "on_association_rejected_1_4",
            StaIfaceCall::AuthenticationTimeout { .. } => "on_authentication_timeout",
            StaIfaceCall::BssidChanged { .. } => "on_bssid_changed",
            StaIfaceCall::WpsEventFail { .. } => "on_wps_event_fail",
            StaIfaceCall::WpsEventSuccess => "on_wps_event_success",
            StaIfaceCall::WpsEventPbcOverlap => "on_wps_event_pbc_overlap",
            StaIfaceCall::AnqpQueryDone { .. } => "on_anqp_query_done",
            StaIfaceCall::AnqpQueryDoneWithVenueUrl { .. } => "on_anqp_query_done_1_4",
            StaIfaceCall::Hs20IconQueryDone { .. } => "on_hs20_icon_query_done",
            StaIfaceCall::Hs20SubscriptionRemediation { .. } => {
                "on_hs20_subscription_remediation"
            }
            StaIfaceCall::Hs20DeauthImminentNotice { .. } => "on_hs20_deauth_imminent_notice",
            StaIfaceCall::Hs20TermsAndConditionsAcceptanceRequested { .. } => {
                "on_hs20_terms_and_conditions_acceptance_requested"
            }
            StaIfaceCall::EapFailure => "on_eap_failure",
            StaIfaceCall::EapFailureWithErrorCode { .. } => "on_eap_failure_1_1",
            StaIfaceCall::EapFailureWithRawCode { .. } => "on_eap_failure_1_3",
            StaIfaceCall::ExtRadioWorkStart { .. } => "on_ext_radio_work_start",
            StaIfaceCall::ExtRadioWorkTimeout { .. } => "on_ext_radio_work_timeout",
            StaIfaceCall::DppConfigReceived(_) => "on_dpp_success_config_received",
            StaIfaceCall::DppConfigSent => "on_dpp_success_config_sent",
            StaIfaceCall::DppProgress { .. } => "on_dpp_progress",
            StaIfaceCall::DppSuccess { .. } => "on_dpp_success",
            StaIfaceCall::DppFailure { .. } => "on_dpp_failure",
            StaIfaceCall::DppFailureWithDetails { .. } => "on_dpp_failure_1_3",
            StaIfaceCall::PmkCacheAdded { .. } => "on_pmk_cache_added",
            StaIfaceCall::BssTmHandlingDone(_) => "on_bss_tm_handling_done",
            StaIfaceCall::NetworkNotFound { .. } => "on_network_not_found",
        }
    }
}

// ----------------------------------------------------------------------------
// Version Mapping
// ----------------------------------------------------------------------------

impl VersionedEvent for StaIfaceEvent {
    type Call = StaIfaceCall;

    fn name(&self) -> &'static str {
        match self {
            StaIfaceEvent::NetworkAdded { .. } => "network_added",
            StaIfaceEvent::NetworkRemoved { .. } => "network_removed",
            StaIfaceEvent::StateChanged(_) => "state_changed",
            StaIfaceEvent::Disconnected { .. } => "disconnected",
            StaIfaceEvent::AssociationRejected(_) => "association_rejected",
            StaIfaceEvent::AuthenticationTimeout { .. } => "authentication_timeout",
            StaIfaceEvent::BssidChanged { .. } => "bssid_changed",
            StaIfaceEvent::WpsEventFail { .. } => "wps_event_fail",
            StaIfaceEvent::WpsEventSuccess => "wps_event_success",
            StaIfaceEvent::WpsEventPbcOverlap => "wps_event_pbc_overlap",
            StaIfaceEvent::AnqpQueryDone { .. } => "anqp_query_done",
            StaIfaceEvent::Hs20IconQueryDone { .. } => "hs20_icon_query_done",
            StaIfaceEvent::Hs20SubscriptionRemediation { .. } => "hs20_subscription_remediation",
            StaIfaceEvent::Hs20DeauthImminentNotice { .. } => "hs20_deauth_imminent_notice",
            StaIfaceEvent::Hs20TermsAndConditionsAcceptanceRequested { .. } => {
                "hs20_terms_and_conditions_acceptance_requested"
            }
            StaIfaceEvent::EapFailure { .. } => "eap_failure",
            StaIfaceEvent::ExtRadioWorkStart { .. } => "ext_radio_work_start",
            StaIfaceEvent::ExtRadioWorkTimeout { .. } => "ext_radio_work_timeout",
            StaIfaceEvent::DppConfigReceived(_) => "dpp_config_received",
            StaIfaceEvent::DppConfigSent => "dpp_config_sent",
            StaIfaceEvent::DppProgress { .. } => "dpp_progress",
            StaIfaceEvent::DppSuccess { .. } => "dpp_success",
            StaIfaceEvent::DppFailure { .. } => "dpp_failure",
            StaIfaceEvent::PmkCacheAdded { .. } => "pmk_cache_added",
            StaIfaceEvent::BssTmHandlingDone(_) => "bss_tm_handling_done",
            StaIfaceEvent::NetworkNotFound { .. } => "network_not_found",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<StaIfaceCall> {
        use ContractVersion::*;

        match (self, version) {
            (StaIfaceEvent::NetworkAdded { network_id }, V1_0) => {
                Some(StaIfaceCall::NetworkAdded {
                    network_id: *network_id,
                })
            }
            (StaIfaceEvent::NetworkRemoved { network_id }, V1_0) => {
                Some(StaIfaceCall::NetworkRemoved {
                    network_id: *network_id,
                })
            }

            (StaIfaceEvent::StateChanged(change), V1_3) => {
                Some(StaIfaceCall::StateChangedWithFils(change.clone()))
            }
            (StaIfaceEvent::StateChanged(change), V1_0) => Some(StaIfaceCall::StateChanged {
                new_state: change.new_state,
                bssid: change.bssid,
                network_id: change.network_id,
                ssid: change.ssid.clone(),
            }),

            (
                StaIfaceEvent::Disconnected {
                    bssid,
                    locally_generated,
                    reason_code,
                },
                V1_0,
            ) => Some(StaIfaceCall::Disconnected {
                bssid: *bssid,
                locally_generated: *locally_generated,
                reason_code: *reason_code,
            }),

            (StaIfaceEvent::AssociationRejected(data), V1_4) => {
                Some(StaIfaceCall::AssociationRejectedWithData(data.clone()))
            }
            (StaIfaceEvent::AssociationRejected(data), V1_0) => {
                Some(StaIfaceCall::AssociationRejected {
                    bssid: data.bssid,
                    status_code: data.status_code,
                    timed_out: data.timed_out,
                })
            }

            (StaIfaceEvent::AuthenticationTimeout { bssid }, V1_0) => {
                Some(StaIfaceCall::AuthenticationTimeout { bssid: *bssid })
            }
            (StaIfaceEvent::BssidChanged { reason, bssid }, V1_0) => {
                Some(StaIfaceCall::BssidChanged {
                    reason: *reason,
                    bssid: *bssid,
                })
            }
            (
                StaIfaceEvent::WpsEventFail {
                    bssid,
                    config_error,
                    error_indication,
                },
                V1_0,
            ) => Some(StaIfaceCall::WpsEventFail {
                bssid: *bssid,
                config_error: *config_error,
                error_indication: *error_indication,
            }),
            (StaIfaceEvent::WpsEventSuccess, V1_0) => Some(StaIfaceCall::WpsEventSuccess),
            (StaIfaceEvent::WpsEventPbcOverlap, V1_0) => Some(StaIfaceCall::WpsEventPbcOverlap),

            (
                StaIfaceEvent::AnqpQueryDone {
                    bssid,
                    data,
                    venue_url,
                    hs20_data,
                },
                V1_4,
            ) => Some(StaIfaceCall::AnqpQueryDoneWithVenueUrl {
                bssid: *bssid,
                data: data.clone(),
                venue_url: venue_url.clone(),
                hs20_data: hs20_data.clone(),
            }),
            (
                StaIfaceEvent::AnqpQueryDone {
                    bssid,
                    data,
                    hs20_data,
                    ..
                },
                V1_0,
            ) => Some(StaIfaceCall::AnqpQueryDone {
                bssid: *bssid,
                data: data.clone(),
                hs20_data: hs20_data.clone(),
            }),

            (
                StaIfaceEvent::Hs20IconQueryDone {
                    bssid,
                    file_name,
                    image,
                },
                V1_0,
            ) => Some(StaIfaceCall::Hs20IconQueryDone {
                bssid: *bssid,
                file_name: file_name.clone(),
                image: image.clone(),
            }),
            (
                StaIfaceEvent::Hs20SubscriptionRemediation {
                    bssid,
                    osu_method,
                    url,
                },
                V1_0,
            ) => Some(StaIfaceCall::Hs20SubscriptionRemediation {
                bssid: *bssid,
                osu_method: *osu_method,
                url: url.clone(),
            }),
            (
                StaIfaceEvent::Hs20DeauthImminentNotice {
                    bssid,
                    reason_code,
                    reauth_delay_secs,
                    url,
                },
                V1_0,
            ) => Some(StaIfaceCall::Hs20DeauthImminentNotice {
                bssid: *bssid,
                reason_code: *reason_code,
                reauth_delay_secs: *reauth_delay_secs,
                url: url.clone(),
            }),
            (StaIfaceEvent::Hs20TermsAndConditionsAcceptanceRequested { bssid, url }, V1_4) => {
                Some(StaIfaceCall::Hs20TermsAndConditionsAcceptanceRequested {
                    bssid: *bssid,
                    url: url.clone(),
                })
            }

            // 1.1 listeners only see codes the enumerated form can carry
            (StaIfaceEvent::EapFailure { error_code }, V1_3) => {
                Some(StaIfaceCall::EapFailureWithRawCode {
                    error_code: *error_code,
                })
            }
            (StaIfaceEvent::EapFailure { error_code }, V1_1) => EapErrorCode::from_code(*error_code)
                .map(|code| StaIfaceCall::EapFailureWithErrorCode { code }),
            (StaIfaceEvent::EapFailure { .. }, V1_0) => Some(StaIfaceCall::EapFailure),

            (StaIfaceEvent::ExtRadioWorkStart { id }, V1_0) => {
                Some(StaIfaceCall::ExtRadioWorkStart { id: *id })
            }
            (StaIfaceEvent::ExtRadioWorkTimeout { id }, V1_0) => {
                Some(StaIfaceCall::ExtRadioWorkTimeout { id: *id })
            }

            (StaIfaceEvent::DppConfigReceived(config), V1_2) => {
                Some(StaIfaceCall::DppConfigReceived(config.clone()))
            }
            (StaIfaceEvent::DppConfigSent, V1_2) => Some(StaIfaceCall::DppConfigSent),
            (StaIfaceEvent::DppProgress { code }, v) if v == code.introduced_in() => {
                Some(StaIfaceCall::DppProgress { code: *code })
            }
            (StaIfaceEvent::DppSuccess { code }, V1_3) => {
                Some(StaIfaceCall::DppSuccess { code: *code })
            }
            (
                StaIfaceEvent::DppFailure {
                    code,
                    ssid,
                    channel_list,
                    band_list,
                },
                V1_3,
            ) => Some(StaIfaceCall::DppFailureWithDetails {
                code: *code,
                ssid: ssid.clone(),
                channel_list: channel_list.clone(),
                band_list: band_list.clone(),
            }),
            (StaIfaceEvent::DppFailure { code, .. }, V1_2)
                if code.introduced_in() == ContractVersion::V1_2 =>
            {
                Some(StaIfaceCall::DppFailure { code: *code })
            }

            (
                StaIfaceEvent::PmkCacheAdded {
                    expiration_time_secs,
                    serialized_entry,
                },
                V1_3,
            ) => Some(StaIfaceCall::PmkCacheAdded {
                expiration_time_secs: *expiration_time_secs,
                serialized_entry: serialized_entry.clone(),
            }),
            (StaIfaceEvent::BssTmHandlingDone(data), V1_3) => {
                Some(StaIfaceCall::BssTmHandlingDone(data.clone()))
            }
            (StaIfaceEvent::NetworkNotFound { ssid }, V1_4) => {
                Some(StaIfaceCall::NetworkNotFound { ssid: ssid.clone() })
            }

            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
