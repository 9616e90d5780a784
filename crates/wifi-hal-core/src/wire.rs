//! Wire-visible enumerations
//!
//! Every enumeration that crosses the client boundary is declared exactly once
//! here, with its numeric codes. Internal representations (log levels, version
//! gates) are derived from these declarations instead of being maintained in
//! parallel.

use tracing::level_filters::LevelFilter;

use crate::errors::HalError;
use crate::version::ContractVersion;

/// Declares a wire enumeration together with its code conversions.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr($repr)]
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Every declared value, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Numeric code on the wire
            pub fn code(self) -> $repr {
                self as $repr
            }

            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $( x if x == $value => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = HalError;

            fn try_from(code: $repr) -> Result<Self, HalError> {
                Self::from_code(code).ok_or_else(|| {
                    HalError::invalid_argument(format!(
                        "invalid {} code: {}",
                        stringify!($name),
                        code
                    ))
                })
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> $repr {
                value.code()
            }
        }
    };
}

// ----------------------------------------------------------------------------
// Supplicant
// ----------------------------------------------------------------------------

wire_enum! {
    /// Supplicant debug verbosity
    #[serde(rename_all = "lowercase")]
    pub enum DebugLevel: u32 {
        Excessive = 0,
        MsgDump = 1,
        Debug = 2,
        Info = 3,
        Warning = 4,
        Error = 5,
    }
}

impl From<DebugLevel> for LevelFilter {
    fn from(level: DebugLevel) -> Self {
        match level {
            DebugLevel::Excessive | DebugLevel::MsgDump => LevelFilter::TRACE,
            DebugLevel::Debug => LevelFilter::DEBUG,
            DebugLevel::Info => LevelFilter::INFO,
            DebugLevel::Warning => LevelFilter::WARN,
            DebugLevel::Error => LevelFilter::ERROR,
        }
    }
}

wire_enum! {
    /// Station interface connection state
    pub enum SupplicantState: u32 {
        Disconnected = 0,
        IfaceDisabled = 1,
        Inactive = 2,
        Scanning = 3,
        Authenticating = 4,
        Associating = 5,
        Associated = 6,
        FourwayHandshake = 7,
        GroupHandshake = 8,
        Completed = 9,
    }
}

impl SupplicantState {
    pub fn is_connected(&self) -> bool {
        matches!(self, SupplicantState::Completed)
    }
}

wire_enum! {
    pub enum BssidChangeReason: u8 {
        AssocStart = 0,
        AssocComplete = 1,
        Disassoc = 2,
    }
}

wire_enum! {
    pub enum WpsConfigError: u16 {
        NoError = 0,
        OobIfaceReadError = 1,
        DecryptionCrcFailure = 2,
        Chan24NotSupported = 3,
        Chan50NotSupported = 4,
        SignalTooWeak = 5,
        NetworkAuthFailure = 6,
        NetworkAssocFailure = 7,
        NoDhcpResponse = 8,
        FailedDhcpConfig = 9,
        IpAddrConflict = 10,
        NoConnToRegistrar = 11,
        MultiplePbcDetected = 12,
        RogueSuspected = 13,
        DeviceBusy = 14,
        SetupLocked = 15,
        MsgTimeout = 16,
        RegSessTimeout = 17,
        DevPasswordAuthFailure = 18,
        Chan60gNotSupported = 19,
        PublicKeyHashMismatch = 20,
    }
}

wire_enum! {
    pub enum WpsErrorIndication: u16 {
        NoError = 0,
        SecurityTkipOnlyProhibited = 1,
        SecurityWepProhibited = 2,
        AuthFailure = 3,
    }
}

wire_enum! {
    /// EAP failure codes understood by 1.1 station callbacks
    pub enum EapErrorCode: u32 {
        SimGeneralFailureAfterAuth = 0,
        SimTemporarilyDenied = 1026,
        SimNotSubscribed = 1031,
        SimGeneralFailureBeforeAuth = 16384,
        SimVendorSpecificExpiredCert = 16385,
    }
}

wire_enum! {
    /// Hotspot 2.0 online sign-up method
    pub enum OsuMethod: u8 {
        OmaDm = 0,
        SoapXmlSpp = 1,
    }
}

// ----------------------------------------------------------------------------
// DPP
// ----------------------------------------------------------------------------

wire_enum! {
    pub enum DppAkm: u32 {
        Psk = 0,
        PskSae = 1,
        Sae = 2,
        Dpp = 3,
    }
}

wire_enum! {
    pub enum DppProgressCode: u32 {
        AuthenticationSuccess = 0,
        ResponsePending = 1,
        ConfigurationSentWaitingResponse = 2,
        ConfigurationAccepted = 3,
    }
}

impl DppProgressCode {
    /// First callback version able to carry this code
    pub fn introduced_in(&self) -> ContractVersion {
        match self {
            DppProgressCode::AuthenticationSuccess | DppProgressCode::ResponsePending => {
                ContractVersion::V1_2
            }
            _ => ContractVersion::V1_3,
        }
    }
}

wire_enum! {
    pub enum DppSuccessCode: u32 {
        ConfigurationSent = 0,
        ConfigurationApplied = 1,
    }
}

wire_enum! {
    pub enum DppFailureCode: u32 {
        InvalidUri = 0,
        Authentication = 1,
        NotCompatible = 2,
        Configuration = 3,
        Busy = 4,
        Timeout = 5,
        Failure = 6,
        NotSupported = 7,
        ConfigurationRejected = 8,
        CannotFindNetwork = 9,
        EnrolleeAuthentication = 10,
    }
}

impl DppFailureCode {
    /// First callback version able to carry this code
    pub fn introduced_in(&self) -> ContractVersion {
        if self.code() <= DppFailureCode::NotSupported.code() {
            ContractVersion::V1_2
        } else {
            ContractVersion::V1_3
        }
    }
}

// ----------------------------------------------------------------------------
// P2P
// ----------------------------------------------------------------------------

wire_enum! {
    pub enum P2pStatusCode: u32 {
        Success = 0,
        FailInfoCurrentlyUnavailable = 1,
        FailIncompatibleParams = 2,
        FailLimitReached = 3,
        FailInvalidParams = 4,
        FailUnableToAccommodate = 5,
        FailPrevProtocolError = 6,
        FailNoCommonChannels = 7,
        FailUnknownGroup = 8,
        FailBothGoIntent15 = 9,
        FailIncompatibleProvMethod = 10,
        FailRejectedByUser = 11,
        SuccessDeferred = 12,
    }
}

wire_enum! {
    pub enum P2pProvDiscStatusCode: u8 {
        Success = 0,
        Timeout = 1,
        Rejected = 2,
        TimeoutJoin = 3,
        InfoUnavailable = 4,
    }
}

wire_enum! {
    pub enum WpsDevPasswordId: u16 {
        Default = 0,
        UserSpecified = 1,
        MachineSpecified = 2,
        Rekey = 3,
        PushButton = 4,
        RegistrarSpecified = 5,
        NfcConnectionHandover = 7,
        P2psDefault = 8,
    }
}

// ----------------------------------------------------------------------------
// Hostapd
// ----------------------------------------------------------------------------

wire_enum! {
    pub enum Ieee80211ReasonCode: u16 {
        Unspecified = 1,
        PrevAuthNotValid = 2,
        DisassocApBusy = 5,
    }
}

wire_enum! {
    /// Band bits used in access point channel parameters
    pub enum ApBand: u32 {
        Band2Ghz = 1,
        Band5Ghz = 2,
        Band6Ghz = 4,
        Band60Ghz = 8,
    }
}

impl ApBand {
    /// Decode a band mask into its bands
    pub fn from_mask(mask: u32) -> Vec<ApBand> {
        ApBand::ALL
            .iter()
            .copied()
            .filter(|band| mask & band.code() != 0)
            .collect()
    }
}

wire_enum! {
    pub enum Bandwidth: u32 {
        Invalid = 0,
        Bandwidth20NoHt = 1,
        Bandwidth20 = 2,
        Bandwidth40 = 3,
        Bandwidth80 = 4,
        Bandwidth80P80 = 5,
        Bandwidth160 = 6,
    }
}

wire_enum! {
    pub enum WifiGeneration: u32 {
        Legacy = 0,
        Ieee80211n = 1,
        Ieee80211ac = 2,
        Ieee80211ax = 3,
        Unknown = 0xFFFF_FFFF,
    }
}

wire_enum! {
    pub enum EncryptionType: u32 {
        None = 0,
        Wpa = 1,
        Wpa2 = 2,
        Wpa3SaeTransition = 3,
        Wpa3Sae = 4,
        Wpa3OweTransition = 5,
        Wpa3Owe = 6,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
