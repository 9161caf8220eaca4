//! Responses for Network service Commands
use atat::atat_derive::AtatResp;

use crate::error::{CommandError, Error};

/// `<rssi>` value reported when the signal strength is not known or not
/// detectable
pub const RSSI_UNKNOWN: u8 = 99;

/// 8.5 Signal quality +CSQ
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct SignalQuality {
    /// 0..=31 in 2 dBm steps from -113 dBm, or 99 when unknown
    #[at_arg(position = 0)]
    pub rssi: u8,
    #[at_arg(position = 1)]
    pub ber: u8,
}

impl SignalQuality {
    /// Parse a `+CSQ: <rssi>,<ber>` line. Anything else is a protocol
    /// violation.
    pub fn parse(line: &str) -> Result<Self, Error> {
        atat::serde_at::from_slice(line.as_bytes())
            .map_err(|_| Error::Command(CommandError::generic()))
    }

    /// Signal strength with 99 mapped to -1 ("unknown").
    pub fn strength(&self) -> i16 {
        match self.rssi {
            RSSI_UNKNOWN => -1,
            rssi => i16::from(rssi),
        }
    }
}
