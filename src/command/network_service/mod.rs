//! ### 8.5 - Network service

pub mod responses;

use super::Command;

/// 8.5 Signal quality +CSQ
///
/// Returns the received signal strength indication `<rssi>` and the channel
/// bit error rate `<ber>`.
pub const GET_SIGNAL_QUALITY: Command<'static> = Command::new("AT+CSQ");
