//! ### V.25ter basic commands
//! These commands do not implement set syntax using "=", read ("?"), or test ("=?").

use super::Command;

/// Reset to default configuration Z
///
/// Restores the user profile stored in NVM, dropping any setting changed
/// since power on.
pub const RESET_CONFIGURATION: Command<'static> = Command::new("ATZ");

/// Command echo E
///
/// Disables the echo of characters received from the DTE. Every response
/// parser in this crate assumes echo is off.
pub const ECHO_OFF: Command<'static> = Command::new("ATE0");

/// Wavecom indication control +WIND
///
/// Vendor specific general indications (SIM insertion, network ready, ...).
/// Modems that do not know the command answer `ERROR`, so the response is
/// returned raw.
pub const DISABLE_VENDOR_INDICATIONS: Command<'static> =
    Command::new("AT+WIND=0").with_raw_errors();
