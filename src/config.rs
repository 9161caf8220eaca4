/// Bring-up options for a modem.
///
/// Both incoming call capabilities are optional: when the modem rejects
/// them, bring-up continues with the capability disabled.
pub trait ModemConfig {
    /// Try to enable calling line identification presentation (`AT+CLIP=1`)
    const CALLER_ID: bool = true;

    /// Try to enable the extended incoming call indication (`AT+CRC=1`).
    /// Only attempted if caller ID was enabled.
    const EXTENDED_RING: bool = true;
}

/// Enables everything the modem supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConfig;

impl ModemConfig for DefaultConfig {}
