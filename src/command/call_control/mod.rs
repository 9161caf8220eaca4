//! ### 6/7 - Call control and caller identification
pub mod types;
pub mod urc;

use core::fmt::Write;

use heapless::String;

use super::Command;
use crate::{error::Error, MAX_LINE_LEN};

/// Answer A
///
/// Answers an incoming call.
pub const ANSWER: Command<'static> = Command::new("ATA");

/// Hook control H
///
/// Disconnects the remote user; together with `+CVHU=0` it ends voice
/// calls as well.
pub const HANG_UP: Command<'static> = Command::new("ATH");

/// 7.6 Calling line identification presentation +CLIP
///
/// Enables the `+CLIP: <number>,<type>[,...]` line reported after every
/// `RING`.
pub const ENABLE_CALLER_ID: Command<'static> = Command::new("AT+CLIP=1");

/// 6.11 Cellular result codes +CRC
///
/// Reports incoming calls as `+CRING: <type>` instead of `RING`.
pub const ENABLE_EXTENDED_RING: Command<'static> = Command::new("AT+CRC=1");

/// 6.20 Voice hangup control +CVHU
///
/// `<mode>`=0: `ATH` disconnects voice calls.
pub const ENABLE_HANGUP_BY_ATH: Command<'static> = Command::new("AT+CVHU=0");

/// DTMF and tone generation +VTS
///
/// A single tone is sent as `AT+VTS=<tone>`; a sequence is chained on one
/// command line as `AT+VTS=<t1>;+VTS=<t2>...`.
pub fn send_dtmf(tones: &str) -> Result<String<MAX_LINE_LEN>, Error> {
    let mut buf = String::new();
    buf.push_str("AT").map_err(|_| Error::Overflow)?;
    for (i, tone) in tones.chars().enumerate() {
        let sep = if i == 0 { "" } else { ";" };
        write!(buf, "{}+VTS={}", sep, tone).map_err(|_| Error::Overflow)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_dtmf_tone() {
        assert_eq!(send_dtmf("5").unwrap().as_str(), "AT+VTS=5");
    }

    #[test]
    fn dtmf_tone_sequence() {
        assert_eq!(
            send_dtmf("*12#").unwrap().as_str(),
            "AT+VTS=*;+VTS=1;+VTS=2;+VTS=#"
        );
    }
}
