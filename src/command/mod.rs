//! AT commands for GSM modems
//! Following 3GPP TS 27.007 (call control, mobile equipment, network service)
//! and 3GPP TS 27.005 (SMS text mode), plus the V.25ter basic commands.

pub mod call_control;
pub mod control;
pub mod mobile_control;
pub mod network_service;
pub mod sms;

use embassy_time::Duration;
use heapless::String;

use crate::{error::Error, module_timing, Line, Lines};

/// Carriage return + line feed, terminating every ordinary command
pub const CRLF: &[u8] = b"\r\n";

/// Ctrl-Z, terminating an SMS body entered after `AT+CMGS`
pub const CTRL_Z: &[u8] = &[0x1A];

/// A single command line together with how its response is handled.
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    pub text: &'a str,
    pub wait_for_response: bool,
    pub timeout: Duration,
    /// Turn an error status line into `Err(Error::Command(..))`. When
    /// `false`, the raw response including the error line is returned.
    pub parse_errors: bool,
    pub terminator: &'static [u8],
}

impl<'a> Command<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            wait_for_response: true,
            timeout: module_timing::command_timeout(),
            parse_errors: true,
            terminator: CRLF,
        }
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Write the command and return immediately with an empty response
    pub const fn without_response(mut self) -> Self {
        self.wait_for_response = false;
        self
    }

    pub const fn with_raw_errors(mut self) -> Self {
        self.parse_errors = false;
        self
    }

    pub const fn with_terminator(mut self, terminator: &'static [u8]) -> Self {
        self.terminator = terminator;
        self
    }
}

/// Format a command line with a runtime argument into a fixed buffer.
pub(crate) fn format<const N: usize>(args: core::fmt::Arguments<'_>) -> Result<String<N>, Error> {
    let mut buf = String::new();
    core::fmt::write(&mut buf, args).map_err(|_| Error::Overflow)?;
    Ok(buf)
}

/// Split a leading `"..."` string off `s`, returning its contents and the
/// remainder after the closing quote.
pub(crate) fn split_quoted(s: &str) -> Option<(&str, &str)> {
    let inner = s.strip_prefix('"')?;
    let end = inner.find('"')?;
    Some((&inner[..end], &inner[end + 1..]))
}

/// Unsolicited result codes this driver acts upon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `RING` / `+CRING: <type>`, optionally followed by the `+CLIP` line
    IncomingCall { ring: Line, caller_id: Option<Line> },
    /// `+CMTI: <mem>,<index>`
    NewMessage(Line),
}

impl Urc {
    /// Classify a group of unsolicited lines by its first line.
    ///
    /// Returns `None` for notifications the driver does not handle.
    pub fn classify(lines: &[Line]) -> Option<Self> {
        let first = lines.first()?;
        if first.contains("RING") {
            Some(Self::IncomingCall {
                ring: first.clone(),
                caller_id: lines.get(1).cloned(),
            })
        } else if first.starts_with(sms::urc::NEW_MESSAGE_PREFIX) {
            Some(Self::NewMessage(first.clone()))
        } else {
            None
        }
    }
}

/// Copy string slices into an owned response, e.g. to feed canned lines.
pub fn lines_from(lines: &[&str]) -> Result<Lines, Error> {
    let mut out = Lines::new();
    for line in lines {
        out.push(Line::try_from(*line).map_err(|_| Error::Overflow)?)
            .map_err(|_| Error::Overflow)?;
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify_ring_with_caller_id() {
        let lines = lines_from(&["RING", "+CLIP: \"+27820001234\",145,,,\"Alice\""]).unwrap();

        assert_eq!(
            Urc::classify(&lines),
            Some(Urc::IncomingCall {
                ring: Line::try_from("RING").unwrap(),
                caller_id: Some(Line::try_from("+CLIP: \"+27820001234\",145,,,\"Alice\"").unwrap()),
            })
        );
    }

    #[test]
    fn classify_extended_ring() {
        let lines = lines_from(&["+CRING: VOICE"]).unwrap();

        assert!(matches!(
            Urc::classify(&lines),
            Some(Urc::IncomingCall {
                caller_id: None,
                ..
            })
        ));
    }

    #[test]
    fn classify_new_message() {
        let lines = lines_from(&["+CMTI: \"SM\",4"]).unwrap();

        assert_eq!(
            Urc::classify(&lines),
            Some(Urc::NewMessage(Line::try_from("+CMTI: \"SM\",4").unwrap()))
        );
    }

    #[test]
    fn unknown_notifications_are_not_classified() {
        assert_eq!(Urc::classify(&lines_from(&["NO CARRIER"]).unwrap()), None);
        assert_eq!(Urc::classify(&[]), None);
    }

    #[test]
    fn split_quoted_fields() {
        assert_eq!(split_quoted("\"SM\",4"), Some(("SM", ",4")));
        assert_eq!(split_quoted("\"\""), Some(("", "")));
        assert_eq!(split_quoted("SM,4"), None);
        assert_eq!(split_quoted("\"unterminated"), None);
    }

    #[test]
    fn command_defaults() {
        let cmd = Command::new("AT+CSQ");

        assert!(cmd.wait_for_response);
        assert!(cmd.parse_errors);
        assert_eq!(cmd.terminator, CRLF);
        assert_eq!(cmd.timeout, Duration::from_secs(5));
    }
}
