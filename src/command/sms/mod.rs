//! ### 3GPP TS 27.005 - Short Messages Service (text mode)

pub mod responses;
pub mod types;
pub mod urc;

use heapless::String;

use super::{format, Command, CTRL_Z};
use crate::{error::Error, module_timing, MAX_NUMBER_LEN, MAX_SMS_LEN};

/// 3.2.3 Message format +CMGF
///
/// Switches the message format to text mode (`<mode>`=1).
pub const SET_TEXT_MODE: Command<'static> = Command::new("AT+CMGF=1");

/// 3.3.2 Set text mode parameters +CSMP
///
/// `<fo>`=49 selects SMS-SUBMIT with relative validity period and a status
/// report request, `<vp>`=167 is a validity period of one day.
pub const REQUEST_DELIVERY_REPORTS: Command<'static> = Command::new("AT+CSMP=49,167");

/// 3.2.2 Preferred message storage +CPMS
///
/// Reads and deletes from SIM, stores to SIM, status reports go to the SIM
/// status report store.
pub const SET_MESSAGE_STORAGE: Command<'static> = Command::new("AT+CPMS=\"SM\",\"SM\",\"SR\"");

/// 3.4.1 New message indications to TE +CNMI
///
/// Incoming messages are stored and announced with `+CMTI: <mem>,<index>`,
/// status reports are routed to the TE.
pub const SET_NEW_MESSAGE_INDICATIONS: Command<'static> = Command::new("AT+CNMI=2,1,0,2");

/// 3.4.3 Read message +CMGR
pub fn read_message(index: u16) -> Result<String<16>, Error> {
    format(format_args!("AT+CMGR={}", index))
}

/// 3.5.4 Delete message +CMGD
pub fn delete_message(index: u16) -> Result<String<16>, Error> {
    format(format_args!("AT+CMGD={}", index))
}

/// 3.5.1 Send message +CMGS
///
/// The destination and the body are written in one go, the body being
/// terminated by Ctrl-Z instead of CRLF (see [`submit_message`]).
pub fn send_message(
    destination: &str,
    text: &str,
) -> Result<String<{ MAX_NUMBER_LEN + MAX_SMS_LEN + 16 }>, Error> {
    format(format_args!("AT+CMGS=\"{}\"\r{}", destination, text))
}

/// Wrap a formatted [`send_message`] line into a command with the SMS
/// terminator and submit timeout.
pub fn submit_message(line: &str) -> Command<'_> {
    Command::new(line)
        .with_terminator(CTRL_Z)
        .with_timeout(module_timing::sms_submit_timeout())
}
