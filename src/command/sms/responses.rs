//! Responses for Short Messages Service Commands
use heapless::String;

use super::types::ReceivedSms;
use crate::{
    command::split_quoted,
    error::{CommandError, Error},
    Line, MAX_SMS_LEN,
};

/// 3.4.3 Read message +CMGR, text mode SMS-DELIVER header
///
/// `+CMGR: "<stat>","<oa>",[<alpha>],"<scts>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader<'a> {
    pub status: &'a str,
    pub sender: &'a str,
    pub timestamp: &'a str,
}

impl<'a> MessageHeader<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix("+CMGR:")?.trim_start();

        let (status, rest) = non_empty(split_quoted(rest)?)?;
        let (sender, rest) = non_empty(split_quoted(rest.strip_prefix(',')?)?)?;
        // <alpha> is ignored; it never contains a comma
        let (_alpha, rest) = rest.strip_prefix(',')?.split_once(',')?;
        let (timestamp, rest) = non_empty(split_quoted(rest)?)?;

        rest.is_empty().then_some(Self {
            status,
            sender,
            timestamp,
        })
    }
}

fn non_empty<'a>((field, rest): (&'a str, &'a str)) -> Option<(&'a str, &'a str)> {
    (!field.is_empty()).then_some((field, rest))
}

/// Assemble a received message from the full `AT+CMGR` response.
///
/// The first line is the header, the last one the final result code; the
/// lines between them are the message body.
pub fn parse_read_message(lines: &[Line]) -> Result<ReceivedSms, Error> {
    let header = lines
        .first()
        .and_then(|line| MessageHeader::parse(line))
        .ok_or(Error::Command(CommandError::generic()))?;

    let body: &[Line] = match lines.len() {
        n if n > 2 => &lines[1..n - 1],
        _ => &[],
    };

    let mut text: String<MAX_SMS_LEN> = String::new();
    for (i, line) in body.iter().enumerate() {
        if i > 0 {
            text.push('\n').map_err(|_| Error::Overflow)?;
        }
        text.push_str(line).map_err(|_| Error::Overflow)?;
    }

    ReceivedSms::new(header.status, header.sender, header.timestamp, &text)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::lines_from;

    const HEADER: &str = "+CMGR: \"REC UNREAD\",\"+12025550123\",,\"23/01/01,12:00:00+02\"";

    #[test]
    fn parse_message_header() {
        assert_eq!(
            MessageHeader::parse(HEADER),
            Some(MessageHeader {
                status: "REC UNREAD",
                sender: "+12025550123",
                timestamp: "23/01/01,12:00:00+02",
            })
        );
    }

    #[test]
    fn parse_message_header_with_alpha() {
        let header = MessageHeader::parse(
            "+CMGR: \"REC READ\",\"+27820001234\",\"Bob\",\"13/02/11,09:51:32+08\"",
        )
        .unwrap();
        assert_eq!(header.sender, "+27820001234");
        assert_eq!(header.timestamp, "13/02/11,09:51:32+08");
    }

    #[test]
    fn reject_malformed_headers() {
        assert_eq!(MessageHeader::parse("OK"), None);
        assert_eq!(MessageHeader::parse("+CMGR: \"REC UNREAD\""), None);
        assert_eq!(
            MessageHeader::parse("+CMGR: \"\",\"+12025550123\",,\"23/01/01,12:00:00+02\""),
            None
        );
    }

    #[test]
    fn read_single_line_message() {
        let lines = lines_from(&[HEADER, "Hello", "OK"]).unwrap();

        assert_eq!(
            parse_read_message(&lines),
            Ok(ReceivedSms::new(
                "REC UNREAD",
                "+12025550123",
                "23/01/01,12:00:00+02",
                "Hello"
            )
            .unwrap())
        );
    }

    #[test]
    fn read_multi_line_message() {
        let lines = lines_from(&[HEADER, "first", "second", "OK"]).unwrap();

        let sms = parse_read_message(&lines).unwrap();
        assert_eq!(sms.text(), "first\nsecond");
    }

    #[test]
    fn read_empty_message() {
        let lines = lines_from(&[HEADER, "OK"]).unwrap();

        assert_eq!(parse_read_message(&lines).unwrap().text(), "");
    }

    #[test]
    fn malformed_header_is_a_protocol_violation() {
        let lines = lines_from(&["+CMGR: garbage", "Hello", "OK"]).unwrap();

        assert_eq!(
            parse_read_message(&lines),
            Err(Error::Command(CommandError::generic()))
        );
    }
}
