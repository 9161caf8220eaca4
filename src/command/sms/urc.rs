//! Unsolicited responses for SMS Commands
use heapless::String;

use crate::error::{CommandError, Error};

pub const NEW_MESSAGE_PREFIX: &str = "+CMTI";

/// 3.4.1 New message indication +CMTI
///
/// A message was stored at `<index>` of memory `<mem>`. Modems differ on
/// whether `<mem>` is quoted, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NewMessageIndication {
    pub mem: String<8>,
    pub index: u16,
}

impl NewMessageIndication {
    pub fn parse(line: &str) -> Result<Self, Error> {
        Self::parse_fields(line).ok_or(Error::Command(CommandError::generic()))
    }

    fn parse_fields(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(NEW_MESSAGE_PREFIX)?.strip_prefix(':')?;
        let (mem, index) = rest.trim().rsplit_once(',')?;

        let mem = mem.trim();
        let mem = mem
            .strip_prefix('"')
            .and_then(|m| m.strip_suffix('"'))
            .unwrap_or(mem);
        let index = index.trim();
        if mem.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            mem: String::try_from(mem).ok()?,
            index: index.parse().ok()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_new_message_indication() {
        assert_eq!(
            NewMessageIndication::parse("+CMTI: \"SM\",4"),
            Ok(NewMessageIndication {
                mem: String::try_from("SM").unwrap(),
                index: 4,
            })
        );
    }

    #[test]
    fn parse_unquoted_storage() {
        assert_eq!(
            NewMessageIndication::parse("+CMTI: SM,4"),
            Ok(NewMessageIndication {
                mem: String::try_from("SM").unwrap(),
                index: 4,
            })
        );
    }

    #[test]
    fn reject_missing_index() {
        assert!(NewMessageIndication::parse("+CMTI: \"SM\"").is_err());
        assert!(NewMessageIndication::parse("+CMTI: \"SM\",").is_err());
        assert!(NewMessageIndication::parse("+CMTI: ,4").is_err());
        assert!(NewMessageIndication::parse("+CMTI: \"SM\",x").is_err());
    }
}
