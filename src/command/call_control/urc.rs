//! Unsolicited responses for Call Control Commands
use heapless::String;

use super::types::CallType;
use crate::{command::split_quoted, MAX_NAME_LEN, MAX_NUMBER_LEN};

/// Call type token of an extended ring indication, `+CRING: <type>`.
///
/// A plain `RING` carries no type.
pub fn ring_call_type(ring: &str) -> Option<CallType> {
    let (_, typ) = ring.split_once(' ')?;
    let typ = typ.trim();
    (!typ.is_empty()).then(|| CallType::from_cring(typ))
}

/// 7.6 Calling line identification presentation +CLIP
///
/// `+CLIP: "<number>",<type>,<subaddr>,<satype>,"<alpha>"[,<CLI validity>]`
/// where `<alpha>` may be left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallerId {
    pub number: String<MAX_NUMBER_LEN>,
    /// Type of number (129 national, 145 international)
    pub ton: u8,
    /// Never `Some("")`: an empty alpha field is reported as `None`, as is
    /// one longer than [`MAX_NAME_LEN`]
    pub name: Option<String<MAX_NAME_LEN>>,
}

impl CallerId {
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix("+CLIP:")?.trim_start();

        let (number, rest) = split_quoted(rest)?;
        let digits = number.strip_prefix('+').unwrap_or(number);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let (ton, rest) = rest.strip_prefix(',')?.split_once(',')?;
        let ton = ton.parse().ok()?;
        // <subaddr> and <satype>
        let (_, rest) = rest.split_once(',')?;
        let (_, rest) = rest.split_once(',')?;

        let name = if rest.starts_with('"') {
            let (name, tail) = split_quoted(rest)?;
            if !(tail.is_empty() || tail.starts_with(',')) {
                return None;
            }
            name
        } else if rest.is_empty() || rest.starts_with(',') {
            ""
        } else {
            return None;
        };

        let name = match name {
            "" => None,
            name => {
                let name = String::try_from(name).ok();
                if name.is_none() {
                    warn!("Caller name exceeds {} bytes, dropping it", MAX_NAME_LEN);
                }
                name
            }
        };

        Some(Self {
            number: String::try_from(number).ok()?,
            ton,
            name,
        })
    }
}
