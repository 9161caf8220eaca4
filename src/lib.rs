#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod asynch;
pub mod command;
pub mod config;
pub mod error;
mod module_timing;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Longest single line (without CRLF) accepted from or sent to the modem.
pub const MAX_LINE_LEN: usize = 256;

/// Maximum number of lines making up a single command response.
pub const MAX_RESPONSE_LINES: usize = 16;

/// Maximum number of simultaneously tracked calls.
pub const MAX_CALLS: usize = 8;

/// Maximum length of a phone number.
pub const MAX_NUMBER_LEN: usize = 32;

/// Maximum length of a caller name. Longer names are dropped, the number
/// is kept.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of an SMS text body.
pub const MAX_SMS_LEN: usize = 512;

pub type Line = heapless::String<MAX_LINE_LEN>;
pub type Lines = heapless::Vec<Line, MAX_RESPONSE_LINES>;
