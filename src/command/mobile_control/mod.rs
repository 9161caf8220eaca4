//! ### 8/9 - Mobile termination control and error reporting

use super::Command;

/// 8.2 Set phone functionality +CFUN
///
/// Selects full functionality (`<fun>`=1) in the MT.
pub const SET_FULL_FUNCTIONALITY: Command<'static> = Command::new("AT+CFUN=1");

/// 9.1 Report mobile termination error +CMEE
///
/// Enables the numeric `+CME ERROR: <err>` / `+CMS ERROR: <err>` result codes
/// instead of a plain `ERROR`.
pub const ENABLE_NUMERIC_ERRORS: Command<'static> = Command::new("AT+CMEE=1");
