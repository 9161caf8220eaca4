//! Argument and parameter types used by Call Control Commands and Responses

/// Kind of incoming call, as reported by `+CRING: <type>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallType {
    Voice,
    Fax,
    /// Any data bearer (`ASYNC`, `SYNC`, `REL ASYNC`, `GPRS`, ...)
    Data,
}

impl CallType {
    pub fn from_cring(typ: &str) -> Self {
        if typ.starts_with("VOICE") {
            Self::Voice
        } else if typ.contains("FAX") {
            Self::Fax
        } else {
            Self::Data
        }
    }
}

/// Lifecycle of a call. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallState {
    Ringing,
    Answered,
    Ended,
}
