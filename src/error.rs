/// Which family of mobile equipment error a rejected command reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandErrorKind {
    /// Plain `ERROR`, or a response that did not match the expected grammar
    Generic,
    /// `+CME ERROR: <n>` (mobile equipment error, 3GPP TS 27.007 9.2)
    Cme,
    /// `+CMS ERROR: <n>` (message service error, 3GPP TS 27.005 3.2.5)
    Cms,
}

/// The modem rejected a command, or answered it with something unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub code: Option<u32>,
}

impl CommandError {
    pub const fn generic() -> Self {
        Self {
            kind: CommandErrorKind::Generic,
            code: None,
        }
    }

    /// Classify an error status line.
    ///
    /// `+CME ERROR: <digits>` and `+CMS ERROR: <digits>` carry their kind and
    /// code, anything else (plain `ERROR`, verbose error text) is generic.
    pub fn from_status_line(line: &str) -> Self {
        let structured = [
            ("+CME ERROR: ", CommandErrorKind::Cme),
            ("+CMS ERROR: ", CommandErrorKind::Cms),
        ]
        .into_iter()
        .find_map(|(prefix, kind)| {
            let digits = line.strip_prefix(prefix)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some(Self {
                kind,
                code: Some(digits.parse().ok()?),
            })
        });

        structured.unwrap_or_else(Self::generic)
    }
}

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The modem rejected the command, or its response broke the grammar
    Command(CommandError),
    /// No final result code arrived within the command's window
    Timeout,
    /// The call is not in a state that allows the requested operation
    InvalidState,
    /// A line, response or outgoing command exceeded its buffer
    Overflow,
    /// Writing to the transport failed
    Write,
    /// Reading from the transport failed
    Read,
    /// No room left to track another call
    RegistryFull,
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Whether `line` ends a command response.
pub(crate) fn is_final_line(line: &str) -> bool {
    line.starts_with("OK")
        || line.starts_with("ERROR")
        || line.starts_with("+CME ERROR:")
        || line.starts_with("+CMS ERROR:")
}
