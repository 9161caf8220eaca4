use core::{cell::RefCell, convert::Infallible};
use std::{string::String, vec::Vec};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::{ErrorType, Write};

use crate::{asynch::client::ResponseSlot, Line};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scripted modem standing in for the serial port.
///
/// Every flushed command is appended to `log`; `respond` decides which lines
/// the modem answers with (`None` keeps it silent), and those lines are fed
/// straight to the response slot.
pub struct MockModem<'a, M: RawMutex, F> {
    slot: &'a ResponseSlot<M>,
    log: &'a RefCell<Vec<String>>,
    respond: F,
    buf: Vec<u8>,
}

impl<'a, M, F> MockModem<'a, M, F>
where
    M: RawMutex,
    F: FnMut(&str) -> Option<Vec<&'static str>>,
{
    pub fn new(slot: &'a ResponseSlot<M>, log: &'a RefCell<Vec<String>>, respond: F) -> Self {
        Self {
            slot,
            log,
            respond,
            buf: Vec::new(),
        }
    }
}

impl<M: RawMutex, F> ErrorType for MockModem<'_, M, F> {
    type Error = Infallible;
}

impl<M, F> Write for MockModem<'_, M, F>
where
    M: RawMutex,
    F: FnMut(&str) -> Option<Vec<&'static str>>,
{
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let raw = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        let cmd = raw.trim_end_matches(['\r', '\n', '\x1a']);

        self.log.borrow_mut().push(String::from(cmd));
        if let Some(lines) = (self.respond)(cmd) {
            for line in lines {
                self.slot.offer(&Line::try_from(line).unwrap());
            }
        }
        Ok(())
    }
}
