use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::Read;
use heapless::Vec;

use super::{client::ResponseSlot, urc_handler::Dispatcher};
use crate::{error::Error, Line, Lines, MAX_LINE_LEN};

/// Line router between the serial port and the rest of the driver.
///
/// Each received line goes to the command in flight if there is one, and
/// is otherwise collected into an unsolicited group. A group ends when the
/// received chunk is used up and is then handed to the [`Dispatcher`].
pub struct Ingress<'a, M: RawMutex, const URC_CAPACITY: usize> {
    res_slot: &'a ResponseSlot<M>,
    dispatcher: &'a Dispatcher<M, URC_CAPACITY>,
    buf: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
    group: Lines,
}

impl<'a, M: RawMutex, const URC_CAPACITY: usize> Ingress<'a, M, URC_CAPACITY> {
    pub fn new(res_slot: &'a ResponseSlot<M>, dispatcher: &'a Dispatcher<M, URC_CAPACITY>) -> Self {
        Self {
            res_slot,
            dispatcher,
            buf: Vec::new(),
            discarding: false,
            group: Lines::new(),
        }
    }

    /// Route one complete line, without its line terminator.
    pub fn handle_line(&mut self, line: &str) -> Result<(), Error> {
        if line.is_empty() {
            return Ok(());
        }
        let line = Line::try_from(line).map_err(|_| Error::Overflow)?;

        if self.res_slot.offer(&line) {
            return Ok(());
        }

        trace!("Unsolicited line: {:?}", line.as_str());
        self.group.push(line).map_err(|_| {
            warn!("Unsolicited group too long, dropping line");
            Error::Overflow
        })
    }

    /// Hand the current unsolicited group over for handling.
    pub fn flush(&mut self) {
        if !self.group.is_empty() {
            self.dispatcher.dispatch(&self.group);
            self.group.clear();
        }
    }

    /// Feed a chunk of received bytes.
    ///
    /// Lines are split on `\r\n`. Any unsolicited lines collected so far are
    /// dispatched once the chunk is consumed.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.end_line();
            } else if self.buf.push(b).is_err() && !self.discarding {
                warn!("Line exceeds {} bytes, discarding", MAX_LINE_LEN);
                self.discarding = true;
            }
        }
        self.flush();
    }

    fn end_line(&mut self) {
        let buf = core::mem::take(&mut self.buf);
        if core::mem::take(&mut self.discarding) {
            return;
        }

        let raw = buf.strip_suffix(b"\r").unwrap_or(&buf[..]);
        match core::str::from_utf8(raw) {
            Ok(line) => {
                if let Err(e) = self.handle_line(line) {
                    error!("Failed to handle line: {:?}", e);
                }
            }
            Err(_) => warn!("Dropping non-UTF-8 line"),
        }
    }

    /// Pump bytes from the serial port until it reports end of stream.
    pub async fn read_from<R: Read>(&mut self, rx: &mut R) -> Result<(), Error> {
        let mut chunk = [0u8; 64];
        loop {
            match rx.read(&mut chunk).await {
                Ok(0) => {
                    debug!("Serial port closed");
                    self.flush();
                    return Ok(());
                }
                Ok(n) => self.write(&chunk[..n]),
                Err(_) => {
                    error!("Serial port read failed");
                    return Err(Error::Read);
                }
            }
        }
    }
}
