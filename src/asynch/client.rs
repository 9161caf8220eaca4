use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{self, raw::RawMutex},
    mutex::Mutex,
    signal::Signal,
};
use embassy_time::with_timeout;
use embedded_io_async::Write;

use crate::{
    command::Command,
    error::{is_final_line, CommandError, Error},
    Line, Lines,
};

/// Anything that can run a command against the modem.
///
/// This is the only handle calls, workers and the bring-up sequence hold;
/// none of them own the transport.
pub trait AtSender {
    async fn send(&self, cmd: &Command<'_>) -> Result<Lines, Error>;
}

impl<T: AtSender> AtSender for &T {
    async fn send(&self, cmd: &Command<'_>) -> Result<Lines, Error> {
        T::send(self, cmd).await
    }
}

enum Pending {
    Idle,
    Collecting { lines: Lines, overflow: bool },
    Complete(Result<Lines, Error>),
}

/// Rendezvous between the command in flight and the line reader.
pub struct ResponseSlot<M: RawMutex> {
    pending: blocking_mutex::Mutex<M, RefCell<Pending>>,
    signal: Signal<M, ()>,
}

impl<M: RawMutex> Default for ResponseSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> ResponseSlot<M> {
    pub const fn new() -> Self {
        Self {
            pending: blocking_mutex::Mutex::new(RefCell::new(Pending::Idle)),
            signal: Signal::new(),
        }
    }

    fn arm(&self) {
        self.signal.reset();
        self.pending.lock(|p| {
            *p.borrow_mut() = Pending::Collecting {
                lines: Lines::new(),
                overflow: false,
            }
        });
    }

    fn disarm(&self) {
        self.pending.lock(|p| *p.borrow_mut() = Pending::Idle);
    }

    /// Offer a received line to the command in flight.
    ///
    /// Returns `false` if no command is waiting, in which case the line is
    /// unsolicited.
    pub(crate) fn offer(&self, line: &Line) -> bool {
        let done = self.pending.lock(|p| {
            let p = &mut *p.borrow_mut();
            let Pending::Collecting { lines, overflow } = &mut *p else {
                return None;
            };

            if lines.push(line.clone()).is_err() {
                *overflow = true;
            }
            if !is_final_line(line) {
                return Some(false);
            }

            let res = if *overflow {
                Err(Error::Overflow)
            } else {
                Ok(core::mem::take(lines))
            };
            *p = Pending::Complete(res);
            Some(true)
        });

        match done {
            None => false,
            Some(complete) => {
                if complete {
                    self.signal.signal(());
                }
                true
            }
        }
    }

    async fn wait(&self) -> Result<Lines, Error> {
        loop {
            self.signal.wait().await;
            let res = self.pending.lock(|p| {
                let p = &mut *p.borrow_mut();
                match core::mem::replace(p, Pending::Idle) {
                    Pending::Complete(res) => Some(res),
                    other => {
                        *p = other;
                        None
                    }
                }
            });
            if let Some(res) = res {
                return res;
            }
        }
    }
}

/// Serialises commands over the transport and correlates their responses.
///
/// The writer sits behind an async mutex that is held from the first byte
/// written until the response resolves, so at most one command is in flight.
pub struct CommandChannel<'a, M: RawMutex, W: Write> {
    tx: Mutex<M, W>,
    res_slot: &'a ResponseSlot<M>,
}

impl<'a, M: RawMutex, W: Write> CommandChannel<'a, M, W> {
    pub fn new(tx: W, res_slot: &'a ResponseSlot<M>) -> Self {
        Self {
            tx: Mutex::new(tx),
            res_slot,
        }
    }

    async fn write(tx: &mut W, cmd: &Command<'_>) -> Result<(), W::Error> {
        tx.write_all(cmd.text.as_bytes()).await?;
        tx.write_all(cmd.terminator).await?;
        tx.flush().await
    }
}

impl<M: RawMutex, W: Write> AtSender for CommandChannel<'_, M, W> {
    async fn send(&self, cmd: &Command<'_>) -> Result<Lines, Error> {
        let mut tx = self.tx.lock().await;

        trace!("Sending command: {:?}", cmd.text);
        if cmd.wait_for_response {
            self.res_slot.arm();
        }

        if Self::write(&mut *tx, cmd).await.is_err() {
            error!("Failed to write command {:?}", cmd.text);
            self.res_slot.disarm();
            return Err(Error::Write);
        }

        if !cmd.wait_for_response {
            return Ok(Lines::new());
        }

        let lines = match with_timeout(cmd.timeout, self.res_slot.wait()).await {
            Ok(res) => res?,
            Err(_) => {
                self.res_slot.disarm();
                warn!("Timeout waiting for response to {:?}", cmd.text);
                return Err(Error::Timeout);
            }
        };

        match lines.last() {
            Some(last) if cmd.parse_errors && last.contains("ERROR") => {
                let e = CommandError::from_status_line(last);
                debug!("Command {:?} failed: {:?}", cmd.text, e);
                Err(e.into())
            }
            _ => Ok(lines),
        }
    }
}
