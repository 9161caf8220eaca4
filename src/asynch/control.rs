use core::{cell::Cell, convert::Infallible, future::pending};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use heapless::Vec;

use super::{
    call::Call,
    client::AtSender,
    sms,
    state::{Capabilities, State},
};
use crate::{
    command::{
        network_service::{responses::SignalQuality, GET_SIGNAL_QUALITY},
        Command,
    },
    error::{CommandError, Error},
    module_timing, Lines, MAX_CALLS,
};

pub struct Control<'a, M: RawMutex, A: AtSender> {
    state: &'a State<M>,
    at: &'a A,
}

impl<'a, M: RawMutex, A: AtSender> Control<'a, M, A> {
    pub(crate) fn new(state: &'a State<M>, at: &'a A) -> Self {
        Self { state, at }
    }

    /// Optional features enabled during bring-up
    pub fn capabilities(&self) -> Capabilities {
        self.state.capabilities()
    }

    /// Handles to every call that has not ended yet.
    ///
    /// Nothing ends a call except [`Call::hangup`]; hanging up stale calls
    /// here frees room for new ones when the registry is full.
    pub fn active_calls(&self) -> Vec<Call<'a, M, A>, MAX_CALLS> {
        self.state
            .calls()
            .into_iter()
            .map(|record| Call::new(record, self.state, self.at))
            .collect()
    }

    /// Current signal strength, 0..=31, or -1 when unknown.
    pub async fn signal_strength(&self) -> Result<i16, Error> {
        let lines = self.at.send(&GET_SIGNAL_QUALITY).await?;
        let first = lines
            .first()
            .ok_or(Error::Command(CommandError::generic()))?;
        Ok(SignalQuality::parse(first)?.strength())
    }

    /// Poll the signal strength every second until it is positive.
    ///
    /// With a `timeout`, polling stops with `Error::Timeout` at the first
    /// attempt after it has elapsed. A poll already in progress is not
    /// interrupted.
    pub async fn wait_for_network_coverage(
        &self,
        timeout: Option<Duration>,
    ) -> Result<i16, Error> {
        let expired = Cell::new(false);

        let countdown = async {
            if let Some(timeout) = timeout {
                Timer::after(timeout).await;
                expired.set(true);
            }
            pending::<Infallible>().await
        };

        match select(self.poll_coverage(&expired), countdown).await {
            Either::First(res) => res,
            Either::Second(never) => match never {},
        }
    }

    async fn poll_coverage(&self, expired: &Cell<bool>) -> Result<i16, Error> {
        loop {
            if expired.get() {
                warn!("No network coverage");
                return Err(Error::Timeout);
            }
            let strength = self.signal_strength().await?;
            if strength > 0 {
                return Ok(strength);
            }
            trace!("Waiting for coverage, signal strength {}", strength);
            Timer::after(module_timing::coverage_poll_interval()).await;
        }
    }

    /// Send a text message.
    pub async fn send_sms(&self, destination: &str, text: &str) -> Result<(), Error> {
        sms::send(self.at, destination, text).await
    }

    /// Send an AT command to the modem. This is useful for settings the
    /// driver does not cover, but may break the driver if they interfere
    /// with its own configuration.
    pub async fn send(&self, cmd: &Command<'_>) -> Result<Lines, Error> {
        self.at.send(cmd).await
    }
}
