use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{
    client::AtSender,
    state::{CallId, CallInfo, CallRecord, State},
};
use crate::{
    command::{
        call_control::{self, types::CallState, types::CallType},
        Command,
    },
    error::Error,
};

/// An incoming call.
///
/// The call record itself lives in the registry; this is a handle that can
/// answer, hang up and send tones through the command channel.
pub struct Call<'a, M: RawMutex, A: AtSender> {
    id: CallId,
    info: CallInfo,
    ring_count: u16,
    state: &'a State<M>,
    at: &'a A,
}

impl<M: RawMutex, A: AtSender> Clone for Call<'_, M, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            info: self.info.clone(),
            ring_count: self.ring_count,
            state: self.state,
            at: self.at,
        }
    }
}

impl<'a, M: RawMutex, A: AtSender> Call<'a, M, A> {
    pub(crate) fn new(record: CallRecord, state: &'a State<M>, at: &'a A) -> Self {
        Self {
            id: record.id,
            info: record.info,
            ring_count: record.ring_count,
            state,
            at,
        }
    }

    pub fn id(&self) -> CallId {
        self.id
    }

    /// Caller number, if caller ID is enabled and the network presented it
    pub fn number(&self) -> Option<&str> {
        self.info.number.as_deref()
    }

    /// Type of number (129 national, 145 international)
    pub fn ton(&self) -> Option<u8> {
        self.info.ton
    }

    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    /// Only known with the extended ring indication enabled
    pub fn call_type(&self) -> Option<CallType> {
        self.info.call_type
    }

    /// Number of rings so far; frozen once the call has ended.
    pub fn ring_count(&self) -> u16 {
        self.state.ring_count(self.id).unwrap_or(self.ring_count)
    }

    pub fn state(&self) -> CallState {
        self.state.call_state(self.id)
    }

    /// Answer a ringing call. Does nothing once answered or ended, or while
    /// another handle to the same call is answering it.
    pub async fn answer(&self) -> Result<&Self, Error> {
        if !self.state.begin_answer(self.id) {
            return Ok(self);
        }

        let res = self.at.send(&call_control::ANSWER).await;
        self.state.end_answer(self.id, res.is_ok());
        res?;
        Ok(self)
    }

    /// Send DTMF tones on an answered call.
    pub async fn send_dtmf_tone(&self, tones: &str) -> Result<(), Error> {
        if self.state() != CallState::Answered {
            return Err(Error::InvalidState);
        }
        if tones.is_empty() {
            return Ok(());
        }

        let cmd = call_control::send_dtmf(tones)?;
        self.at.send(&Command::new(&cmd)).await?;
        Ok(())
    }

    /// End the call and drop it from the registry. Does nothing if the call
    /// has already ended or is being hung up through another handle.
    pub async fn hangup(&self) -> Result<(), Error> {
        if !self.state.begin_hangup(self.id) {
            return Ok(());
        }

        let res = self.at.send(&call_control::HANG_UP).await;
        self.state.end_hangup(self.id, res.is_ok());
        res?;
        Ok(())
    }
}
