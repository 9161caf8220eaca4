use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

use super::{
    call::Call,
    client::AtSender,
    sms,
    state::{CallInfo, State},
};
use crate::{
    command::{
        call_control::urc::{ring_call_type, CallerId},
        sms::types::ReceivedSms,
        Urc,
    },
    error::Error,
    Line,
};

/// Application callbacks for unsolicited events.
///
/// Both methods default to doing nothing.
pub trait EventHandler {
    /// A call is ringing. Called again on every further ring of the same
    /// caller.
    ///
    /// Calls stay registered until they are hung up, also when the remote
    /// side gives up first. Rings without a caller number (caller ID off or
    /// withheld) each register a new call, so the application has to hang
    /// up calls it does not take; once [`crate::MAX_CALLS`] calls are
    /// registered further rings are dropped with an error log.
    async fn incoming_call<M: RawMutex, A: AtSender>(&self, _call: Call<'_, M, A>) {}

    /// A message was received and already deleted from modem storage.
    async fn sms_received(&self, _sms: ReceivedSms) {}
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventHandler;

impl EventHandler for NoopEventHandler {}

/// Queue of classified notifications between the line reader and the
/// workers.
pub struct Dispatcher<M: RawMutex, const URC_CAPACITY: usize> {
    queue: Channel<M, Urc, URC_CAPACITY>,
}

impl<M: RawMutex, const URC_CAPACITY: usize> Default for Dispatcher<M, URC_CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const URC_CAPACITY: usize> Dispatcher<M, URC_CAPACITY> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
        }
    }

    /// Classify an unsolicited line group and queue it. Never blocks.
    pub fn dispatch(&self, lines: &[Line]) {
        let Some(urc) = Urc::classify(lines) else {
            debug!("Unhandled unsolicited notification: {:?}", lines);
            return;
        };

        if self.queue.try_send(urc).is_err() {
            error!("Notification queue full, dropping {:?}", lines);
        }
    }

    pub async fn next(&self) -> Urc {
        self.queue.receive().await
    }

    pub fn try_next(&self) -> Option<Urc> {
        self.queue.try_receive().ok()
    }
}

/// Notification worker.
///
/// `run()` handles one notification at a time; polling several `run()`
/// futures of the same handler concurrently gives a pool of workers.
pub struct UrcHandler<'a, M: RawMutex, A: AtSender, E: EventHandler, const URC_CAPACITY: usize> {
    state: &'a State<M>,
    at: &'a A,
    dispatcher: &'a Dispatcher<M, URC_CAPACITY>,
    events: &'a E,
}

impl<'a, M: RawMutex, A: AtSender, E: EventHandler, const URC_CAPACITY: usize>
    UrcHandler<'a, M, A, E, URC_CAPACITY>
{
    pub fn new(
        state: &'a State<M>,
        at: &'a A,
        dispatcher: &'a Dispatcher<M, URC_CAPACITY>,
        events: &'a E,
    ) -> Self {
        Self {
            state,
            at,
            dispatcher,
            events,
        }
    }

    pub async fn run(&self) -> ! {
        loop {
            let event = self.dispatcher.next().await;
            self.handle_urc(event).await;
        }
    }

    async fn handle_urc(&self, event: Urc) {
        match event {
            Urc::IncomingCall { ring, caller_id } => {
                match self.incoming_call(&ring, caller_id.as_deref()) {
                    Ok(call) => self.events.incoming_call(call).await,
                    Err(e) => error!("Failed to register incoming call: {:?}", e),
                }
            }
            Urc::NewMessage(indication) => match sms::receive(self.at, &indication).await {
                Ok(sms) => self.events.sms_received(sms).await,
                Err(e) => error!("Failed to receive message: {:?}", e),
            },
        }
    }

    fn incoming_call(&self, ring: &str, caller_id: Option<&str>) -> Result<Call<'a, M, A>, Error> {
        let capabilities = self.state.capabilities();

        let call_type = if capabilities.extended_ring {
            ring_call_type(ring)
        } else {
            None
        };

        let caller = match caller_id {
            Some(line) if capabilities.caller_id => {
                let caller = CallerId::parse(line);
                if caller.is_none() {
                    warn!("Unparseable caller ID: {:?}", line);
                }
                caller
            }
            _ => None,
        };

        let info = match caller {
            Some(CallerId { number, ton, name }) => CallInfo {
                number: Some(number),
                ton: Some(ton),
                name,
                call_type,
            },
            None => CallInfo {
                call_type,
                ..Default::default()
            },
        };

        let record = self.state.ring(info)?;
        Ok(Call::new(record, self.state, self.at))
    }
}
