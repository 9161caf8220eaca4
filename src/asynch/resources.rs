use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::Write;

use super::{
    client::{CommandChannel, ResponseSlot},
    ingress::Ingress,
    state::State,
    urc_handler::Dispatcher,
};

/// Everything the driver shares between the line reader, the command
/// channel and the notification workers.
///
/// `URC_CAPACITY` is the number of notifications that can be queued for the
/// workers before new ones are dropped.
pub struct Resources<M: RawMutex, const URC_CAPACITY: usize> {
    pub(crate) state: State<M>,
    pub(crate) res_slot: ResponseSlot<M>,
    pub(crate) dispatcher: Dispatcher<M, URC_CAPACITY>,
}

impl<M: RawMutex, const URC_CAPACITY: usize> Default for Resources<M, URC_CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const URC_CAPACITY: usize> Resources<M, URC_CAPACITY> {
    pub const fn new() -> Self {
        Self {
            state: State::new(),
            res_slot: ResponseSlot::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Command channel writing to the serial port's transmit half.
    pub fn command_channel<W: Write>(&self, tx: W) -> CommandChannel<'_, M, W> {
        CommandChannel::new(tx, &self.res_slot)
    }

    /// Line router to feed with the serial port's received bytes.
    pub fn ingress(&self) -> Ingress<'_, M, URC_CAPACITY> {
        Ingress::new(&self.res_slot, &self.dispatcher)
    }
}
