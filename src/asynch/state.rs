use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use heapless::{String, Vec};

use crate::{
    command::call_control::types::{CallState, CallType},
    error::Error,
    MAX_CALLS, MAX_NAME_LEN, MAX_NUMBER_LEN,
};

/// Optional modem features that bring-up managed to enable.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// `+CLIP` lines follow every ring indication
    pub caller_id: bool,
    /// Rings are reported as `+CRING: <type>`
    pub extended_ring: bool,
}

/// Registry key of a call, unique for the lifetime of a `State`.
pub type CallId = u32;

/// What the modem told us about an incoming call.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallInfo {
    pub number: Option<String<MAX_NUMBER_LEN>>,
    pub ton: Option<u8>,
    pub name: Option<String<MAX_NAME_LEN>>,
    pub call_type: Option<CallType>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallRecord {
    pub id: CallId,
    pub info: CallInfo,
    pub ring_count: u16,
    /// Only ever `Ringing` or `Answered`; ended calls are removed.
    pub state: CallState,
    /// An `ATA` for this call is in flight
    pub(crate) answering: bool,
    /// An `ATH` for this call is in flight
    pub(crate) hanging_up: bool,
}

pub struct State<M: RawMutex> {
    shared: Mutex<M, RefCell<Shared>>,
}

impl<M: RawMutex> Default for State<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Capabilities and live calls
struct Shared {
    capabilities: Capabilities,
    calls: Vec<CallRecord, MAX_CALLS>,
    next_id: CallId,
}

impl<M: RawMutex> State<M> {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                capabilities: Capabilities {
                    caller_id: false,
                    extended_ring: false,
                },
                calls: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.shared.lock(|s| s.borrow().capabilities)
    }

    pub(crate) fn set_capabilities(&self, capabilities: Capabilities) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.capabilities = capabilities;
        })
    }

    /// Register a ring indication.
    ///
    /// A ring from a number that already has a live call bumps that call's
    /// ring count. Rings without a known number always open a new call.
    /// Returns a snapshot of the ringing call.
    pub(crate) fn ring(&self, info: CallInfo) -> Result<CallRecord, Error> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();

            if info.number.is_some() {
                if let Some(call) = s
                    .calls
                    .iter_mut()
                    .find(|c| c.info.number == info.number)
                {
                    call.ring_count = call.ring_count.saturating_add(1);
                    debug!("Call {} rang {} times", call.id, call.ring_count);
                    return Ok(call.clone());
                }
            }

            let call = CallRecord {
                id: s.next_id,
                info,
                ring_count: 1,
                state: CallState::Ringing,
                answering: false,
                hanging_up: false,
            };
            s.calls
                .push(call.clone())
                .map_err(|_| Error::RegistryFull)?;
            s.next_id = s.next_id.wrapping_add(1);
            info!("New incoming call {}", call.id);
            Ok(call)
        })
    }

    /// State of a call; calls missing from the registry have ended.
    pub fn call_state(&self, id: CallId) -> CallState {
        self.shared.lock(|s| {
            s.borrow()
                .calls
                .iter()
                .find(|c| c.id == id)
                .map_or(CallState::Ended, |c| c.state)
        })
    }

    pub fn ring_count(&self, id: CallId) -> Option<u16> {
        self.shared.lock(|s| {
            s.borrow()
                .calls
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.ring_count)
        })
    }

    /// Claim the right to answer a ringing call. Only one caller wins until
    /// the claim is settled with [`State::end_answer`].
    pub(crate) fn begin_answer(&self, id: CallId) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match s.calls.iter_mut().find(|c| c.id == id) {
                Some(call)
                    if call.state == CallState::Ringing && !call.answering && !call.hanging_up =>
                {
                    call.answering = true;
                    true
                }
                _ => false,
            }
        })
    }

    /// Settle an answer claim; `answered` moves the call to `Answered`.
    pub(crate) fn end_answer(&self, id: CallId, answered: bool) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(call) = s.calls.iter_mut().find(|c| c.id == id) {
                call.answering = false;
                if answered {
                    call.state = CallState::Answered;
                }
            }
        })
    }

    /// Claim the right to hang up a live call. Only one caller wins until
    /// the claim is settled with [`State::end_hangup`].
    pub(crate) fn begin_hangup(&self, id: CallId) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match s.calls.iter_mut().find(|c| c.id == id) {
                Some(call) if !call.hanging_up => {
                    call.hanging_up = true;
                    true
                }
                _ => false,
            }
        })
    }

    /// Settle a hangup claim; `hung_up` removes the call.
    pub(crate) fn end_hangup(&self, id: CallId, hung_up: bool) {
        if hung_up {
            self.remove(id);
            return;
        }
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(call) = s.calls.iter_mut().find(|c| c.id == id) {
                call.hanging_up = false;
            }
        })
    }

    /// Drop an ended call. Returns `false` if it was already gone.
    pub(crate) fn remove(&self, id: CallId) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match s.calls.iter().position(|c| c.id == id) {
                Some(i) => {
                    s.calls.swap_remove(i);
                    info!("Call {} ended", id);
                    true
                }
                None => false,
            }
        })
    }

    /// Snapshot of all live calls
    pub fn calls(&self) -> Vec<CallRecord, MAX_CALLS> {
        self.shared.lock(|s| s.borrow().calls.clone())
    }
}
