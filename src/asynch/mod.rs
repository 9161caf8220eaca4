pub mod call;
pub mod client;
pub mod control;
pub mod ingress;
pub mod resources;
pub mod runner;
mod sms;
pub mod state;
pub mod urc_handler;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::ModemConfig;

pub use call::Call;
pub use client::{AtSender, CommandChannel};
pub use control::Control;
pub use ingress::Ingress;
pub use resources::Resources;
pub use runner::Runner;
pub use urc_handler::{EventHandler, NoopEventHandler, UrcHandler};

/// Split the driver into its user facing parts.
///
/// `at` is usually [`Resources::command_channel`]. The line reader
/// ([`Resources::ingress`]) has to run alongside [`Runner::init`] and the
/// [`UrcHandler`] workers.
pub fn new<'a, M, A, C, E, const URC_CAPACITY: usize>(
    resources: &'a Resources<M, URC_CAPACITY>,
    at: &'a A,
    config: C,
    events: &'a E,
) -> (
    Control<'a, M, A>,
    Runner<'a, M, A, C>,
    UrcHandler<'a, M, A, E, URC_CAPACITY>,
)
where
    M: RawMutex,
    A: AtSender,
    C: ModemConfig,
    E: EventHandler,
{
    let control = Control::new(&resources.state, at);
    let runner = Runner::new(&resources.state, at, config);
    let urc_handler = UrcHandler::new(&resources.state, at, &resources.dispatcher, events);

    (control, runner, urc_handler)
}

#[cfg(test)]
mod test {
    use core::cell::RefCell;
    use std::{string::String, vec, vec::Vec};

    use embassy_futures::{block_on, join::join, select::select};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::{Duration, Timer};

    use super::*;
    use crate::{
        command::{call_control::types::CallState, sms::types::ReceivedSms},
        config::DefaultConfig,
        test_helpers::{init_logger, MockModem},
    };

    const HEADER: &str = "+CMGR: \"REC UNREAD\",\"+12025550123\",,\"23/01/01,12:00:00+02\"";

    #[derive(Default)]
    struct Inbox {
        messages: RefCell<Vec<ReceivedSms>>,
    }

    impl EventHandler for Inbox {
        async fn incoming_call<M: RawMutex, A: AtSender>(&self, call: Call<'_, M, A>) {
            if call.number() == Some("+12025550123") {
                call.answer().await.unwrap();
            }
        }

        async fn sms_received(&self, sms: ReceivedSms) {
            self.messages.borrow_mut().push(sms);
        }
    }

    #[test]
    fn bring_up_then_handle_notifications() {
        init_logger();
        let resources = Resources::<NoopRawMutex, 4>::new();
        let log = RefCell::new(Vec::new());
        let at = resources.command_channel(MockModem::new(&resources.res_slot, &log, |cmd| {
            match cmd {
                "AT+CMGR=1" => Some(vec![HEADER, "Hello", "World", "OK"]),
                _ => Some(vec!["OK"]),
            }
        }));
        let events = Inbox::default();
        let (control, runner, urc_handler) = new(&resources, &at, DefaultConfig, &events);

        block_on(runner.init()).unwrap();
        assert!(control.capabilities().caller_id);
        log.borrow_mut().clear();

        let mut ingress = resources.ingress();
        ingress.write(b"\r\n+CRING: VOICE\r\n\r\n+CLIP: \"+12025550123\",145,,,\"\"\r\n");
        ingress.write(b"\r\n+CMTI: \"SM\",1\r\n");

        // Two workers
        block_on(select(
            join(urc_handler.run(), urc_handler.run()),
            Timer::after(Duration::from_millis(50)),
        ));

        let calls = control.active_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].state(), CallState::Answered);
        assert_eq!(calls[0].name(), None);

        let messages = events.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "Hello\nWorld");

        let sent = log.borrow();
        assert!(sent.contains(&String::from("ATA")));
        let read = sent.iter().position(|c| c == "AT+CMGR=1").unwrap();
        let delete = sent.iter().position(|c| c == "AT+CMGD=1").unwrap();
        assert!(read < delete);
    }
}
