use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{
    client::AtSender,
    state::{Capabilities, State},
};
use crate::{
    command::{call_control, control, mobile_control, sms, Command},
    config::ModemConfig,
    error::Error,
};

/// Brings the modem into the configuration the driver relies on.
///
/// Call `.init()` once the serial port is connected and the line reader is
/// running.
pub struct Runner<'a, M: RawMutex, A: AtSender, C: ModemConfig> {
    state: &'a State<M>,
    at: &'a A,
    _config: C,
}

impl<'a, M: RawMutex, A: AtSender, C: ModemConfig> Runner<'a, M, A, C> {
    pub(crate) fn new(state: &'a State<M>, at: &'a A, config: C) -> Self {
        Self {
            state,
            at,
            _config: config,
        }
    }

    pub async fn init(&self) -> Result<(), Error> {
        debug!("Initializing modem");

        self.at.send(&control::RESET_CONFIGURATION).await?;
        self.at.send(&control::ECHO_OFF).await?;
        self.at.send(&mobile_control::SET_FULL_FUNCTIONALITY).await?;
        self.at.send(&mobile_control::ENABLE_NUMERIC_ERRORS).await?;

        // Not every modem knows +WIND
        let res = self.at.send(&control::DISABLE_VENDOR_INDICATIONS).await?;
        if res.last().is_some_and(|l| l.contains("ERROR")) {
            debug!("Vendor indications not supported, ignoring");
        }

        self.at.send(&sms::SET_TEXT_MODE).await?;
        self.at.send(&sms::REQUEST_DELIVERY_REPORTS).await?;
        self.at.send(&sms::SET_MESSAGE_STORAGE).await?;
        self.at.send(&sms::SET_NEW_MESSAGE_INDICATIONS).await?;

        let mut capabilities = Capabilities::default();
        if C::CALLER_ID {
            capabilities.caller_id = self.try_enable(&call_control::ENABLE_CALLER_ID).await?;
            if !capabilities.caller_id {
                warn!("Caller ID not supported by modem");
            } else if C::EXTENDED_RING {
                capabilities.extended_ring =
                    self.try_enable(&call_control::ENABLE_EXTENDED_RING).await?;
                if !capabilities.extended_ring {
                    warn!("Extended incoming call indication not supported by modem");
                }
            }
        }
        self.state.set_capabilities(capabilities);

        self.at.send(&call_control::ENABLE_HANGUP_BY_ATH).await?;

        info!("Modem initialized: {:?}", capabilities);
        Ok(())
    }

    /// Send an optional setting. A rejection disables the feature, anything
    /// else is fatal.
    async fn try_enable(&self, cmd: &Command<'_>) -> Result<bool, Error> {
        match self.at.send(cmd).await {
            Ok(_) => Ok(true),
            Err(Error::Command(e)) => {
                debug!("{:?} rejected: {:?}", cmd.text, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod test {
    use core::cell::RefCell;
    use std::{string::String, vec, vec::Vec};

    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;
    use crate::{
        asynch::client::{CommandChannel, ResponseSlot},
        config::DefaultConfig,
        error::CommandError,
        test_helpers::{init_logger, MockModem},
    };

    const BASE: [&str; 9] = [
        "ATZ",
        "ATE0",
        "AT+CFUN=1",
        "AT+CMEE=1",
        "AT+WIND=0",
        "AT+CMGF=1",
        "AT+CSMP=49,167",
        "AT+CPMS=\"SM\",\"SM\",\"SR\"",
        "AT+CNMI=2,1,0,2",
    ];

    fn expected(optional: &[&str]) -> Vec<String> {
        BASE.iter()
            .chain(optional)
            .chain(["AT+CVHU=0"].iter())
            .map(|s| String::from(*s))
            .collect()
    }

    #[test]
    fn full_bring_up() {
        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(MockModem::new(&slot, &log, |_| Some(vec!["OK"])), &slot);
        let state = State::<NoopRawMutex>::new();

        block_on(Runner::new(&state, &at, DefaultConfig).init()).unwrap();

        assert_eq!(*log.borrow(), expected(&["AT+CLIP=1", "AT+CRC=1"]));
        assert_eq!(
            state.capabilities(),
            Capabilities {
                caller_id: true,
                extended_ring: true,
            }
        );
    }

    #[test]
    fn rejected_caller_id_skips_extended_ring() {
        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(
            MockModem::new(&slot, &log, |cmd| match cmd {
                "AT+CLIP=1" => Some(vec!["ERROR"]),
                _ => Some(vec!["OK"]),
            }),
            &slot,
        );
        let state = State::<NoopRawMutex>::new();

        block_on(Runner::new(&state, &at, DefaultConfig).init()).unwrap();

        assert_eq!(*log.borrow(), expected(&["AT+CLIP=1"]));
        assert_eq!(state.capabilities(), Capabilities::default());
    }

    #[test]
    fn rejected_extended_ring_keeps_caller_id() {
        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(
            MockModem::new(&slot, &log, |cmd| match cmd {
                "AT+CRC=1" => Some(vec!["+CME ERROR: 4"]),
                _ => Some(vec!["OK"]),
            }),
            &slot,
        );
        let state = State::<NoopRawMutex>::new();

        block_on(Runner::new(&state, &at, DefaultConfig).init()).unwrap();

        assert_eq!(
            state.capabilities(),
            Capabilities {
                caller_id: true,
                extended_ring: false,
            }
        );
    }

    #[test]
    fn unsupported_vendor_indications_are_ignored() {
        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(
            MockModem::new(&slot, &log, |cmd| match cmd {
                "AT+WIND=0" => Some(vec!["+CME ERROR: 3"]),
                _ => Some(vec!["OK"]),
            }),
            &slot,
        );
        let state = State::<NoopRawMutex>::new();

        block_on(Runner::new(&state, &at, DefaultConfig).init()).unwrap();

        assert_eq!(*log.borrow(), expected(&["AT+CLIP=1", "AT+CRC=1"]));
    }

    #[test]
    fn mandatory_step_failure_aborts() {
        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(
            MockModem::new(&slot, &log, |cmd| match cmd {
                "AT+CMGF=1" => Some(vec!["+CMS ERROR: 302"]),
                _ => Some(vec!["OK"]),
            }),
            &slot,
        );
        let state = State::<NoopRawMutex>::new();

        let res = block_on(Runner::new(&state, &at, DefaultConfig).init());

        assert!(matches!(res, Err(Error::Command(CommandError { .. }))));
        assert_eq!(log.borrow().last().map(String::as_str), Some("AT+CMGF=1"));
    }

    #[test]
    fn caller_id_can_be_disabled() {
        struct NoCallerId;
        impl ModemConfig for NoCallerId {
            const CALLER_ID: bool = false;
        }

        init_logger();
        let slot = ResponseSlot::<NoopRawMutex>::new();
        let log = RefCell::new(Vec::new());
        let at = CommandChannel::new(MockModem::new(&slot, &log, |_| Some(vec!["OK"])), &slot);
        let state = State::<NoopRawMutex>::new();

        block_on(Runner::new(&state, &at, NoCallerId).init()).unwrap();

        assert_eq!(*log.borrow(), expected(&[]));
        assert_eq!(state.capabilities(), Capabilities::default());
    }
}
