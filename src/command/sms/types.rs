//! Message types used by Short Messages Service Commands and Responses
use heapless::String;

use crate::{error::Error, MAX_NUMBER_LEN, MAX_SMS_LEN};

/// An SMS message that can be sent (MO)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sms {
    number: String<MAX_NUMBER_LEN>,
    text: String<MAX_SMS_LEN>,
}

impl Sms {
    pub fn new(number: &str, text: &str) -> Result<Self, Error> {
        Ok(Self {
            number: String::try_from(number).map_err(|_| Error::Overflow)?,
            text: String::try_from(text).map_err(|_| Error::Overflow)?,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An SMS message that has been received (MT)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedSms {
    sms: Sms,
    status: String<16>,
    time: String<32>,
}

impl ReceivedSms {
    pub fn new(status: &str, number: &str, time: &str, text: &str) -> Result<Self, Error> {
        Ok(Self {
            sms: Sms::new(number, text)?,
            status: String::try_from(status).map_err(|_| Error::Overflow)?,
            time: String::try_from(time).map_err(|_| Error::Overflow)?,
        })
    }

    /// Storage status, e.g. `REC UNREAD`
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sender number
    pub fn number(&self) -> &str {
        self.sms.number()
    }

    /// Service centre time stamp, `yy/MM/dd,hh:mm:ss±zz`
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn text(&self) -> &str {
        self.sms.text()
    }

    pub fn sms(&self) -> &Sms {
        &self.sms
    }
}

impl From<ReceivedSms> for Sms {
    fn from(received: ReceivedSms) -> Self {
        received.sms
    }
}
