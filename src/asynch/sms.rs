use super::client::AtSender;
use crate::{
    command::{
        sms::{self, responses::parse_read_message, types::ReceivedSms, urc::NewMessageIndication},
        Command,
    },
    error::Error,
};

/// Fetch the message announced by a `+CMTI` line and free its storage slot.
///
/// The message is deleted from the modem before it is returned, so a
/// failure to read or parse it leaves it stored.
pub(crate) async fn receive<A: AtSender>(at: &A, indication: &str) -> Result<ReceivedSms, Error> {
    let NewMessageIndication { index, .. } = NewMessageIndication::parse(indication)?;
    debug!("New message at index {}", index);

    let read = sms::read_message(index)?;
    let lines = at.send(&Command::new(&read)).await?;
    let message = parse_read_message(&lines)?;

    let delete = sms::delete_message(index)?;
    at.send(&Command::new(&delete)).await?;

    Ok(message)
}

/// Submit a text message.
pub(crate) async fn send<A: AtSender>(at: &A, destination: &str, text: &str) -> Result<(), Error> {
    let line = sms::send_message(destination, text)?;
    at.send(&sms::submit_message(&line)).await?;
    Ok(())
}
