//! STOMP 1.1 command builders.
//!
//! Headers are written `name:value` with no padding. Subscriptions are
//! addressed by `id`; ACK and NACK carry the `subscription` they belong to.

use std::fmt;

use super::{non_empty, required, transaction_or_random, AckMode, HeartBeat};
use crate::error::Result;

/// Content type used by [`send`] when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// CONNECT, advertising version 1.1 for a virtual host.
pub fn connect(login: &str, passcode: &str, host: &str, heart_beat: HeartBeat) -> String {
    format!(
        "CONNECT\naccept-version:1.1\nhost:{}\nheart-beat:{}\nlogin:{}\npasscode:{}\n\n\x00\n",
        host, heart_beat, login, passcode
    )
}

/// SEND a text body.
///
/// `content_type` defaults to [`DEFAULT_CONTENT_TYPE`].
pub fn send(
    destination: &str,
    body: &str,
    transaction: Option<&str>,
    content_type: Option<&str>,
) -> Result<String> {
    let destination = required("destination", destination)?;
    let content_type = non_empty(content_type).unwrap_or(DEFAULT_CONTENT_TYPE);
    let trans_header = match non_empty(transaction) {
        Some(tx) => format!("transaction:{}\n", tx),
        None => String::new(),
    };
    Ok(format!(
        "SEND\ndestination:{}\ncontent-type:{}\n{}\n{}\x00\n",
        destination, content_type, trans_header, body
    ))
}

/// SUBSCRIBE to a destination under subscription `id`.
pub fn subscribe(destination: &str, id: impl fmt::Display, ack: AckMode) -> Result<String> {
    let destination = required("destination", destination)?;
    Ok(format!(
        "SUBSCRIBE\nid:{}\ndestination:{}\nack:{}\n\n\x00\n",
        id, destination, ack
    ))
}

/// UNSUBSCRIBE subscription `id`.
pub fn unsubscribe(id: impl fmt::Display) -> Result<String> {
    let id = id.to_string();
    let id = required("id", &id)?;
    Ok(format!("UNSUBSCRIBE\nid:{}\n\n\x00\n", id))
}

/// ACK a message received on `subscription`.
pub fn ack(message_id: &str, subscription: &str, transaction: Option<&str>) -> Result<String> {
    acknowledge("ACK", message_id, subscription, transaction)
}

/// NACK a message received on `subscription`.
pub fn nack(message_id: &str, subscription: &str, transaction: Option<&str>) -> Result<String> {
    acknowledge("NACK", message_id, subscription, transaction)
}

fn acknowledge(
    cmd: &str,
    message_id: &str,
    subscription: &str,
    transaction: Option<&str>,
) -> Result<String> {
    let message_id = required("message-id", message_id)?;
    let subscription = required("subscription", subscription)?;
    let mut header = format!("subscription:{}\nmessage-id:{}", subscription, message_id);
    if let Some(tx) = non_empty(transaction) {
        header.push_str("\ntransaction:");
        header.push_str(tx);
    }
    Ok(format!("{}\n{}\n\n\x00\n", cmd, header))
}

/// BEGIN a transaction. A random id is generated when none is given.
pub fn begin(transaction: Option<&str>) -> String {
    format!(
        "BEGIN\ntransaction:{}\n\n\x00\n",
        transaction_or_random(transaction)
    )
}

/// COMMIT a transaction.
pub fn commit(transaction: &str) -> Result<String> {
    let transaction = required("transaction", transaction)?;
    Ok(format!("COMMIT\ntransaction:{}\n\n\x00\n", transaction))
}

/// ABORT a transaction.
pub fn abort(transaction: &str) -> Result<String> {
    let transaction = required("transaction", transaction)?;
    Ok(format!("ABORT\ntransaction:{}\n\n\x00\n", transaction))
}

/// DISCONNECT, optionally asking for a receipt.
///
/// With a receipt the header block is closed by a single newline.
pub fn disconnect(receipt: Option<&str>) -> String {
    match non_empty(receipt) {
        Some(receipt) => format!("DISCONNECT\nreceipt:{}\n\x00\n", receipt),
        None => "DISCONNECT\n\n\x00\n".to_string(),
    }
}
