//! STOMP 1.0 command builders.
//!
//! Formats match what 1.0 brokers have historically received from this
//! family of clients, byte for byte: most headers are written `name: value`
//! with a space, except CONNECT and UNSUBSCRIBE.

use super::{non_empty, required, transaction_or_random, AckMode};
use crate::error::Result;

/// CONNECT with login credentials.
///
/// The broker answers with CONNECTED carrying the session id.
pub fn connect(login: &str, passcode: &str) -> String {
    format!("CONNECT\nlogin:{}\npasscode:{}\n\n\x00\n", login, passcode)
}

/// SEND a text body to a destination, optionally inside a transaction.
pub fn send(destination: &str, body: &str, transaction: Option<&str>) -> Result<String> {
    let destination = required("destination", destination)?;
    let trans_header = match non_empty(transaction) {
        Some(tx) => format!("transaction: {}\n", tx),
        None => String::new(),
    };
    Ok(format!(
        "SEND\ndestination: {}\n{}\n{}\x00\n",
        destination, trans_header, body
    ))
}

/// SUBSCRIBE to a destination.
pub fn subscribe(destination: &str, ack: AckMode) -> Result<String> {
    let destination = required("destination", destination)?;
    Ok(format!(
        "SUBSCRIBE\ndestination: {}\nack: {}\n\n\x00\n",
        destination, ack
    ))
}

/// UNSUBSCRIBE from a destination.
pub fn unsubscribe(destination: &str) -> Result<String> {
    let destination = required("destination", destination)?;
    Ok(format!("UNSUBSCRIBE\ndestination:{}\n\n\x00\n", destination))
}

/// ACK a received message, optionally inside a transaction.
pub fn ack(message_id: &str, transaction: Option<&str>) -> Result<String> {
    let message_id = required("message-id", message_id)?;
    let header = match non_empty(transaction) {
        Some(tx) => format!("message-id: {}\ntransaction: {}", message_id, tx),
        None => format!("message-id: {}", message_id),
    };
    Ok(format!("ACK\n{}\n\n\x00\n", header))
}

/// BEGIN a transaction. A random id is generated when none is given.
pub fn begin(transaction: Option<&str>) -> String {
    format!(
        "BEGIN\ntransaction: {}\n\n\x00\n",
        transaction_or_random(transaction)
    )
}

/// COMMIT a transaction.
pub fn commit(transaction: &str) -> Result<String> {
    let transaction = required("transaction", transaction)?;
    Ok(format!("COMMIT\ntransaction: {}\n\n\x00\n", transaction))
}

/// ABORT (roll back) a transaction.
pub fn abort(transaction: &str) -> Result<String> {
    let transaction = required("transaction", transaction)?;
    Ok(format!("ABORT\ntransaction: {}\n\n\x00\n", transaction))
}

/// DISCONNECT.
pub fn disconnect() -> String {
    "DISCONNECT\n\n\x00\n".to_string()
}
