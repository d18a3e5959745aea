//! Integration tests for stompwire.
//!
//! These tests drive the stream buffer, the engine and the builders
//! together, the way a transport would.

use stompwire::builder::{v10, v11, AckMode};
use stompwire::engine::{Engine, EngineEvent, RecordingObserver};
use stompwire::protocol::{unpack_frame, Command, Dialect, Frame, StreamBuffer};
use std::sync::Arc;

/// Server-side MESSAGE frame as a broker would send it.
fn server_message(dialect: Dialect, id: &str, body: &[u8], declare_length: bool) -> Vec<u8> {
    let mut frame = Frame::with_command(dialect, "MESSAGE").unwrap();
    frame.set_header("destination", "/queue/a");
    frame.set_header("message-id", id);
    if dialect == Dialect::V1_1 {
        frame.set_header("subscription", "0");
    }
    if declare_length {
        frame.set_header("content-length", body.len().to_string());
    }
    frame.set_body(body.to_vec());
    frame.pack().unwrap().to_vec()
}

/// Test a full v1.0 session: connect, receive, ack.
#[test]
fn test_session_v10() {
    let mut buffer = StreamBuffer::new(Dialect::V1_0);
    let mut engine = Engine::new(Dialect::V1_0);

    assert_eq!(
        v10::connect("bob", "1234"),
        "CONNECT\nlogin:bob\npasscode:1234\n\n\x00\n"
    );

    let mut incoming = b"CONNECTED\nsession:ID:snorky.local-49191-1185461799654-3:18\n\n\x00\n".to_vec();
    incoming.extend(server_message(Dialect::V1_0, "M1", b"hello queue a", false));

    let mut replies = Vec::new();
    for frame in buffer.push(&incoming) {
        replies.push(engine.react(&frame).unwrap());
    }

    assert_eq!(engine.session_id(), "ID:snorky.local-49191-1185461799654-3:18");
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0], "");
    assert!(replies[1].contains("message-id: M1"));
    assert_eq!(replies[1], "ACK\nmessage-id: M1\n\n\x00\n");
}

/// Test a full v1.1 session with binary payloads split across reads.
#[test]
fn test_session_v11_fragmented_binary() {
    let mut buffer = StreamBuffer::new(Dialect::V1_1);
    let mut engine = Engine::new(Dialect::V1_1);

    let body = b"\x00\x01binary\x00\nwith\n\nseparators\x00\n";
    let mut incoming = b"CONNECTED\nversion:1.1\nsession:S-1\n\n\x00\n".to_vec();
    incoming.extend(server_message(Dialect::V1_1, "M1", body, true));
    incoming.extend(server_message(Dialect::V1_1, "M2", b"text", false));

    let mut frames = Vec::new();
    for chunk in incoming.chunks(7) {
        frames.extend(buffer.push(chunk));
    }
    assert!(buffer.buffer_is_empty());
    assert_eq!(frames.len(), 3);

    assert_eq!(frames[1].command(), Some(Command::Message));
    assert_eq!(&frames[1].body[..], &body[..]);
    assert_eq!(&frames[2].body[..], b"text");

    let replies: Vec<String> = frames
        .iter()
        .map(|frame| engine.react(frame).unwrap())
        .collect();

    assert_eq!(engine.session_id(), "S-1");
    assert_eq!(
        replies,
        vec![
            String::new(),
            "ACK\nsubscription:0\nmessage-id:M1\n\n\x00\n".to_string(),
            "ACK\nsubscription:0\nmessage-id:M2\n\n\x00\n".to_string(),
        ]
    );
}

/// Test that a corrupted frame is dropped and the stream recovers.
#[test]
fn test_corruption_recovery() {
    let mut buffer = StreamBuffer::new(Dialect::V1_0);
    let mut engine = Engine::new(Dialect::V1_0);

    let good = server_message(Dialect::V1_0, "M2", b"kept", false);
    let mut lost = server_message(Dialect::V1_0, "M1", b"lost", false);
    lost.drain(..4);

    let mut data = lost;
    data.extend_from_slice(&good);

    let frames = buffer.push(&data);
    assert_eq!(frames.len(), 1);
    assert_eq!(
        engine.react(&frames[0]).unwrap(),
        "ACK\nmessage-id: M2\n\n\x00\n"
    );
}

/// Test the observer sees errors and receipts.
#[test]
fn test_error_and_receipt_events() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut engine = Engine::builder(Dialect::V1_0)
        .observer(recorder.clone())
        .build();
    let mut buffer = StreamBuffer::new(Dialect::V1_0);

    buffer.append_data(b"ERROR\nmessage:some error\n\nThere was a problem with your last message\n\x00\n");
    buffer.append_data(b"RECEIPT\nreceipt-id:77\n\n\x00\n");

    while let Some(frame) = buffer.get_one_message() {
        assert_eq!(engine.react(&frame).unwrap(), "");
    }

    assert_eq!(
        recorder.events(),
        vec![
            EngineEvent::Error {
                message: "some error".into(),
                body: "There was a problem with your last message\n".into(),
            },
            EngineEvent::Receipt {
                receipt_id: "77".into(),
                body: String::new(),
            },
        ]
    );
}

/// Test builder output survives a trip through the stream buffer.
#[test]
fn test_builder_output_through_buffer() {
    let outgoing = [
        v11::connect("bob", "123", "localhost", Default::default()),
        v11::subscribe("/queue/a", 1, AckMode::ClientIndividual).unwrap(),
        v11::send("/queue/a", "hello", Some("tx1"), None).unwrap(),
        v11::nack("m1", "1", None).unwrap(),
        v11::unsubscribe(1).unwrap(),
        v11::disconnect(None),
    ];

    let mut buffer = StreamBuffer::new(Dialect::V1_1);
    for text in &outgoing {
        buffer.append_data(text.as_bytes());
    }

    let frames = buffer.push(&[]);
    let commands: Vec<_> = frames.iter().filter_map(|f| f.command()).collect();
    assert_eq!(
        commands,
        vec![
            Command::Connect,
            Command::Subscribe,
            Command::Send,
            Command::Nack,
            Command::Unsubscribe,
            Command::Disconnect,
        ]
    );
    assert_eq!(frames[2].header("transaction"), Some("tx1"));
    assert_eq!(frames[2].header("content-type"), Some("text/plain"));
    assert_eq!(&frames[2].body[..], b"hello");
}

/// Test parsed buffer output and unpack_frame agree on text frames.
#[test]
fn test_buffer_and_parser_agree() {
    let text = server_message(Dialect::V1_0, "M1", b"hello queue a", false);

    let mut buffer = StreamBuffer::new(Dialect::V1_0);
    buffer.append_data(&text);
    let from_buffer = buffer.get_one_message().unwrap();
    let from_parser = unpack_frame(&text);

    assert_eq!(from_buffer, from_parser);
}
