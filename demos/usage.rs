//! Usage walkthrough - a client session without a real transport.
//!
//! This example demonstrates:
//! - Building CONNECT and SUBSCRIBE text for a broker
//! - Feeding received bytes through a `StreamBuffer`
//! - Reacting to CONNECTED and MESSAGE with the default engine
//! - Overriding the MESSAGE handler while keeping the default ACK
//! - Sending with the builder and with a hand-assembled `Frame`
//!
//! # Running
//!
//! ```text
//! cargo run --example usage
//! ```

use stompwire::builder::{v10, AckMode};
use stompwire::config::SessionConfig;
use stompwire::engine::Engine;
use stompwire::protocol::{Dialect, Frame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::new(Dialect::V1_0, "bob", "1234");
    let mut buffer = config.stream_buffer();
    let mut engine = config.engine();

    // Would be written to the socket.
    println!("-> {:?}", config.connect_frame());

    // Broker answers in two reads.
    let reads: [&[u8]; 2] = [
        b"CONNECTED\nsession:ID:snorky.local-49191-1185461",
        b"799654-3:18\n\n\x00\n",
    ];
    for read in reads {
        for frame in buffer.push(read) {
            let reply = engine.react(&frame)?;
            println!("<- {} (reply: {:?})", frame.cmd, reply);
        }
    }
    println!("session: {}", engine.session_id());

    println!("-> {:?}", v10::subscribe("/queue/a", AckMode::Client)?);

    let delivery = b"MESSAGE\ndestination:/queue/a\nmessage-id:card_data\n\nhello queue a\x00\n";
    for frame in buffer.push(delivery) {
        println!("-> {:?}", engine.react(&frame)?);
    }

    // Custom handler: log the body, then send the usual ACK.
    let mut custom = Engine::builder(Dialect::V1_0)
        .on_message(|ctx, frame| {
            println!("custom handler got {:?}", frame.body_text());
            ctx.ack(frame)
        })
        .build();
    println!("-> {:?}", custom.react(&delivery[..])?);

    println!("-> {:?}", v10::send("/queue/a", "hello there", None)?);

    let mut frame = Frame::with_command(Dialect::V1_0, "send")?;
    frame.set_header("destination", "/queue/a");
    frame.set_header("persistent", "true");
    frame.set_body("hello with custom headers");
    println!("-> {:?}", String::from_utf8_lossy(&frame.pack()?));

    println!("-> {:?}", v10::disconnect());

    Ok(())
}
