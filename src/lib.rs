//! Minimal websocket server engine for small devices.
//!
//! ## Features
//! - Fixed pool of connection slots, no heap growth per frame.
//! - Single, unfragmented frames of up to 125 bytes.
//! - Poll driven, single threaded, no background task.
//! - Runs on any byte-stream [`Transport`](transport::Transport).
//!
//! ## High-level API
//!
//! - [`engine`]
//! - [`transport`]
//! - [`config`]
//!
//! ```ignore
//! {
//!     let transport = TcpTransport::bind(&config)?;
//!     let mut engine: Engine<_> = Engine::new(transport, config);
//!
//!     loop {
//!         match engine.poll() {
//!             Outcome::MessageReceived { slot, payload, .. } => {
//!                 engine.send_binary(slot, &payload)?;
//!             }
//!             Outcome::CapacityExhausted(handle) => engine.transport_mut().reject(&handle),
//!             _ => {}
//!         }
//!     }
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`frame`]
//! - [`handshake`]
//! - [`slot`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // write a server frame
//!     frame::encode(&mut stream, OpCode::Text, b"hello")?;
//!
//!     // read a client frame, unmasked
//!     let frame = frame::decode(&mut stream)?;
//! }
//! ```
//!
//! Handshake:
//!
//! ```ignore
//! {
//!     // read the upgrade request, answer 101
//!     let accepted = handshake::perform(&mut stream, Some("chat"))?;
//! }
//! ```

pub mod error;
pub mod frame;
pub mod handshake;
pub mod slot;
pub mod transport;
pub mod config;
pub mod engine;

pub use config::Config;
pub use engine::{Engine, Handler, Outcome};
pub use error::Error;
pub use frame::{CloseCode, OpCode, Payload};
pub use slot::State;
