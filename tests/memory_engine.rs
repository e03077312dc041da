use slotws::engine::{Engine, Outcome};
use slotws::error::{Error, FrameError, HandshakeError};
use slotws::frame::{self, Frame, OpCode, MAX_PAYLOAD_LEN};
use slotws::transport::memory::{MemoryHandle, MemoryTransport};
use slotws::{Config, State};

const REQUEST_LINES: [&str; 6] = [
    "GET /chat HTTP/1.1",
    "Host: server.example.com",
    "Upgrade: websocket",
    "Connection: Upgrade",
    "Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==",
    "Sec-WebSocket-Version: 13",
];

fn init() { let _ = env_logger::builder().is_test(true).try_init(); }

fn request(skip: Option<usize>, extra: &[&str]) -> Vec<u8> {
    let mut s = String::new();
    for (i, line) in REQUEST_LINES.iter().chain(extra.iter()).enumerate() {
        if Some(i) != skip {
            s.push_str(line);
            s.push_str("\r\n");
        }
    }
    s.push_str("\r\n");
    s.into_bytes()
}

fn masked(opcode: OpCode, payload: &[u8]) -> Vec<u8> {
    let mut wire = Vec::new();
    Frame::new(opcode, payload)
        .unwrap()
        .encode_masked(&mut wire, frame::mask::new_rand_key())
        .unwrap();
    wire
}

fn connect<const N: usize>(engine: &mut Engine<MemoryTransport, N>) -> (usize, MemoryHandle) {
    let h = engine.transport_mut().connect();
    engine.transport_mut().push(&h, &request(None, &[]));
    match engine.poll() {
        Outcome::Connected { slot, .. } => (slot, h),
        o => panic!("unexpected {:?}", o),
    }
}

#[test]
fn rfc_accept_value() {
    init();
    let mut engine: Engine<_> = Engine::new(MemoryTransport::new(), Config::new());
    let (_, h) = connect(&mut engine);

    let response = engine.transport_mut().take_output(&h);
    assert_eq!(
        response,
        b"HTTP/1.1 101 Switching Protocols\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n"
    );
}

#[test]
fn subprotocol_advertised_on_request() {
    init();
    let config = Config::new().with_subprotocol("chat");
    let mut engine: Engine<_> = Engine::new(MemoryTransport::new(), config);

    let h = engine.transport_mut().connect();
    engine
        .transport_mut()
        .push(&h, &request(None, &["Sec-WebSocket-Protocol: chat, superchat"]));
    assert!(matches!(
        engine.poll(),
        Outcome::Connected {
            subprotocol_requested: true,
            ..
        }
    ));

    let response = engine.transport_mut().take_output(&h);
    assert!(response.ends_with(b"Sec-WebSocket-Protocol: chat\r\n\r\n"));
}

#[test]
fn pipelined_request_and_frames() {
    init();
    let mut engine = Engine::<_, 2>::new(MemoryTransport::new(), Config::new());
    let h = engine.transport_mut().connect();

    // handshake and two frames in a single write
    let wire = [
        request(None, &[]),
        masked(OpCode::Text, b"one"),
        masked(OpCode::Binary, b"two"),
    ]
    .concat();
    engine.transport_mut().push(&h, &wire);

    assert!(matches!(
        engine.poll(),
        Outcome::Connected {
            slot: 0,
            subprotocol_requested: false,
            ..
        }
    ));
    for (opcode, data) in [(OpCode::Text, b"one"), (OpCode::Binary, b"two")] {
        match engine.poll() {
            Outcome::MessageReceived {
                slot: 0,
                opcode: op,
                payload,
            } => {
                assert_eq!(op, opcode);
                assert_eq!(&*payload, data);
            }
            o => panic!("unexpected {:?}", o),
        }
    }
    assert_eq!(engine.transport().pending_input(&h), 0);
    assert!(matches!(engine.poll(), Outcome::NoEvent));
    assert_eq!(engine.state(0), Some(State::Open));
}

#[test]
fn missing_mandatory_header() {
    init();
    for skip in 0..REQUEST_LINES.len() {
        let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
        let h = engine.transport_mut().connect();
        engine.transport_mut().push(&h, &request(Some(skip), &[]));

        match engine.poll() {
            Outcome::ProtocolError {
                slot: 0,
                reason: Error::Handshake(HandshakeError::MissingHeaders(seen)),
            } => assert_eq!(seen.missing().bits().count_ones(), 1),
            o => panic!("unexpected {:?}", o),
        }
        assert_eq!(engine.state(0), Some(State::Closed));
        assert!(engine.transport_mut().take_output(&h).is_empty());
    }
}

#[test]
fn over_length_header_line() {
    init();
    let long = format!("Cookie: {}", "x".repeat(200));
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let h = engine.transport_mut().connect();
    engine.transport_mut().push(&h, &request(None, &[long.as_str()]));

    match engine.poll() {
        Outcome::ProtocolError {
            reason: Error::Handshake(HandshakeError::LineTooLong),
            ..
        } => {}
        o => panic!("unexpected {:?}", o),
    }
    assert_eq!(engine.state(0), Some(State::Closed));
}

#[test]
fn echo_every_length() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (slot, h) = connect(&mut engine);
    engine.transport_mut().take_output(&h);

    for len in 0..=MAX_PAYLOAD_LEN {
        let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
        engine.transport_mut().push(&h, &masked(OpCode::Binary, &data));

        let payload = match engine.poll() {
            Outcome::MessageReceived { slot: s, payload, .. } if s == slot => payload,
            o => panic!("unexpected {:?}", o),
        };
        assert_eq!(&*payload, data.as_slice());

        engine.send_binary(slot, &payload).unwrap();
        let out = engine.transport_mut().take_output(&h);
        assert_eq!(out[1] as usize, len);
        assert_eq!(&out[2..], data.as_slice());
    }
}

#[test]
fn close_once() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (slot, h) = connect(&mut engine);
    engine.transport_mut().take_output(&h);

    engine.transport_mut().push(&h, &masked(OpCode::Close, &[0x03, 0xe8]));
    assert!(matches!(engine.poll(), Outcome::Closed { slot: 0 }));
    assert_eq!(engine.state(slot), Some(State::Closed));

    // exactly one close frame with 1000
    assert_eq!(engine.transport_mut().take_output(&h), [0x88, 0x02, 0x03, 0xe8]);

    engine.transport_mut().notify(&h);
    assert!(matches!(engine.poll(), Outcome::NoEvent));
    assert!(engine.transport_mut().take_output(&h).is_empty());
}

#[test]
fn capacity_with_single_slot() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (slot, first) = connect(&mut engine);

    let second = engine.transport_mut().connect();
    engine.transport_mut().push(&second, &request(None, &[]));
    assert!(matches!(engine.poll(), Outcome::CapacityExhausted(h) if h == second));
    assert_eq!(engine.state(slot), Some(State::Open));

    // the first connection keeps working
    engine.transport_mut().push(&first, &masked(OpCode::Text, b"ok"));
    assert!(matches!(engine.poll(), Outcome::MessageReceived { slot: 0, .. }));

    // free the slot, the second client now gets it
    engine.transport_mut().push(&first, &masked(OpCode::Close, b""));
    assert!(matches!(engine.poll(), Outcome::Closed { slot: 0 }));
    engine.transport_mut().notify(&second);
    assert!(matches!(engine.poll(), Outcome::Connected { slot: 0, .. }));
}

#[test]
fn fragmented_frame_closes_slot() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (slot, h) = connect(&mut engine);

    // fin clear, the rest is a valid masked text frame
    let mut wire = masked(OpCode::Text, b"first half");
    wire[0] = OpCode::Text.to_flag();
    engine.transport_mut().push(&h, &wire);

    match engine.poll() {
        Outcome::ProtocolError {
            reason: Error::Frame(FrameError::Fragmented),
            ..
        } => {}
        o => panic!("unexpected {:?}", o),
    }
    assert_eq!(engine.state(slot), Some(State::Closed));
    assert!(engine.transport().is_closed(&h));
}

#[test]
fn extended_length_closes_slot() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (slot, h) = connect(&mut engine);

    engine.transport_mut().push(&h, &[0x82, 0xfe, 0x01, 0x00]);
    match engine.poll() {
        Outcome::ProtocolError {
            reason: Error::Frame(e),
            ..
        } => assert!(e.is_unsupported_framing()),
        o => panic!("unexpected {:?}", o),
    }
    assert_eq!(engine.state(slot), Some(State::Closed));
}

#[test]
fn unmasked_client_frame_tolerated() {
    init();
    let mut engine = Engine::<_, 1>::new(MemoryTransport::new(), Config::new());
    let (_, h) = connect(&mut engine);

    engine.transport_mut().push(&h, b"\x81\x05plain");
    match engine.poll() {
        Outcome::MessageReceived { payload, .. } => assert_eq!(payload.as_str(), Some("plain")),
        o => panic!("unexpected {:?}", o),
    }
}
