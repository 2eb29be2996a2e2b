//! Drives `Connection`/`Session`/`Link` through a full handshake without a
//! socket, exercising §8's end-to-end scenario: Open -> Begin -> Attach ->
//! (peer Flow, credit=1) -> Transfer -> Detach -> End -> Close.

use argon::{Connection, EndpointState, Event};
use argon_codec::Value;
use argon_types::messaging::{Message, Target};
use argon_types::performatives::{Attach, Begin, Close, Flow, Open};
use argon_types::{Frame, Performative};

fn peer_echoes_open(connection: &mut Connection) {
    let sent = connection.take_outbound();
    assert_eq!(sent.len(), 1);
    assert!(matches!(sent[0].performative, Performative::Open(_)));
    let events = connection.receive(Frame::new(0, Performative::Open(Open::new("peer")))).unwrap();
    assert_eq!(events, vec![Event::ConnectionOpened]);
}

#[test]
fn full_session_ends_with_clean_close_and_no_residual_frames() {
    let mut connection = Connection::new(Some("client".to_string()));

    connection.open();
    peer_echoes_open(&mut connection);
    assert_eq!(connection.state(), EndpointState::Opened);

    let channel = connection.begin_session();
    let begin_sent = connection.take_outbound();
    assert_eq!(begin_sent.len(), 1);
    let events = connection
        .receive(Frame::new(channel, Performative::Begin(Begin::new(0, u32::MAX, u32::MAX))))
        .unwrap();
    assert_eq!(events, vec![Event::SessionOpened { channel }]);

    let handle = connection.attach_sender(channel, "sender-1", Target::new("queue.a")).unwrap();
    let attach_sent = connection.take_outbound();
    assert_eq!(attach_sent.len(), 1);
    let events = connection
        .receive(Frame::new(channel, Performative::Attach(Attach::new_sender("sender-1", 9))))
        .unwrap();
    assert_eq!(events, vec![Event::LinkOpened { channel, handle }]);

    let mut flow = Flow::default();
    flow.set_handle(Some(handle));
    flow.set_link_credit(1);
    let events = connection.receive(Frame::new(channel, Performative::Flow(flow))).unwrap();
    assert_eq!(events, vec![Event::Flow { channel, handle: Some(handle), credit: Some(1) }]);
    assert_eq!(connection.session(channel).unwrap().link_by_handle(handle).unwrap().credit(), 1);

    let mut message = Message::new();
    message.set_id("123");
    message.set_body(Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]));
    let delivery_id = connection.send(channel, handle, &message).unwrap();
    assert_eq!(delivery_id, 0);

    let transfer_sent = connection.take_outbound();
    assert_eq!(transfer_sent.len(), 1);
    assert!(matches!(transfer_sent[0].performative, Performative::Transfer(_)));
    assert!(!transfer_sent[0].payload.is_empty());
    let decoded = Message::decode(&transfer_sent[0].payload).unwrap();
    assert_eq!(decoded, message);

    connection.detach_link(channel, handle).unwrap();
    let detach_sent = connection.take_outbound();
    assert_eq!(detach_sent.len(), 1);

    connection.end_session(channel).unwrap();
    let end_sent = connection.take_outbound();
    assert_eq!(end_sent.len(), 1);

    connection.close();
    let close_sent = connection.take_outbound();
    assert_eq!(close_sent.len(), 1);
    assert!(matches!(close_sent[0].performative, Performative::Close(_)));

    let events = connection.receive(Frame::new(0, Performative::Close(Close::new()))).unwrap();
    assert_eq!(events, vec![Event::ConnectionClosed]);
    assert!(connection.is_closed());
    assert!(connection.take_outbound().is_empty());
}

#[test]
fn sending_without_credit_is_a_usage_error() {
    let mut connection = Connection::new(Some("client".to_string()));
    connection.open();
    let _ = connection.take_outbound();

    let channel = connection.begin_session();
    let _ = connection.take_outbound();
    let handle = connection.attach_sender(channel, "sender-1", Target::new("queue.a")).unwrap();
    let _ = connection.take_outbound();

    let message = Message::with_body(Value::Bool(true));
    let err = connection.send(channel, handle, &message).unwrap_err();
    assert!(matches!(err, argon::Error::Usage(_)));
}
