//! The connection endpoint: the top of the entity tree from §3, dispatching
//! inbound frames down to the session and link they address and emitting
//! outbound frames onto an `enqueue_output`-style queue a transport drains.
//!
//! Grounded on `endpoints.py`'s `Connection` class (`on_start`/`on_frame`
//! dispatch, `sessions`/`sessions_by_channel` tables) with the single
//! `_Sequence` class's starting value changed from `-1` to `0` (see
//! DESIGN.md): this implementation allocates channel numbers, link handles,
//! and delivery ids starting at zero, which is what the wire format and
//! every interoperating broker expect.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use argon_types::messaging::{Message, Target};
use argon_types::performatives::{Attach, Begin, Close, Detach, End, Flow, Open, Transfer};
use argon_types::{Frame, Performative};

use crate::error::{Error, Result};
use crate::session::Session;
use crate::sequence::Sequence;
use crate::state::EndpointState;

/// A notification surfaced by [`Connection::receive`], mirroring the
/// `on_open`/`on_close`/`on_flow` callbacks of the system this was
/// distilled from. Returned as a plain value rather than invoked as a
/// callback so the state machine stays testable without a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The connection completed its open handshake.
    ConnectionOpened,
    /// The connection completed its close handshake. No further frames
    /// will be emitted or accepted.
    ConnectionClosed,
    /// The session on `channel` completed its open handshake.
    SessionOpened { channel: u16 },
    /// The session on `channel` completed its close handshake.
    SessionClosed { channel: u16 },
    /// The link `handle` on `channel` completed its open handshake.
    LinkOpened { channel: u16, handle: u32 },
    /// The link `handle` on `channel` completed its close handshake.
    LinkClosed { channel: u16, handle: u32 },
    /// A `Flow` updated `handle`'s credit (or the session's, if `handle`
    /// is `None`).
    Flow { channel: u16, handle: Option<u32>, credit: Option<u32> },
    /// A `Transfer` arrived; out of scope beyond the count in
    /// `Session::incoming_deliveries`.
    TransferReceived { channel: u16, handle: u32 },
    /// A `Disposition` arrived.
    DispositionReceived { channel: u16 },
}

/// The connection endpoint.
///
/// Owns the container id, the channel-number sequence, and every session
/// keyed by its local channel (§3). Frames addressed at connection scope
/// (`Open`, `Close`) are handled here directly; everything else is routed
/// to the session (and, below it, the link) the frame names.
#[derive(Debug)]
pub struct Connection {
    container_id: String,
    state: EndpointState,
    channels: Sequence,
    sessions: IndexMap<u16, Session>,
    outbound: Vec<Frame>,
}

impl Connection {
    /// Builds an unopened connection. `container_id` defaults to the hex
    /// of 16 random octets if `None`, matching §3.
    pub fn new(container_id: Option<String>) -> Self {
        let container_id = container_id.unwrap_or_else(random_container_id);
        Self {
            container_id,
            state: EndpointState::Unopened,
            channels: Sequence::new(),
            sessions: IndexMap::new(),
            outbound: Vec::new(),
        }
    }

    /// The container id this connection announces in its `Open`.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// True once the close handshake has completed.
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Drains every frame queued for the transport to write, in the order
    /// they were produced.
    pub fn take_outbound(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.outbound)
    }

    fn enqueue(&mut self, frame: Frame) {
        trace!(channel = frame.channel, performative = ?frame.performative, "enqueue_output");
        self.outbound.push(frame);
    }

    /// Sends the local `Open`. UNOPENED -> OPEN_SENT.
    #[instrument(skip(self))]
    pub fn open(&mut self) {
        let open = Open::new(self.container_id.clone());
        self.enqueue(Frame::new(0, Performative::Open(open)));
        self.state = EndpointState::OpenSent;
        debug!(state = ?self.state, "connection open sent");
    }

    /// Sends the local `Close`. OPENED -> CLOSE_SENT.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        self.enqueue(Frame::new(0, Performative::Close(Close::new())));
        self.state = EndpointState::CloseSent;
        debug!(state = ?self.state, "connection close sent");
    }

    /// Begins a session, allocating the next outgoing channel number and
    /// sending `Begin`. UNOPENED -> OPEN_SENT for the session.
    #[instrument(skip(self))]
    pub fn begin_session(&mut self) -> u16 {
        let channel = self.channels.next() as u16;
        let mut session = Session::new(channel);

        let begin = Begin::new(0, session.incoming_window(), session.outgoing_window());
        self.enqueue(Frame::new(channel, Performative::Begin(begin)));
        session.set_state(EndpointState::OpenSent);

        self.sessions.insert(channel, session);
        debug!(channel, "session begin sent");
        channel
    }

    /// Ends the session on `channel` and sends `End`. OPENED -> CLOSE_SENT
    /// for the session.
    pub fn end_session(&mut self, channel: u16) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::Usage(format!("no session on channel {channel}")))?;
        session.set_state(EndpointState::CloseSent);
        self.enqueue(Frame::new(channel, Performative::End(End::new())));
        Ok(())
    }

    /// A read-only view of the session on `channel`, if one exists.
    pub fn session(&self, channel: u16) -> Option<&Session> {
        self.sessions.get(&channel)
    }

    /// Attaches a sending link named `name` to the session on `channel`,
    /// targeting `target`, and sends `Attach`. UNOPENED -> OPEN_SENT for
    /// the link.
    #[instrument(skip(self, target))]
    pub fn attach_sender(&mut self, channel: u16, name: impl Into<String>, target: Target) -> Result<u32> {
        let name = name.into();
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::Usage(format!("no session on channel {channel}")))?;

        let handle = session.add_link(name.clone(), Some(target.clone()))?;
        let link = session.link_by_handle_mut(handle).expect("link just inserted");
        link.set_state(EndpointState::OpenSent);

        let mut attach = Attach::new_sender(name, handle);
        attach.set_target(Some(target));
        attach.set_initial_delivery_count(0);
        self.enqueue(Frame::new(channel, Performative::Attach(attach)));

        debug!(channel, handle, "link attach sent");
        Ok(handle)
    }

    /// Detaches the link `handle` on `channel`'s session, sending
    /// `Detach` with `closed = true`.
    pub fn detach_link(&mut self, channel: u16, handle: u32) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::Usage(format!("no session on channel {channel}")))?;
        let link = session
            .link_by_handle_mut(handle)
            .ok_or_else(|| Error::Usage(format!("no link {handle} on channel {channel}")))?;
        link.set_state(EndpointState::CloseSent);
        self.enqueue(Frame::new(channel, Performative::Detach(Detach::new(handle, true))));
        Ok(())
    }

    /// Sends `message` over the link `handle` on `channel`'s session as a
    /// presettled `Transfer` (§4.5: this client implements only presettled
    /// delivery). Fails with `Error::Usage` if the link has not received
    /// credit; per §4.5 this is a local precondition this method enforces
    /// itself by returning an error rather than silently blocking, but
    /// does not implement any flow-control arithmetic beyond it.
    #[instrument(skip(self, message))]
    pub fn send(&mut self, channel: u16, handle: u32, message: &Message) -> Result<u32> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::Usage(format!("no session on channel {channel}")))?;
        let link = session
            .link_by_handle_mut(handle)
            .ok_or_else(|| Error::Usage(format!("no link {handle} on channel {channel}")))?;

        if link.credit() == 0 {
            return Err(Error::Usage(format!("link {handle} has no credit")));
        }

        let delivery_id = link.next_delivery_id();
        link.consume_credit();
        let delivery_tag = format!("delivery-{delivery_id}").into_bytes();

        let payload = message.encode()?;
        let transfer = Transfer::new(handle, delivery_id, delivery_tag);
        self.enqueue(Frame::with_payload(channel, Performative::Transfer(transfer), payload));

        debug!(channel, handle, delivery_id, "transfer sent");
        Ok(delivery_id)
    }

    /// Dispatches one inbound frame per §4.5, returning the events it
    /// produced (usually zero or one). Any dispatch failure is fatal:
    /// the caller must treat a returned `Err` as grounds to stop the
    /// connection.
    #[instrument(skip(self, frame), fields(channel = frame.channel))]
    pub fn receive(&mut self, frame: Frame) -> Result<Vec<Event>> {
        let channel = frame.channel;
        match frame.performative {
            Performative::Open(open) => Ok(vec![self.on_open(open)]),
            Performative::Close(close) => Ok(vec![self.on_close(close)]),
            Performative::Begin(begin) => self.on_begin(channel, begin),
            Performative::End(end) => self.on_end(channel, end),
            Performative::Attach(attach) => self.on_attach(channel, attach),
            Performative::Flow(flow) => self.on_flow(channel, flow),
            Performative::Transfer(transfer) => self.on_transfer(channel, transfer),
            Performative::Disposition(_disposition) => self.on_disposition(channel),
            Performative::Detach(detach) => self.on_detach(channel, detach),
        }
    }

    fn on_open(&mut self, _open: Open) -> Event {
        if self.state == EndpointState::Unopened {
            self.open();
        }
        self.state = EndpointState::Opened;
        debug!(state = ?self.state, "connection opened");
        Event::ConnectionOpened
    }

    fn on_close(&mut self, _close: Close) -> Event {
        if self.state == EndpointState::Opened {
            self.close();
        }
        self.state = EndpointState::Closed;
        debug!(state = ?self.state, "connection closed");
        Event::ConnectionClosed
    }

    fn on_begin(&mut self, channel: u16, begin: Begin) -> Result<Vec<Event>> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("Begin on unknown channel {channel}")))?;
        session.set_remote_channel(begin.remote_channel().unwrap_or(channel));
        if session.state() == EndpointState::Unopened {
            session.set_state(EndpointState::OpenSent);
        }
        session.set_state(EndpointState::Opened);
        Ok(vec![Event::SessionOpened { channel }])
    }

    fn on_end(&mut self, channel: u16, _end: End) -> Result<Vec<Event>> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("End on unknown channel {channel}")))?;
        if session.state() == EndpointState::Opened {
            self.enqueue(Frame::new(channel, Performative::End(End::new())));
        }
        self.sessions.get_mut(&channel).unwrap().set_state(EndpointState::Closed);
        Ok(vec![Event::SessionClosed { channel }])
    }

    fn on_attach(&mut self, channel: u16, attach: Attach) -> Result<Vec<Event>> {
        let name = attach
            .name()
            .ok_or_else(|| Error::ProtocolViolation("Attach without a name".to_string()))?;
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("Attach on unknown channel {channel}")))?;
        let link = session
            .link_by_name_mut(&name)
            .ok_or_else(|| Error::ProtocolViolation(format!("Attach for unknown link {name}")))?;
        let handle = link.handle();
        if link.state() == EndpointState::Unopened {
            link.set_state(EndpointState::OpenSent);
        }
        link.set_state(EndpointState::Opened);
        Ok(vec![Event::LinkOpened { channel, handle }])
    }

    fn on_flow(&mut self, channel: u16, flow: Flow) -> Result<Vec<Event>> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("Flow on unknown channel {channel}")))?;

        let handle = flow.handle();
        let credit = flow.link_credit();
        if let Some(handle) = handle {
            let link = session
                .link_by_handle_mut(handle)
                .ok_or_else(|| Error::ProtocolViolation(format!("Flow for unknown link {handle}")))?;
            link.set_credit(credit.unwrap_or(0));
        }
        Ok(vec![Event::Flow { channel, handle, credit }])
    }

    fn on_transfer(&mut self, channel: u16, transfer: Transfer) -> Result<Vec<Event>> {
        let handle = transfer
            .handle()
            .ok_or_else(|| Error::ProtocolViolation("Transfer without a handle".to_string()))?;
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("Transfer on unknown channel {channel}")))?;
        session.record_incoming_transfer();
        Ok(vec![Event::TransferReceived { channel, handle }])
    }

    fn on_disposition(&mut self, channel: u16) -> Result<Vec<Event>> {
        if !self.sessions.contains_key(&channel) {
            return Err(Error::ProtocolViolation(format!("Disposition on unknown channel {channel}")));
        }
        Ok(vec![Event::DispositionReceived { channel }])
    }

    fn on_detach(&mut self, channel: u16, detach: Detach) -> Result<Vec<Event>> {
        let handle = detach
            .handle()
            .ok_or_else(|| Error::ProtocolViolation("Detach without a handle".to_string()))?;
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or_else(|| Error::ProtocolViolation(format!("Detach on unknown channel {channel}")))?;
        let link = session
            .link_by_handle_mut(handle)
            .ok_or_else(|| Error::ProtocolViolation(format!("Detach for unknown link {handle}")))?;

        if link.state() == EndpointState::Opened {
            self.enqueue(Frame::new(channel, Performative::Detach(Detach::new(handle, detach.closed()))));
        }

        if detach.closed() {
            session.remove_link(handle);
        } else if let Some(link) = session.link_by_handle_mut(handle) {
            link.set_state(EndpointState::Closed);
        }

        Ok(vec![Event::LinkClosed { channel, handle }])
    }
}

fn random_container_id() -> String {
    let octets: [u8; 16] = rand::random();
    octets.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon_types::messaging::Target;

    #[test]
    fn container_id_defaults_to_random_hex() {
        let connection = Connection::new(None);
        assert_eq!(connection.container_id().len(), 32);
    }

    #[test]
    fn open_transitions_to_open_sent_and_enqueues_a_frame() {
        let mut connection = Connection::new(Some("a".to_string()));
        connection.open();
        assert_eq!(connection.state(), EndpointState::OpenSent);
        let frames = connection.take_outbound();
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0].performative, Performative::Open(_)));
    }

    #[test]
    fn peer_open_before_local_open_emits_local_open_then_opens() {
        let mut connection = Connection::new(Some("a".to_string()));
        let events = connection.receive(Frame::new(0, Performative::Open(Open::new("peer")))).unwrap();
        assert_eq!(events, vec![Event::ConnectionOpened]);
        assert_eq!(connection.state(), EndpointState::Opened);
        // The local Open was emitted as a side effect of the peer's.
        assert_eq!(connection.take_outbound().len(), 1);
    }

    #[test]
    fn full_session_and_link_handshake_grants_credit_and_sends() {
        let mut connection = Connection::new(Some("a".to_string()));
        connection.open();
        let _ = connection.take_outbound();

        let channel = connection.begin_session();
        let _ = connection.take_outbound();
        connection
            .receive(Frame::new(channel, Performative::Begin(Begin::new(0, u32::MAX, u32::MAX))))
            .unwrap();

        let handle = connection.attach_sender(channel, "link-1", Target::new("queue.a")).unwrap();
        let _ = connection.take_outbound();
        connection
            .receive(Frame::new(channel, Performative::Attach(Attach::new_sender("link-1", 7))))
            .unwrap();

        let mut flow = Flow::default();
        flow.set_handle(Some(handle));
        flow.set_link_credit(1);
        let events = connection.receive(Frame::new(channel, Performative::Flow(flow))).unwrap();
        assert_eq!(events, vec![Event::Flow { channel, handle: Some(handle), credit: Some(1) }]);

        let message = Message::with_body(argon_codec::Value::UInt(1));
        let delivery_id = connection.send(channel, handle, &message).unwrap();
        assert_eq!(delivery_id, 0);

        // Credit is consumed; a second send fails with a usage error.
        let err = connection.send(channel, handle, &message).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn unknown_channel_on_begin_is_a_protocol_violation() {
        let mut connection = Connection::new(Some("a".to_string()));
        let err = connection
            .receive(Frame::new(4, Performative::Begin(Begin::new(0, 0, 0))))
            .unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }

    #[test]
    fn attach_with_a_name_already_on_the_session_is_a_protocol_violation() {
        let mut connection = Connection::new(Some("a".to_string()));
        connection.open();
        let _ = connection.take_outbound();

        let channel = connection.begin_session();
        let _ = connection.take_outbound();
        connection
            .receive(Frame::new(channel, Performative::Begin(Begin::new(0, u32::MAX, u32::MAX))))
            .unwrap();

        connection.attach_sender(channel, "link-1", Target::new("queue.a")).unwrap();
        let _ = connection.take_outbound();

        let err = connection.attach_sender(channel, "link-1", Target::new("queue.b")).unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }
}
