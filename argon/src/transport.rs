//! A single-threaded, poll-driven TCP transport for one `Connection`
//! (§5).
//!
//! Grounded on `io.py`'s `TcpConnection.run`: connect, blocking handshake,
//! `setblocking(False)`, then a `select.poll()` loop with a fixed 1-second
//! quantum that reads what's available, parses as many whole frames as are
//! buffered, dispatches them to the endpoint, and writes whatever frames
//! the endpoint queued in response — draining the socket as far as a
//! single `write` call accepts and leaving the remainder for the next
//! wakeup. This uses `libc::poll` directly rather than `mio`/`tokio`: one
//! connection, one thread, one fd, so a full reactor has nothing to buy.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::os::unix::io::AsRawFd;

use tracing::{instrument, trace};

use argon_codec::Buffer;
use argon_types::{emit_frame, parse_frame};

use crate::connection::{Connection, Event};
use crate::error::{Error, Result};

/// The 8-byte protocol header both peers exchange before any frame.
const PROTOCOL_HEADER: [u8; 8] = *b"AMQP\x00\x01\x00\x00";

/// The fixed poll quantum (§5: "the poll wait is a fixed quantum (default
/// 1 s)").
const POLL_QUANTUM_MS: i32 = 1_000;

/// Drives a [`Connection`] over a TCP socket.
pub struct Transport {
    stream: TcpStream,
    input: Buffer,
    read_offset: usize,
    output: Buffer,
    write_offset: usize,
}

impl Transport {
    /// Connects to `host:port`, exchanges the protocol header (blocking),
    /// and switches the socket to non-blocking mode.
    #[instrument(skip(host))]
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let mut stream = TcpStream::connect((host, port))?;
        shake_hands(&mut stream)?;
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream,
            input: Buffer::new(),
            read_offset: 0,
            output: Buffer::new(),
            write_offset: 0,
        })
    }

    /// Queues `connection`'s outbound frames and runs the poll loop until
    /// `connection` reaches the `Closed` state, `should_stop` returns
    /// `true`, or a fatal error occurs.
    ///
    /// Returns `Ok(())` on a clean close (the `on_stop(ok)` case in §8's
    /// end-to-end scenario) and `Err` on any fatal failure (`on_stop(err)`)
    /// — the caller is expected to drop the transport either way.
    ///
    /// `on_event` is invoked once per event a dispatched frame produced,
    /// with `&mut Connection` in hand — the only sanctioned way for a
    /// caller to react mid-loop (e.g. sending a message once a `Flow`
    /// reports credit) is to queue more work on that same connection, per
    /// §5's `enqueue_output` rule.
    pub fn run(
        &mut self,
        connection: &mut Connection,
        mut on_event: impl FnMut(&mut Connection, &Event),
        mut should_stop: impl FnMut(&Connection) -> bool,
    ) -> Result<()> {
        loop {
            self.emit_frames(connection)?;
            self.write_socket()?;

            if connection.is_closed() || should_stop(connection) {
                self.flush_remaining()?;
                return Ok(());
            }

            let writable = self.write_offset < self.output.len();
            self.poll_once(writable)?;

            self.read_socket()?;
            self.write_socket()?;

            for event in self.parse_frames(connection)? {
                trace!(?event, "dispatched");
                on_event(connection, &event);
            }
        }
    }

    /// Drains whatever remains in the output buffer before a clean or
    /// cancelled shutdown, so the final `Close`/`End`/`Detach` a callback
    /// queued actually reaches the wire rather than being discarded with
    /// the rest of the transport.
    fn flush_remaining(&mut self) -> Result<()> {
        while self.write_offset < self.output.len() {
            self.poll_once(true)?;
            self.write_socket()?;
        }
        Ok(())
    }

    fn poll_once(&self, writable: bool) -> Result<()> {
        let mut events = libc::POLLIN;
        if writable {
            events |= libc::POLLOUT;
        }
        let mut fds = [libc::pollfd {
            fd: self.stream.as_raw_fd(),
            events,
            revents: 0,
        }];

        // SAFETY: `fds` is a live, correctly-sized array for the duration
        // of the call, and `poll` writes only into `revents`.
        let ready = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, POLL_QUANTUM_MS) };
        if ready < 0 {
            return Err(Error::Transport(io::Error::last_os_error()));
        }
        let revents = fds[0].revents;
        if revents & (libc::POLLERR | libc::POLLHUP) != 0 {
            return Err(Error::Transport(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "poll reported POLLERR/POLLHUP",
            )));
        }
        Ok(())
    }

    fn read_socket(&mut self) -> Result<()> {
        let mut chunk = [0u8; 4096];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(Error::Transport(io::Error::new(io::ErrorKind::UnexpectedEof, "peer closed"))),
                Ok(n) => {
                    let end = self.input.len();
                    self.input.write(end, &chunk[..n]);
                    if n < chunk.len() {
                        return Ok(());
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(Error::Transport(err)),
            }
        }
    }

    fn write_socket(&mut self) -> Result<()> {
        while self.write_offset < self.output.len() {
            let pending = &self.output.as_slice()[self.write_offset..];
            match self.stream.write(pending) {
                Ok(0) => return Ok(()),
                Ok(n) => self.write_offset += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(Error::Transport(err)),
            }
        }
        // Caught up: rewind both the logical write position and the
        // backing buffer so steady-state memory is bounded by the
        // largest single frame seen (§5).
        self.output.reset();
        self.write_offset = 0;
        Ok(())
    }

    fn parse_frames(&mut self, connection: &mut Connection) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        loop {
            let start = self.read_offset;
            match parse_frame(&self.input, start)? {
                Some((next, frame)) => {
                    let (_, wire) = self.input.read(start, next - start)?;
                    log_frame("receive", &frame, wire);
                    self.read_offset = next;
                    events.extend(connection.receive(frame)?);
                }
                None => break,
            }
        }
        if self.read_offset == self.input.len() {
            self.input.reset();
            self.read_offset = 0;
        }
        Ok(events)
    }

    fn emit_frames(&mut self, connection: &mut Connection) -> Result<()> {
        for frame in connection.take_outbound() {
            let start = self.output.len();
            let end = emit_frame(&mut self.output, start, &frame)?;
            let (_, wire) = self.output.read(start, end - start)?;
            log_frame("send", &frame, wire);
        }
        Ok(())
    }
}

fn shake_hands(stream: &mut TcpStream) -> Result<()> {
    stream.write_all(&PROTOCOL_HEADER)?;
    let mut peer_header = [0u8; 8];
    stream.read_exact(&mut peer_header)?;
    if peer_header != PROTOCOL_HEADER {
        return Err(Error::ProtocolViolation(format!(
            "unexpected protocol header {peer_header:02x?}"
        )));
    }
    Ok(())
}

fn log_frame(direction: &str, frame: &argon_types::Frame, wire: &[u8]) {
    if std::env::var_os("ARGON_DEBUG").is_some() {
        let hex: String = wire.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ");
        println!("{direction} channel={} {:?}\n  {hex}", frame.channel, frame.performative);
    }
    trace!(direction, channel = frame.channel, performative = ?frame.performative, len = wire.len());
}
