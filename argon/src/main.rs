//! `argon send HOST PORT ADDRESS BODY` — connect, attach a sending link to
//! `ADDRESS`, send one message once the peer grants credit, then close
//! down cleanly (§6).

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use argon::{Connection, Event, Transport};
use argon_types::messaging::{Message, Target};

#[derive(Debug, StructOpt)]
#[structopt(name = "argon", about = "A minimal AMQP 1.0 sending client")]
enum Opt {
    /// Send one message to an address and exit.
    Send {
        /// The broker host to connect to.
        host: String,
        /// The broker port.
        port: u16,
        /// The address (queue or topic) to send to.
        address: String,
        /// The message body, sent as a UTF-8 string value.
        body: String,
    },
}

/// Set by the `SIGINT` handler installed in `main`; polled as the
/// transport's cancellation predicate (§5: "external cancellation is a
/// synchronous signal").
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigint(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // SAFETY: installs a signal handler that only writes an atomic bool;
    // no allocation or non-reentrant call happens in `on_sigint`.
    unsafe {
        libc::signal(libc::SIGINT, on_sigint as libc::sighandler_t);
    }

    let Opt::Send { host, port, address, body } = Opt::from_args();

    match send(&host, port, &address, &body) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "argon send failed");
            ExitCode::FAILURE
        }
    }
}

fn send(host: &str, port: u16, address: &str, body: &str) -> argon::Result<()> {
    let mut transport = Transport::connect(host, port)?;
    let mut connection = Connection::new(None);

    connection.open();
    let channel = connection.begin_session();
    let handle = connection.attach_sender(channel, "argon-send", Target::new(address))?;

    let message = Message::with_body(argon_codec::Value::String(body.to_string()));
    let mut sent = false;

    transport.run(
        &mut connection,
        |connection, event| match event {
            Event::Flow { channel: event_channel, handle: Some(event_handle), .. }
                if *event_channel == channel && *event_handle == handle && !sent =>
            {
                if connection.send(channel, handle, &message).is_ok() {
                    sent = true;
                    info!(channel, handle, "message sent");
                    let _ = connection.detach_link(channel, handle);
                }
            }
            Event::LinkClosed { channel: event_channel, handle: event_handle }
                if *event_channel == channel && *event_handle == handle =>
            {
                let _ = connection.end_session(channel);
            }
            Event::SessionClosed { channel: event_channel } if *event_channel == channel => {
                connection.close();
            }
            _ => {}
        },
        |_connection| INTERRUPTED.load(Ordering::SeqCst),
    )
}
