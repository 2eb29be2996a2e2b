//! A session, scoped to one channel on a connection (§3, §4.5).
//!
//! Grounded on `endpoints.py`'s `Session` class: a session owns its
//! channel, its incoming/outgoing windows, the handle sequence for links it
//! creates, and two lookup tables — by link name (for dispatching an
//! inbound `Attach`, which carries a name but not yet a handle) and by
//! handle (for everything after).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::link::Link;
use crate::sequence::Sequence;
use crate::state::EndpointState;

/// A session attached to a channel.
#[derive(Debug)]
pub struct Session {
    channel: u16,
    remote_channel: Option<u16>,
    state: EndpointState,
    incoming_window: u32,
    outgoing_window: u32,
    handles: Sequence,
    links_by_handle: IndexMap<u32, Link>,
    handles_by_name: HashMap<String, u32>,
    incoming_deliveries: u64,
}

impl Session {
    pub(crate) fn new(channel: u16) -> Self {
        Self {
            channel,
            remote_channel: None,
            state: EndpointState::Unopened,
            incoming_window: u32::MAX,
            outgoing_window: u32::MAX,
            handles: Sequence::new(),
            links_by_handle: IndexMap::new(),
            handles_by_name: HashMap::new(),
            incoming_deliveries: 0,
        }
    }

    /// The local channel number this session is bound to.
    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// The channel the peer reported this session on, once its `Begin`
    /// has arrived.
    pub fn remote_channel(&self) -> Option<u16> {
        self.remote_channel
    }

    pub(crate) fn set_remote_channel(&mut self, channel: u16) {
        self.remote_channel = Some(channel);
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: EndpointState) {
        self.state = state;
    }

    pub(crate) fn incoming_window(&self) -> u32 {
        self.incoming_window
    }

    pub(crate) fn outgoing_window(&self) -> u32 {
        self.outgoing_window
    }

    /// Allocates a link, keyed by the handle it is given.
    ///
    /// Rejects a name already attached on this session: an `Attach` naming
    /// an existing link is a `ProtocolViolation` (§7.2), not a silent
    /// overwrite of the prior link's name->handle mapping.
    pub(crate) fn add_link(
        &mut self,
        name: impl Into<String>,
        target: Option<argon_types::messaging::Target>,
    ) -> Result<u32> {
        let name = name.into();
        if self.handles_by_name.contains_key(&name) {
            return Err(Error::ProtocolViolation(format!(
                "Attach with duplicate link name {name:?} on channel {}",
                self.channel
            )));
        }
        let handle = self.handles.next();
        self.handles_by_name.insert(name.clone(), handle);
        self.links_by_handle.insert(handle, Link::new(name, handle, target));
        Ok(handle)
    }

    /// Looks up a link by the handle the peer's performative carried.
    pub fn link_by_handle(&self, handle: u32) -> Option<&Link> {
        self.links_by_handle.get(&handle)
    }

    pub(crate) fn link_by_handle_mut(&mut self, handle: u32) -> Option<&mut Link> {
        self.links_by_handle.get_mut(&handle)
    }

    /// Looks up a link by name, used to dispatch an inbound `Attach`
    /// (which names the link but, from our side, already knows its
    /// handle).
    pub fn link_by_name(&self, name: &str) -> Option<&Link> {
        self.handles_by_name.get(name).and_then(|handle| self.links_by_handle.get(handle))
    }

    pub(crate) fn link_by_name_mut(&mut self, name: &str) -> Option<&mut Link> {
        let handle = *self.handles_by_name.get(name)?;
        self.links_by_handle.get_mut(&handle)
    }

    pub(crate) fn remove_link(&mut self, handle: u32) {
        if let Some(link) = self.links_by_handle.shift_remove(&handle) {
            self.handles_by_name.remove(link.name());
        }
    }

    /// All links currently attached, in creation order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links_by_handle.values()
    }

    pub(crate) fn record_incoming_transfer(&mut self) {
        self.incoming_deliveries += 1;
    }

    /// How many `Transfer` frames this session has received, total.
    pub fn incoming_deliveries(&self) -> u64 {
        self.incoming_deliveries
    }
}
