//! Mock transport implementation for testing
//!
//! Provides in-memory sockets that record every payload they are given, so
//! traffic sources can be tested without a channel model.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use csmarl_core::{MockSocketFactory, NodeId, SocketFactory};
//!
//! let mut factory = MockSocketFactory::new();
//! let mut socket = factory.connect(NodeId(0), NodeId(1)).unwrap();
//! socket.send(bytes::Bytes::from(vec![0u8; 100])).unwrap();
//!
//! assert_eq!(factory.sent().len(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use bytes::Bytes;

use crate::error::TransportError;
use crate::identity::NodeId;
use crate::transport::{PacketSocket, SocketFactory};

/// A payload recorded by a mock socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSend {
    pub from: NodeId,
    pub to: NodeId,
    pub size: usize,
}

#[derive(Debug, Default)]
struct MockShared {
    sent: RefCell<Vec<MockSend>>,
    attempts: Cell<usize>,
    fail_sends: Cell<bool>,
}

/// Factory for recording sockets
///
/// All sockets created by one factory share the same send log and failure
/// switch.
#[derive(Debug, Default, Clone)]
pub struct MockSocketFactory {
    shared: Rc<MockShared>,
    refused: HashSet<NodeId>,
}

impl MockSocketFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send on every socket fail (or succeed again)
    pub fn set_fail_sends(&self, fail: bool) {
        self.shared.fail_sends.set(fail);
    }

    /// Refuse to bind sockets on the given node
    pub fn refuse(mut self, node: NodeId) -> Self {
        self.refused.insert(node);
        self
    }

    /// All successfully sent payloads, in send order
    pub fn sent(&self) -> Vec<MockSend> {
        self.shared.sent.borrow().clone()
    }

    /// Number of send attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.shared.attempts.get()
    }
}

impl SocketFactory for MockSocketFactory {
    fn connect(
        &mut self,
        local: NodeId,
        remote: NodeId,
    ) -> Result<Box<dyn PacketSocket>, TransportError> {
        if self.refused.contains(&local) {
            return Err(TransportError::BindFailed(format!("node {} refused", local)));
        }
        Ok(Box::new(MockSocket {
            local,
            remote,
            open: true,
            shared: Rc::clone(&self.shared),
        }))
    }
}

/// A socket that records payloads into its factory's log
#[derive(Debug)]
pub struct MockSocket {
    local: NodeId,
    remote: NodeId,
    open: bool,
    shared: Rc<MockShared>,
}

impl PacketSocket for MockSocket {
    fn send(&mut self, payload: Bytes) -> Result<usize, TransportError> {
        self.shared.attempts.set(self.shared.attempts.get() + 1);
        if !self.open {
            return Err(TransportError::Closed);
        }
        if self.shared.fail_sends.get() {
            return Err(TransportError::SendFailed("mock failure".into()));
        }
        self.shared.sent.borrow_mut().push(MockSend {
            from: self.local,
            to: self.remote,
            size: payload.len(),
        });
        Ok(payload.len())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn local(&self) -> NodeId {
        self.local
    }

    fn remote(&self) -> NodeId {
        self.remote
    }
}
