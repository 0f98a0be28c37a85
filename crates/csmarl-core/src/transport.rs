//! Transport abstraction for traffic sources
//!
//! A traffic source asks a [`SocketFactory`] for a send-only socket connected
//! from its node to a remote node, then pushes payloads through the returned
//! [`PacketSocket`]. The simulation crate backs this with channel-aware
//! sockets; tests use [`MockSocketFactory`](crate::MockSocketFactory).

use bytes::Bytes;

use crate::error::TransportError;
use crate::identity::NodeId;

/// A connected, send-only datagram socket
///
/// # Example
///
/// ```rust,ignore
/// use bytes::Bytes;
/// use csmarl_core::PacketSocket;
///
/// fn send_zeros(socket: &mut dyn PacketSocket, size: usize) -> Result<usize, TransportError> {
///     socket.send(Bytes::from(vec![0u8; size]))
/// }
/// ```
pub trait PacketSocket {
    /// Send one payload to the connected peer
    ///
    /// Returns the number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is closed or the payload is refused.
    fn send(&mut self, payload: Bytes) -> Result<usize, TransportError>;

    /// Close the socket; further sends fail with [`TransportError::Closed`]
    fn close(&mut self);

    /// Node this socket sends from
    fn local(&self) -> NodeId;

    /// Node this socket sends to
    fn remote(&self) -> NodeId;
}

/// Creates connected sockets for traffic sources
pub trait SocketFactory {
    /// Bind a socket on `local`, shut down its receive side and connect it to
    /// `remote`
    ///
    /// # Errors
    ///
    /// Returns an error if either node is unknown to the transport.
    fn connect(&mut self, local: NodeId, remote: NodeId)
    -> Result<Box<dyn PacketSocket>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSocket {
        local: NodeId,
        remote: NodeId,
    }

    impl PacketSocket for NullSocket {
        fn send(&mut self, payload: Bytes) -> Result<usize, TransportError> {
            Ok(payload.len())
        }

        fn close(&mut self) {}

        fn local(&self) -> NodeId {
            self.local
        }

        fn remote(&self) -> NodeId {
            self.remote
        }
    }

    #[test]
    fn test_socket_trait_object() {
        let mut socket: Box<dyn PacketSocket> = Box::new(NullSocket {
            local: NodeId(0),
            remote: NodeId(1),
        });
        assert_eq!(socket.send(Bytes::from_static(b"hello")).unwrap(), 5);
        assert_eq!(socket.local(), NodeId(0));
        assert_eq!(socket.remote(), NodeId(1));
    }
}
