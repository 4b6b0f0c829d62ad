use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::wire::MAX_PACKET_BYTES;

pub struct UdpTransport {
    sock: UdpSocket,
}

impl UdpTransport {
    pub fn bind(bind_address: &str, bind_port: u16) -> io::Result<Self> {
        let sock = UdpSocket::bind((bind_address, bind_port))?;
        Ok(Self { sock })
    }

    /// Block for up to `timeout` waiting for one datagram. `Ok(None)` means
    /// the wait elapsed with nothing readable; that is the expected,
    /// non-error "continue to next iteration" case.
    pub fn recv(&self, timeout: Duration) -> io::Result<Option<(String, SocketAddr)>> {
        self.sock.set_read_timeout(Some(timeout))?;
        let mut buf = vec![0_u8; MAX_PACKET_BYTES];
        match self.sock.recv_from(&mut buf) {
            Ok((n, addr)) => {
                buf.truncate(n);
                Ok(Some((String::from_utf8_lossy(&buf).into_owned(), addr)))
            }
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::TimedOut =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn send(&self, payload: &str, address: &str, port: u16) -> io::Result<usize> {
        self.sock.send_to(payload.as_bytes(), (address, port))
    }
}
