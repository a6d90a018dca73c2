use std::io;

/// Packet-oriented radio modem.
///
/// `receive` never blocks: `Ok(None)` means nothing is pending. Each
/// `Some` is one whole packet as the modem delivered it.
pub trait ByteChannel {
    fn transmit(&mut self, packet: &[u8]) -> io::Result<()>;
    fn receive(&mut self) -> io::Result<Option<Vec<u8>>>;
}

impl<T: ByteChannel + ?Sized> ByteChannel for Box<T> {
    fn transmit(&mut self, packet: &[u8]) -> io::Result<()> {
        (**self).transmit(packet)
    }

    fn receive(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).receive()
    }
}
