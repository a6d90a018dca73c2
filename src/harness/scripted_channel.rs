use std::{collections::VecDeque, io};

use crate::link::ByteChannel;

/// Byte channel fed from a script: queued inbound packets, and a number of
/// upcoming transmits to fail.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    failing_transmits: u32,
}

impl ScriptedChannel {
    pub fn push_inbound(&mut self, packet: Vec<u8>) {
        self.inbound.push_back(packet);
    }

    pub fn fail_next_transmits(&mut self, n: u32) {
        self.failing_transmits = n;
    }

    /// Packets that were transmitted successfully, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }
}

impl ByteChannel for ScriptedChannel {
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.failing_transmits > 0 {
            self.failing_transmits -= 1;
            return Err(io::Error::new(io::ErrorKind::TimedOut, "radio busy"));
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn receive(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.inbound.pop_front())
    }
}
