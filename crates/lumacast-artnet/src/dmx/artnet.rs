//! Art-Net DMX output (ArtDmx / OpDmx)
//!
//! Art-Net is a UDP-based protocol for transmitting DMX512 over Ethernet. Only
//! the DMX data packet is produced here; there is no poll/reply, sync or merge.

use std::net::{SocketAddr, UdpSocket};

use super::UNIVERSE_SIZE;
use crate::{error::ArtNetError, Result};

/// Standard Art-Net UDP port
pub const ARTNET_PORT: u16 = 6454;
/// "Art-Net" followed by a NUL
pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
/// OpDmx, sent little-endian
pub const OP_DMX: u16 = 0x5000;
/// Art-Net protocol revision, sent big-endian
pub const PROTOCOL_VERSION: u16 = 14;
pub const HEADER_LEN: usize = 18;
pub const PACKET_LEN: usize = HEADER_LEN + UNIVERSE_SIZE;

/// A complete ArtDmx datagram
pub type ArtNetPacket = [u8; PACKET_LEN];

/// Build an ArtDmx packet.
///
/// The length field carries `data.len()`; the payload is always a full
/// universe, zero padded past the supplied data. Sequence and physical are 0.
pub fn build_packet(universe: u16, data: &[u8]) -> Result<ArtNetPacket> {
    if data.len() > UNIVERSE_SIZE {
        return Err(ArtNetError::PayloadTooLarge(data.len()));
    }

    let mut packet = [0u8; PACKET_LEN];

    // Header: "Art-Net\0"
    packet[0..8].copy_from_slice(ARTNET_ID);

    // OpCode: OpDmx (0x5000)
    packet[8..10].copy_from_slice(&OP_DMX.to_le_bytes());

    // Protocol version (14)
    packet[10..12].copy_from_slice(&PROTOCOL_VERSION.to_be_bytes());

    // Sequence (12) and physical (13) stay 0

    // Universe (Port-Address, low byte first)
    packet[14..16].copy_from_slice(&universe.to_le_bytes());

    // Length (big-endian)
    packet[16..18].copy_from_slice(&(data.len() as u16).to_be_bytes());

    // DMX data
    packet[HEADER_LEN..HEADER_LEN + data.len()].copy_from_slice(data);

    Ok(packet)
}

/// UDP transport for Art-Net packets
#[derive(Debug)]
pub struct ArtNetSender {
    socket: UdpSocket,
}

impl ArtNetSender {
    /// Bind an ephemeral local port. Broadcast is enabled so senders may target
    /// a subnet broadcast address.
    pub fn new() -> Result<Self> {
        Self::bind(SocketAddr::from(([0, 0, 0, 0], 0)))
    }

    /// Bind to a specific local address
    pub fn bind(local: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(local)?;
        socket.set_broadcast(true)?;

        tracing::info!("Art-Net sender bound to {}", socket.local_addr()?);

        Ok(Self { socket })
    }

    /// Send one packet. There is no acknowledgment and no retry.
    pub fn send(&self, packet: &ArtNetPacket, endpoint: SocketAddr) -> Result<()> {
        self.socket.send_to(packet, endpoint)?;
        Ok(())
    }

    /// Frame and send a universe of DMX data
    pub fn send_dmx(&self, universe: u16, data: &[u8], endpoint: SocketAddr) -> Result<()> {
        let packet = build_packet(universe, data)?;
        self.send(&packet, endpoint)?;

        tracing::trace!("Sent Art-Net DMX packet for universe {} to {}", universe, endpoint);

        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}
