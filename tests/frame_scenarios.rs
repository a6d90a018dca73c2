#![allow(clippy::unwrap_used, clippy::expect_used)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use gatelink::frame::{
    Deframer, DeviceType, FrameError, GatewayReply, MsgType, ReplyStatus, crc32, decode,
};

fn scenario_a_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_all(&[0x00, 0x02, 0x17]).unwrap(); // prefix
    buf.write_u8(0x11).unwrap(); // scan, version 1
    buf.write_u8(0x01).unwrap(); // flags 0, rfid gate
    buf.write_u16::<LittleEndian>(4).unwrap(); // seq
    buf.write_u32::<LittleEndian>(0).unwrap(); // ts
    buf.write_u8(4).unwrap(); // len
    buf.write_all(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    let crc = crc32(&buf[3..]);
    buf.write_u32::<LittleEndian>(crc).unwrap();
    buf
}

#[test]
fn scenario_a_scan_frame_decodes() {
    let frame = decode(&scenario_a_bytes()).unwrap();
    assert_eq!(frame.kind(), Some(MsgType::Scan));
    assert_eq!(frame.version, 1);
    assert_eq!(frame.device(), Some(DeviceType::RfidGate));
    assert_eq!(frame.sequence, 4);
    assert_eq!(frame.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn scenario_a_with_corrupted_crc_is_dropped() {
    let mut bytes = scenario_a_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x80;
    assert!(matches!(
        decode(&bytes),
        Err(FrameError::ChecksumMismatch { .. })
    ));
}

#[test]
fn scenario_b_reply_grants() {
    let bytes = [0xC0, 0x00, 0x00, 0x00, 0x00, 0x17, 0x05, 0x47, 0x52, 0x41, 0x4E, 0x54];
    let reply = GatewayReply::decode(&bytes).unwrap();
    assert_eq!(reply.status, ReplyStatus::Grant);
    assert_eq!(reply.status.as_str(), "GRANT");
}

#[test]
fn deframer_recovers_frames_from_a_noisy_stream() {
    let frame = scenario_a_bytes();
    let mut corrupted = frame.clone();
    corrupted[12] ^= 0x01;

    let mut d = Deframer::new();
    d.push(&[0xFF, 0x13, 0x37]);
    d.push(&corrupted);
    d.push(&frame[..7]);
    assert!(matches!(
        d.next_frame(),
        Some(Err(FrameError::ChecksumMismatch { .. }))
    ));
    assert!(d.next_frame().is_none());

    d.push(&frame[7..]);
    let decoded = d.next_frame().unwrap().unwrap();
    assert_eq!(decoded.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(d.frames(), 1);
    assert_eq!(d.rejected(), 1);
    assert_eq!(d.discarded_bytes(), 3);
}
