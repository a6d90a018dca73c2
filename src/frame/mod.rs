//! Radio frame codec.
//!
//! Sensor to gateway frames carry a CRC32 and a small header; gateway to
//! sensor packets use the shorter reply layout with a textual status.

pub mod constants;
pub mod crc32;
pub mod deframer;
pub mod device_type;
pub mod frame;
pub mod frame_error;
pub mod msg_type;
pub mod reply;

pub use crc32::crc32;
pub use deframer::Deframer;
pub use device_type::DeviceType;
pub use frame::{Frame, decode, encode};
pub use frame_error::FrameError;
pub use msg_type::MsgType;
pub use reply::{GatewayReply, ReplyError, ReplyStatus};
