//! Bounded-retry transport over an unreliable radio byte channel.

pub mod byte_channel;
pub mod constants;
pub mod link_error;
pub mod link_state;
pub mod link_stats;
pub mod link_transport;
pub mod outbound_frame;
pub mod reply_schema;
pub mod retry_policy;

pub use byte_channel::ByteChannel;
pub use link_error::LinkError;
pub use link_state::LinkState;
pub use link_stats::LinkStats;
pub use link_transport::LinkTransport;
pub use outbound_frame::OutboundFrame;
pub use reply_schema::ReplySchema;
pub use retry_policy::RetryPolicy;
