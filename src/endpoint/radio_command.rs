//! Text commands and acknowledgements carried in reply-layout packets.
//!
//! `REMOTE_UNLOCK:{command_id}:{user}:{duration_ms}`,
//! `REMOTE_LOCK:{command_id}:{user}` and `ACK:{command_id}:{1|0}:{status}`.

use crate::{
    actuator::{Command, CommandAck, CommandError, RemoteLock, RemoteUnlock},
    link::constants::{REMOTE_LOCK_PREFIX, REMOTE_UNLOCK_PREFIX},
};

pub fn parse_radio_command(text: &str) -> Result<Command, CommandError> {
    if let Some(rest) = text.strip_prefix(REMOTE_UNLOCK_PREFIX) {
        let mut parts = rest.splitn(3, ':');
        let (Some(id), Some(user), Some(duration)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CommandError::BadRadioFormat(text.to_string()));
        };
        let duration_ms = duration
            .trim()
            .parse::<i64>()
            .map_err(|_| CommandError::BadRadioFormat(text.to_string()))?;
        return Ok(Command::RemoteUnlock(RemoteUnlock {
            command_id: Some(id.to_string()),
            user: Some(user.to_string()),
            reason: None,
            duration_ms: Some(duration_ms),
        }));
    }

    if let Some(rest) = text.strip_prefix(REMOTE_LOCK_PREFIX) {
        let Some((id, user)) = rest.split_once(':') else {
            return Err(CommandError::BadRadioFormat(text.to_string()));
        };
        return Ok(Command::RemoteLock(RemoteLock {
            command_id: Some(id.to_string()),
            user: Some(user.to_string()),
        }));
    }

    Err(CommandError::UnknownCmd(text.to_string()))
}

pub fn format_ack(ack: &CommandAck) -> String {
    format!(
        "ACK:{}:{}:{}",
        ack.command_id,
        u8::from(ack.success),
        ack.status
    )
}
