//! Capture assembly
//!
//! Builds the substitution map for one message. Later sources override
//! earlier ones on key collision:
//!
//! 1. upstream match captures
//! 2. message headers (`Logger`, `Hostname`, `Type`, `Payload`)
//! 3. first value of each non-empty string field, keyed by field name

use crate::pipeline::{Captures, FieldType, Message};

pub const CAPTURE_LOGGER: &str = "Logger";
pub const CAPTURE_HOSTNAME: &str = "Hostname";
pub const CAPTURE_TYPE: &str = "Type";
pub const CAPTURE_PAYLOAD: &str = "Payload";

/// Assemble captures for `message` on top of the upstream `captures`.
pub fn assemble_captures(captures: Option<Captures>, message: &Message) -> Captures {
    let mut captures = captures.unwrap_or_default();

    captures.insert(CAPTURE_LOGGER.to_string(), message.logger().to_string());
    captures.insert(CAPTURE_HOSTNAME.to_string(), message.hostname().to_string());
    captures.insert(CAPTURE_TYPE.to_string(), message.message_type().to_string());
    captures.insert(CAPTURE_PAYLOAD.to_string(), message.payload().to_string());

    for field in message.fields() {
        if field.value_type() != FieldType::String {
            continue;
        }
        if let Some(first) = field.value_strings().first() {
            captures.insert(field.name.clone(), first.clone());
        }
    }

    captures
}
