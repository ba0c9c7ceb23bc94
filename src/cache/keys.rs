//! Key Namespace Module
//!
//! Builds the backend key names used by the message cache. The window and
//! counter names are shared with earlier deployments of the chat backend,
//! so a cache pointed at an existing backend instance keeps serving the
//! data already there — do not rename them.

/// Prefix for all per-room keys
pub const MESSAGE_KEY_PREFIX: &str = "chat:room";

/// Global hit counter key
pub const HIT_COUNT_KEY: &str = "chat:cache:hit";

/// Global miss counter key
pub const MISS_COUNT_KEY: &str = "chat:cache:miss";

/// Key of a room's message window list.
pub fn message_key(room_id: &str) -> String {
    format!("{MESSAGE_KEY_PREFIX}:{room_id}:messages")
}

/// Key of a room's warm-up claim sentinel.
pub fn warming_key(room_id: &str) -> String {
    format!("{MESSAGE_KEY_PREFIX}:{room_id}:warming")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_key_format() {
        assert_eq!(message_key("room42"), "chat:room:room42:messages");
    }

    #[test]
    fn test_warming_key_format() {
        assert_eq!(warming_key("room42"), "chat:room:room42:warming");
    }

    #[test]
    fn test_counter_keys_are_stable() {
        assert_eq!(HIT_COUNT_KEY, "chat:cache:hit");
        assert_eq!(MISS_COUNT_KEY, "chat:cache:miss");
    }
}
