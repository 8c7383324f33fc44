//! Canonical schema constants for structured logging and events
//!
//! These constants keep field keys and event names consistent between the
//! emitting code, the error facility and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Shared state
pub const FIELD_STATE_FIELD: &str = "state_field";
pub const FIELD_STATE: &str = "state";

// Command payload
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_PATH: &str = "path";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical boundary event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Domain event names
pub const EVENT_COMMAND_CONSTRUCTED: &str = "command_constructed";
pub const EVENT_CONTEXT_CLOSED: &str = "context_closed";
pub const EVENT_DIR_CREATED: &str = "dir_created";
pub const EVENT_DIR_REMOVED: &str = "dir_removed";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_PATH.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        let names = [
            EVENT_START,
            EVENT_END,
            EVENT_END_ERROR,
            EVENT_COMMAND_CONSTRUCTED,
            EVENT_CONTEXT_CLOSED,
            EVENT_DIR_CREATED,
            EVENT_DIR_REMOVED,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
