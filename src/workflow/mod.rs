pub mod transition;
pub mod wip;

pub use transition::{allowed_transitions, resolve_target_status, validate_transition};
pub use wip::{can_enter, ensure_can_enter, occupancy, validate_status_column};
