//! State module for tracking page-session progress
//!
//! # Components
//!
//! - `SessionState`: the lifecycle of one page visit (navigating, settling,
//!   inspecting, discovering links, done or failed)
//! - `SessionError`: raised when code attempts an illegal transition

mod session_state;

// Re-export main types
pub use session_state::{SessionError, SessionState};
