//! External service module
//! 
//! This module contains the desktop notification collaborator used to
//! alert the user when a countdown finishes.

pub mod notifier;

// Re-export main functions
pub use notifier::*;
