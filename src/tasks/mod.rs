//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod ticker;
pub mod completion_alert;

// Re-export main functions
pub use ticker::run_ticker;
pub use completion_alert::completion_alert_task;
