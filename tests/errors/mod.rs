//! Error handling tests
//!
//! Failure propagation, panics, abandoned handles and error inspection.

mod types;
