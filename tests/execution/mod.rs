//! Execution tests for the four executors
//!
//! Value threading, aggregation and completion handler delivery.
