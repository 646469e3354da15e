//! Unit tests for duration estimation.
