//! Unit tests for the workshop context.
