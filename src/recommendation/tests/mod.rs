//! Unit tests for the recommendation context.
