//! Tests for the inspection engine.
