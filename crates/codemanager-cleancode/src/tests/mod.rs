//! Tests for clean-code scanning.

mod console;
mod scanner;
mod tester;
