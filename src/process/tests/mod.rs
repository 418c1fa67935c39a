//! Unit tests for the process module.

mod command;
