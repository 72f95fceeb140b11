//! CLI integration tests running full builds against a fake toolchain.

#![cfg(unix)]

mod common;
