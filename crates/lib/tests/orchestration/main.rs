//! End-to-end orchestration tests driving a fake toolchain.

#![cfg(unix)]

mod build_tests;
mod common;
mod incremental_tests;
