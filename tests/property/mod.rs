// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `naming`: short names and escaped segments are stable identifier segments
//! - `scaling`: range validation and policy count
//! - `routing`: alarm routing follows topic presence
//! - `synthesis`: repeated passes over one request are identical

mod naming;
mod routing;
mod scaling;
mod synthesis;
