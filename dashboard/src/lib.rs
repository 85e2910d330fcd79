//! Gesture-controlled smart-home dashboard core.
//!
//! Library crate exposing the interaction pipeline for the binary and
//! integration tests: hand tracking, session gating, view routing and
//! device widgets, plus the landmark/activity/render boundaries.

pub mod activity;
pub mod backend;
pub mod config;
pub mod geometry;
pub mod render;
pub mod session;
pub mod source;
pub mod state;
pub mod tracking;
pub mod ui;
