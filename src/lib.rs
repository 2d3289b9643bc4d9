//! Study Intake - Conversational Course Discovery
//!
//! This crate implements the StudyGlobal intake flow: a fixed conversation
//! that verifies a user's email with a one-time passcode and collects their
//! study preferences before redirecting to course recommendations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
