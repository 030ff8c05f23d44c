//! HTTP handlers for the players domain

pub mod webhook;
