//! CLI module for Render Manager

pub mod error;
pub mod output;

pub mod classify;
pub mod config;
pub mod farm;
pub mod layers;
pub mod versions;
