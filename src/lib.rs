//! Library to create retention-bounded backups of a Minecraft world folder.
//!
//! A backup cycle zips the world folder into a timestamped archive below a
//! backup root and evicts the oldest archive once the configured retention
//! bound is reached. Cycles are kicked off by host events (streaming or
//! recording stopped); the [`event`] module translates those into calls to
//! the [`archiver`].

#![forbid(unsafe_code)]

pub mod archiver;
pub mod cli;
pub mod config;
pub mod event;
