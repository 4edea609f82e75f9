//! Canopy Sweep - orphaned canopy removal after tree felling
//!
//! When a tree is felled, the canopy blocks it held up are detected with
//! bounded searches over the 26-neighbour block graph and removed a slice at
//! a time from a tick scheduler, honouring land-claim hooks, break listeners
//! and daily block quotas.

pub mod core;
pub mod world;
pub mod config;
pub mod canopy;
pub mod schedule;
pub mod quota;
