//! Crizzle dashboard shell.
//!
//! Client-side rendered Leptos application: a fixed set of top-level
//! sections, each loaded on first visit and swapped in place without a page
//! reload.

pub mod app;
pub mod platform;
pub mod routes;
pub mod state;
pub mod views;
