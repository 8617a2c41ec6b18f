//! # Devsync Core Library
//!
//! This crate contains the core logic of the `devsync` tool – a repo-local
//! bootstrapper that pins a Node.js runtime and a matching pnpm install for a
//! single repository checkout.
//!
//! `devsync` installs both tools into a repository-scoped bin root
//! (`.devsync/bin`) behind small wrapper shims, so no system-wide installs or
//! privileges are involved. Reconciliation is idempotent: a tool already at
//! its pinned version is never touched.
//!
//! This library is built for the `devsync` CLI, but the pieces can be reused
//! from other setup tooling.
//!
//! ## Modules Overview
//! - [`config`] – Typed loading and validation of `devsync.toml`
//! - [`manifest`] – Reading the pnpm version pin out of `package.json`
//! - [`node`] – Installing the pinned Node.js runtime into the bin root
//! - [`pnpm`] – Reconciling and installing the pinned pnpm version
//! - [`proc`] – Subprocess helpers (streamed and captured runs)
//! - [`util`] – Shared utilities (bin-root paths, shim templating, hashing)
//! - [`global`] – User-level state (the download cache)


pub mod config;
pub mod manifest;
pub mod node;
pub mod pnpm;
pub mod proc;
pub mod util;
pub mod global;

pub use config::*;
pub use manifest::*;
pub use util::*;
pub use global::cache::*;
