//! An x402 payment facilitator: verifies and settles EIP-3009 `exact` payments over HTTP.
//!
//! # Modules
//!
//! - [`proto`] — wire types for `/verify`, `/settle`, `/supported`.
//! - [`crypto`] — EIP-712 domain/typed-data hashing and EIP-3009 authorization hashing.
//! - [`chain`] — per-network RPC client registry and the on-chain calls this facilitator makes.
//! - [`verify`] — the five-stage verification pipeline.
//! - [`settle`] — the settlement state machine built on top of the verify pipeline.
//! - [`catalog`] — derives `/supported` from configured networks.
//! - [`config`] — `config.yaml` plus environment loading and validation.
//! - [`facilitator`] — wires the pieces above behind one handle shared by HTTP handlers.
//! - [`handlers`] — the HTTP surface itself.

pub mod bigint;
pub mod catalog;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod facilitator;
pub mod handlers;
pub mod hex_types;
pub mod proto;
pub mod request_id;
pub mod settle;
pub mod sig_down;
pub mod verify;
