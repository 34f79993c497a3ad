//! Messaging-channel and MITM-attack simulation for `CryptoLab`.
//!
//! Two participants share a cipher key over a simulated conversation; an
//! attacker who does not know the key intercepts messages and tries to
//! decrypt (and possibly rewrite) them. The cipher arithmetic lives in
//! `cryptolab-core`; this crate owns the conversation records, the store,
//! and the simulators that orchestrate them.

pub mod messaging;
pub mod mitm;
pub mod record;
pub mod store;
