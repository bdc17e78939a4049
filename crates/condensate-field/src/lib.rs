// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Field Model
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Field model for the two-component condensate solver.
//!
//! - `flags`: shape / polarization / behavior sets and their token parser
//! - `envelope`: ordered term lists built from the argument vector
//! - `composite`: the order-sensitive compositing contract
//! - `domain`: grid / subgrid / halo descriptor
//! - `roles`: the seven envelopes of a run
//!
//! Nothing here evaluates the field; the kernel consumes these
//! descriptions read-only.

pub mod composite;
pub mod domain;
pub mod envelope;
pub mod flags;
pub mod roles;

pub use composite::{composite, ProfileEvaluator, REPLACE_THRESHOLD};
pub use domain::{DomainDecomposition, SubgridBounds};
pub use envelope::{Envelope, SpatialTerm, TemporalTerm};
pub use flags::{
    parse_behavior, parse_combined, parse_combined_with, Behavior, Component, FlagTokens,
    Polarization, Shape, TOKEN_SEPARATOR,
};
pub use roles::{FieldRole, FieldRoles};
