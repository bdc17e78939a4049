// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Shape / Polarization / Behavior Flags
// ─────────────────────────────────────────────────────────────────────
//! Closed flag sets describing one envelope term, and the token parser
//! that turns `+`-joined command-line lists into them.
//!
//! A term may combine several shapes and polarizations (`gauss+ring`,
//! `plus+minus`); behavior is single-select.

use std::cmp::Reverse;
use std::ops::BitOr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use condensate_types::{CondensateError, CondensateResult};

/// Separator between tokens of one combined list.
pub const TOKEN_SEPARATOR: &str = "+";

bitflags! {
    /// Spatial profile families.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Shape: u8 {
        const GAUSS       = 1 << 0;
        const OUTER_GAUSS = 1 << 1;
        const RING        = 1 << 2;
    }
}

bitflags! {
    /// Field components a term contributes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Polarization: u8 {
        const PLUS  = 1 << 0;
        const MINUS = 1 << 1;
        const BOTH  = Self::PLUS.bits() | Self::MINUS.bits();
    }
}

bitflags! {
    /// How a term is composited onto the accumulator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Behavior: u8 {
        const ADD      = 1 << 0;
        const MULTIPLY = 1 << 1;
        const REPLACE  = 1 << 2;
        const ADAPTIVE = 1 << 3;
    }
}

/// A flag set with a command-line token table.
pub trait FlagTokens: Copy + BitOr<Output = Self> + PartialEq + 'static {
    /// Name used in error messages.
    const KIND: &'static str;
    /// Token → flag lookup table.
    const TABLE: &'static [(&'static str, Self)];
}

impl FlagTokens for Shape {
    const KIND: &'static str = "shape";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("gauss", Shape::GAUSS),
        ("outerGauss", Shape::OUTER_GAUSS),
        ("ring", Shape::RING),
    ];
}

impl FlagTokens for Polarization {
    const KIND: &'static str = "polarization";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("plus", Polarization::PLUS),
        ("minus", Polarization::MINUS),
        ("both", Polarization::BOTH),
    ];
}

impl FlagTokens for Behavior {
    const KIND: &'static str = "behavior";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("add", Behavior::ADD),
        ("multiply", Behavior::MULTIPLY),
        ("replace", Behavior::REPLACE),
        ("adaptive", Behavior::ADAPTIVE),
    ];
}

/// Split `tokens` on `separator`, look every piece up in `table`, and
/// OR the results.
///
/// Any piece missing from the table (including an empty piece) fails
/// with `UnknownToken`. An empty separator treats `tokens` as one piece.
pub fn parse_combined_with<F>(
    tokens: &str,
    separator: &str,
    kind: &'static str,
    table: &[(&str, F)],
) -> CondensateResult<F>
where
    F: Copy + BitOr<Output = F>,
{
    let lookup = |piece: &str| {
        table
            .iter()
            .find(|(name, _)| *name == piece)
            .map(|(_, flag)| *flag)
            .ok_or_else(|| CondensateError::UnknownToken {
                kind,
                token: piece.to_string(),
            })
    };

    if separator.is_empty() {
        return lookup(tokens);
    }

    let mut pieces = tokens.split(separator);
    // split() always yields at least one piece
    let first = lookup(pieces.next().unwrap_or_default())?;
    pieces.try_fold(first, |acc, piece| -> CondensateResult<F> {
        Ok(acc | lookup(piece)?)
    })
}

/// Parse a combined token list against the flag type's own table.
pub fn parse_combined<F: FlagTokens>(tokens: &str, separator: &str) -> CondensateResult<F> {
    parse_combined_with(tokens, separator, F::KIND, F::TABLE)
}

/// Parse a behavior list, rejecting unions of distinct behaviors.
///
/// `add+add` is accepted (duplicates are idempotent); `add+multiply`
/// fails with `AmbiguousBehavior`.
pub fn parse_behavior(tokens: &str) -> CondensateResult<Behavior> {
    let behavior: Behavior = parse_combined(tokens, TOKEN_SEPARATOR)?;
    if behavior.bits().count_ones() > 1 {
        return Err(CondensateError::AmbiguousBehavior(tokens.to_string()));
    }
    Ok(behavior)
}

/// Canonical `+`-joined rendering. Composite entries win over their
/// parts, so `Polarization::BOTH` renders as `both`.
pub fn render_tokens<F>(flags: F) -> String
where
    F: FlagTokens + bitflags::Flags,
{
    let parts = |flag: F| F::TABLE.iter().filter(|(_, f)| flag.contains(*f)).count();
    let mut entries: Vec<_> = F::TABLE.iter().collect();
    entries.sort_by_key(|(_, flag)| Reverse(parts(*flag)));

    let mut covered = F::empty();
    let mut names = Vec::new();
    for (name, flag) in entries {
        if flags.contains(*flag) && !covered.contains(*flag) {
            covered = covered | *flag;
            names.push(*name);
        }
    }
    names.join(TOKEN_SEPARATOR)
}

/// One evolved field component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Plus,
    Minus,
}

impl Component {
    pub fn polarization(self) -> Polarization {
        match self {
            Component::Plus => Polarization::PLUS,
            Component::Minus => Polarization::MINUS,
        }
    }

    /// Suffix used in output names (`Psi_plus`, `n_minus`).
    pub fn suffix(self) -> &'static str {
        match self {
            Component::Plus => "plus",
            Component::Minus => "minus",
        }
    }
}
