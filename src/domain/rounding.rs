//! Explicit rounding direction for integer division.

/// Rounding direction for every division in the crate.
///
/// Outputs paid by a pool round [`Down`](Rounding::Down); inputs owed to
/// a pool round [`Up`](Rounding::Up). The pool is never short-changed by
/// truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Towards positive infinity (ceiling).
    Up,
    /// Towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
