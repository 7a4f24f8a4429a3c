use std::fmt;

/// Value predicates applied to numeric scalars, both when configuration
/// fields are assigned and when result documents are decoded.
///
/// Every constraint other than [`Constraint::Any`] also requires the value to
/// be finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Constraint {
    /// No domain restriction.
    #[default]
    Any,
    /// Rejects NaN and the infinities.
    Finite,
    /// Finite and `>= 0`.
    NonNegative,
    /// Finite and `> 0`.
    Positive,
    /// Finite and `> 0`, or exactly `-1` as a "not available" marker.
    PositiveOrSentinel,
}

/// The sentinel accepted by [`Constraint::PositiveOrSentinel`].
pub const SENTINEL: f64 = -1.0;

impl Constraint {
    /// Checks a floating-point value, returning a human-readable reason on failure.
    pub fn check(self, value: f64) -> Result<(), String> {
        if self == Constraint::Any {
            return Ok(());
        }
        if !value.is_finite() {
            return Err(format!("expected a finite number, got {}", value));
        }
        match self {
            Constraint::Any | Constraint::Finite => Ok(()),
            Constraint::NonNegative if value >= 0.0 => Ok(()),
            Constraint::NonNegative => Err(format!("expected a non-negative number, got {}", value)),
            Constraint::Positive if value > 0.0 => Ok(()),
            Constraint::Positive => Err(format!("expected a strictly positive number, got {}", value)),
            Constraint::PositiveOrSentinel if value > 0.0 || value == SENTINEL => Ok(()),
            Constraint::PositiveOrSentinel => Err(format!(
                "expected a strictly positive number or {}, got {}",
                SENTINEL, value
            )),
        }
    }

    pub fn check_int(self, value: i64) -> Result<(), String> {
        self.check(value as f64)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constraint::Any => "any",
            Constraint::Finite => "finite",
            Constraint::NonNegative => "non-negative",
            Constraint::Positive => "positive",
            Constraint::PositiveOrSentinel => "positive-or-sentinel",
        })
    }
}
