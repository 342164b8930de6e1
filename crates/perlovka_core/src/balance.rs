//! Sign balance of a pair of second differences.
//!
//! Grain shows up after differencing as two diagonal pairs whose signs mirror
//! each other: one pair leans positive, the other negative. Everything the
//! solver decides starts from the six-way classification below.

/// Signum relation of two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignBalance {
    /// Both values are zero.
    Zero,
    /// One value is positive, the other negative.
    Different,
    /// Both values are positive.
    Positive,
    /// Both values are negative.
    Negative,
    /// One value is positive, the other zero.
    SoftPositive,
    /// One value is negative, the other zero.
    SoftNegative,
}

impl SignBalance {
    /// Classify a pair of values by their signs.
    #[inline]
    pub fn of(a: i32, b: i32) -> Self {
        use std::cmp::Ordering::*;

        match (a.cmp(&0), b.cmp(&0)) {
            (Less, Less) => Self::Negative,
            (Less, Equal) | (Equal, Less) => Self::SoftNegative,
            (Less, Greater) | (Greater, Less) => Self::Different,
            (Greater, Equal) | (Equal, Greater) => Self::SoftPositive,
            (Greater, Greater) => Self::Positive,
            (Equal, Equal) => Self::Zero,
        }
    }

    #[inline]
    pub fn is_positive_like(self) -> bool {
        matches!(self, Self::Positive | Self::SoftPositive)
    }

    #[inline]
    pub fn is_negative_like(self) -> bool {
        matches!(self, Self::Negative | Self::SoftNegative)
    }

    /// One side positive, the other negative, with at most one side allowed a
    /// zero operand. A soft side only pairs with the strict opposite.
    #[inline]
    pub fn is_soft_complement(self, other: Self) -> bool {
        soft_complement(self, other)
    }

    /// Exactly `{Positive, Negative}`.
    #[inline]
    pub fn is_strict_complement(self, other: Self) -> bool {
        strict_complement(self, other)
    }
}

/// Free-function form of [`SignBalance::of`].
#[inline]
pub fn classify(a: i32, b: i32) -> SignBalance {
    SignBalance::of(a, b)
}

pub fn soft_complement(lhs: SignBalance, rhs: SignBalance) -> bool {
    use SignBalance::*;

    match lhs {
        Negative => rhs.is_positive_like(),
        Positive => rhs.is_negative_like(),
        SoftNegative => rhs == Positive,
        SoftPositive => rhs == Negative,
        Zero | Different => false,
    }
}

pub fn strict_complement(lhs: SignBalance, rhs: SignBalance) -> bool {
    use SignBalance::*;

    matches!((lhs, rhs), (Negative, Positive) | (Positive, Negative))
}
