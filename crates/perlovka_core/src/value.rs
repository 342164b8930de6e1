//! Difference pairs and the compensation policies applied to them.

use crate::balance::SignBalance;

/// Two differences read from the plane together with their sign balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairValue {
    pub a: i32,
    pub b: i32,
    pub balance: SignBalance,
}

impl PairValue {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            a,
            b,
            balance: SignBalance::of(a, b),
        }
    }

    /// Operand furthest from zero, as a non-negative amount.
    #[inline]
    pub fn magnitude_far(&self) -> i32 {
        if self.balance.is_positive_like() {
            self.a.max(self.b)
        } else {
            self.a.min(self.b).saturating_neg()
        }
    }

    /// Operand closest to zero, as a non-negative amount. Zero when the pair
    /// has no common sign.
    #[inline]
    pub fn magnitude_near(&self) -> i32 {
        let non_zero = if self.a == 0 { self.b } else { self.a };

        match self.balance {
            SignBalance::Positive => self.a.min(self.b),
            SignBalance::Negative => self.a.max(self.b).saturating_neg(),
            SignBalance::SoftPositive => non_zero,
            SignBalance::SoftNegative => non_zero.saturating_neg(),
            SignBalance::Zero | SignBalance::Different => 0,
        }
    }

    /// Move both operands toward zero by `delta`.
    ///
    /// The balance is left as read; the pair is written back right after.
    #[inline]
    pub fn apply_delta(&mut self, delta: i32) {
        if self.balance.is_positive_like() {
            self.a = self.a.saturating_sub(delta);
            self.b = self.b.saturating_sub(delta);
        } else {
            self.a = self.a.saturating_add(delta);
            self.b = self.b.saturating_add(delta);
        }
    }
}

/// Fields matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MatchMode {
    /// One operand in a pair may be zero.
    Soft,
    /// Both operands of one pair strictly positive, of the other strictly negative.
    #[default]
    Strict,
}

impl MatchMode {
    #[inline]
    pub fn matches(self, lhs: &PairValue, rhs: &PairValue) -> bool {
        match self {
            Self::Soft => match_soft(lhs, rhs),
            Self::Strict => match_strict(lhs, rhs),
        }
    }
}

pub fn match_strict(lhs: &PairValue, rhs: &PairValue) -> bool {
    lhs.balance.is_strict_complement(rhs.balance)
}

pub fn match_soft(lhs: &PairValue, rhs: &PairValue) -> bool {
    lhs.balance.is_soft_complement(rhs.balance)
}

/// Grain compensation greediness, from least to most aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ResolveMode {
    /// Smallest of the near magnitudes.
    Minimal,
    /// Smallest of the far magnitudes.
    #[default]
    LeastOfMax,
    /// Largest of the near magnitudes.
    LargestOfMin,
    /// Largest of the far magnitudes.
    Maximal,
}

impl ResolveMode {
    /// Compensation shared by a matched couple of pairs. Never negative.
    #[inline]
    pub fn delta(self, lhs: &PairValue, rhs: &PairValue) -> i32 {
        match self {
            Self::Minimal => minimal_delta(lhs, rhs),
            Self::LeastOfMax => least_of_max_delta(lhs, rhs),
            Self::LargestOfMin => largest_of_min_delta(lhs, rhs),
            Self::Maximal => maximal_delta(lhs, rhs),
        }
    }
}

pub fn minimal_delta(lhs: &PairValue, rhs: &PairValue) -> i32 {
    lhs.magnitude_near().min(rhs.magnitude_near())
}

pub fn least_of_max_delta(lhs: &PairValue, rhs: &PairValue) -> i32 {
    lhs.magnitude_far().min(rhs.magnitude_far())
}

pub fn largest_of_min_delta(lhs: &PairValue, rhs: &PairValue) -> i32 {
    lhs.magnitude_near().max(rhs.magnitude_near())
}

pub fn maximal_delta(lhs: &PairValue, rhs: &PairValue) -> i32 {
    lhs.magnitude_far().max(rhs.magnitude_far())
}
