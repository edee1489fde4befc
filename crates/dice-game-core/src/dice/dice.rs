//! Dice faces and pairwise win counts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// An ordered, immutable sequence of face values
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Dice(Vec<i64>);

impl Dice {
    /// Create a dice; `None` if `faces` is empty
    pub fn new(faces: Vec<i64>) -> Option<Self> {
        if faces.is_empty() {
            None
        } else {
            Some(Self(faces))
        }
    }

    pub fn faces(&self) -> &[i64] {
        &self.0
    }

    pub fn face_count(&self) -> usize {
        self.0.len()
    }

    pub fn face(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    /// Comma-joined face values, used as a label
    pub fn signature(&self) -> String {
        self.0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn count(&self, other: &Dice, ordering: Ordering) -> u64 {
        self.0
            .iter()
            .map(|x| other.0.iter().filter(|y| x.cmp(y) == ordering).count() as u64)
            .sum()
    }

    /// Number of face pairs `(x, y)` with `x > y`
    pub fn wins(&self, other: &Dice) -> u64 {
        self.count(other, Ordering::Greater)
    }

    pub fn ties(&self, other: &Dice) -> u64 {
        self.count(other, Ordering::Equal)
    }

    pub fn losses(&self, other: &Dice) -> u64 {
        self.count(other, Ordering::Less)
    }

    fn outcomes(&self, other: &Dice) -> u64 {
        (self.0.len() * other.0.len()) as u64
    }

    pub fn win_probability(&self, other: &Dice) -> Probability {
        Probability::new(self.wins(other), self.outcomes(other))
    }

    pub fn tie_probability(&self, other: &Dice) -> Probability {
        Probability::new(self.ties(other), self.outcomes(other))
    }

    /// Strict dominance: more winning face pairs than losing ones
    pub fn beats(&self, other: &Dice) -> bool {
        self.wins(other) > self.losses(other)
    }
}

impl TryFrom<Vec<i64>> for Dice {
    type Error = &'static str;

    fn try_from(faces: Vec<i64>) -> Result<Self, Self::Error> {
        Dice::new(faces).ok_or("a dice must have at least one face")
    }
}

impl From<Dice> for Vec<i64> {
    fn from(dice: Dice) -> Self {
        dice.0
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.signature())
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Exact probability as a reduced fraction
#[derive(Clone, Copy, Debug)]
pub struct Probability {
    numerator: u64,
    denominator: u64,
}

impl Probability {
    /// # Panics
    /// If `denominator` is zero or smaller than `numerator`.
    pub fn new(numerator: u64, denominator: u64) -> Self {
        assert!(denominator > 0, "probability denominator must be non-zero");
        assert!(numerator <= denominator, "probability cannot exceed one");
        let divisor = gcd(numerator as u128, denominator as u128) as u64;
        Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        }
    }

    pub fn one() -> Self {
        Self::new(1, 1)
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl PartialEq for Probability {
    fn eq(&self, other: &Self) -> bool {
        self.numerator as u128 * other.denominator as u128
            == other.numerator as u128 * self.denominator as u128
    }
}

impl Eq for Probability {}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.numerator as u128 * other.denominator as u128)
            .cmp(&(other.numerator as u128 * self.denominator as u128))
    }
}

/// Sum of two probabilities. The result is not clamped to one.
///
/// The common denominator is formed in `u128` and reduced before narrowing.
///
/// # Panics
/// If the reduced sum does not fit in `u64`.
impl Add for Probability {
    type Output = Probability;

    fn add(self, rhs: Self) -> Self::Output {
        let (lhs_den, rhs_den) = (self.denominator as u128, rhs.denominator as u128);
        let denominator = lhs_den / gcd(lhs_den, rhs_den) * rhs_den;
        let numerator = self.numerator as u128 * (denominator / lhs_den)
            + rhs.numerator as u128 * (denominator / rhs_den);
        let divisor = gcd(numerator, denominator);
        let narrow = |value: u128| u64::try_from(value / divisor).expect("reduced sum fits in u64");
        Probability {
            numerator: narrow(numerator),
            denominator: narrow(denominator),
        }
    }
}

/// Four decimal places unless a precision is given
impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", f.precision().unwrap_or(4), self.as_f64())
    }
}
