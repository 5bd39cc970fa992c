//! Sign classification and qualitative comparison of intervals.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::interval::Interval;

/// Sign of an interval. Unlike a real number, an interval can straddle
/// zero, and that case is distinct from the point zero.
///
/// `-a.sgn() == (-a).sgn()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Neg,
    Zero,
    Pos,
    /// Contains zero and at least one other point.
    OverZero,
}

impl std::ops::Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Neg => Sign::Pos,
            Sign::Pos => Sign::Neg,
            s => s,
        }
    }
}

/// The overlap states of two intervals, as enumerated by IEEE 1788.
///
/// The three empty states cannot arise from [`Interval`], which is never
/// empty; they exist so that [`RelationSet`] covers the full standard set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Relation {
    BothEmpty = 1 << 0,
    FirstEmpty = 1 << 1,
    SecondEmpty = 1 << 2,
    Before = 1 << 3,
    Meets = 1 << 4,
    Overlaps = 1 << 5,
    Starts = 1 << 6,
    ContainedBy = 1 << 7,
    Finishes = 1 << 8,
    Equals = 1 << 9,
    FinishedBy = 1 << 10,
    Contains = 1 << 11,
    StartedBy = 1 << 12,
    OverlappedBy = 1 << 13,
    MetBy = 1 << 14,
    After = 1 << 15,
}

impl Relation {
    pub const ALL: [Relation; 16] = [
        Relation::BothEmpty,
        Relation::FirstEmpty,
        Relation::SecondEmpty,
        Relation::Before,
        Relation::Meets,
        Relation::Overlaps,
        Relation::Starts,
        Relation::ContainedBy,
        Relation::Finishes,
        Relation::Equals,
        Relation::FinishedBy,
        Relation::Contains,
        Relation::StartedBy,
        Relation::OverlappedBy,
        Relation::MetBy,
        Relation::After,
    ];

    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// The relation seen from the other interval: `b.relation(a)` given
    /// `a.relation(b)`.
    pub fn converse(self) -> Relation {
        match self {
            Relation::BothEmpty => Relation::BothEmpty,
            Relation::FirstEmpty => Relation::SecondEmpty,
            Relation::SecondEmpty => Relation::FirstEmpty,
            Relation::Before => Relation::After,
            Relation::Meets => Relation::MetBy,
            Relation::Overlaps => Relation::OverlappedBy,
            Relation::Starts => Relation::StartedBy,
            Relation::ContainedBy => Relation::Contains,
            Relation::Finishes => Relation::FinishedBy,
            Relation::Equals => Relation::Equals,
            Relation::FinishedBy => Relation::Finishes,
            Relation::Contains => Relation::ContainedBy,
            Relation::StartedBy => Relation::Starts,
            Relation::OverlappedBy => Relation::Overlaps,
            Relation::MetBy => Relation::Meets,
            Relation::After => Relation::Before,
        }
    }
}

/// A set of [`Relation`]s, stored as bit flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RelationSet(u16);

impl RelationSet {
    pub const EMPTY: RelationSet = RelationSet(0);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, r: Relation) -> bool {
        self.0 & r.bits() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Relation> {
        Relation::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl From<Relation> for RelationSet {
    fn from(r: Relation) -> Self {
        RelationSet(r.bits())
    }
}

impl BitOr for RelationSet {
    type Output = RelationSet;

    fn bitor(self, rhs: RelationSet) -> RelationSet {
        RelationSet(self.0 | rhs.0)
    }
}

impl BitOr<Relation> for RelationSet {
    type Output = RelationSet;

    fn bitor(self, rhs: Relation) -> RelationSet {
        RelationSet(self.0 | rhs.bits())
    }
}

impl BitOr for Relation {
    type Output = RelationSet;

    fn bitor(self, rhs: Relation) -> RelationSet {
        RelationSet(self.bits() | rhs.bits())
    }
}

impl BitOrAssign<Relation> for RelationSet {
    fn bitor_assign(&mut self, rhs: Relation) {
        self.0 |= rhs.bits();
    }
}

impl fmt::Debug for RelationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Coarse position of one interval relative to another, as computed by
/// [`Interval::cmp_detailed`]. `Subset` and `Superset` each stand for three
/// overlap states that differ only in which endpoints coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Before,
    Meets,
    Overlaps,
    Subset,
    Equals,
    Superset,
    OverlappedBy,
    MetBy,
    After,
}

impl Position {
    pub fn relations(self) -> RelationSet {
        match self {
            Position::Before => Relation::Before.into(),
            Position::Meets => Relation::Meets.into(),
            Position::Overlaps => Relation::Overlaps.into(),
            Position::Subset => Relation::Starts | Relation::ContainedBy | Relation::Finishes,
            Position::Equals => Relation::Equals.into(),
            Position::Superset => Relation::FinishedBy | Relation::Contains | Relation::StartedBy,
            Position::OverlappedBy => Relation::OverlappedBy.into(),
            Position::MetBy => Relation::MetBy.into(),
            Position::After => Relation::After.into(),
        }
    }

    pub fn converse(self) -> Position {
        match self {
            Position::Before => Position::After,
            Position::Meets => Position::MetBy,
            Position::Overlaps => Position::OverlappedBy,
            Position::Subset => Position::Superset,
            Position::Equals => Position::Equals,
            Position::Superset => Position::Subset,
            Position::OverlappedBy => Position::Overlaps,
            Position::MetBy => Position::Meets,
            Position::After => Position::Before,
        }
    }
}

/// Infinities of equal sign compare equal. NaN compares equal to anything.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Interval {
    pub fn sgn(&self) -> Sign {
        if self.lo() > 0.0 {
            Sign::Pos
        } else if self.hi() < 0.0 {
            Sign::Neg
        } else if self.is_point() {
            Sign::Zero
        } else {
            Sign::OverZero
        }
    }

    /// `Less` if every point of `self` is below every point of `other`,
    /// `Greater` if every point is above, `Equal` if they share a point.
    pub fn order(&self, other: &Interval) -> Ordering {
        if self.hi() < other.lo() {
            Ordering::Less
        } else if self.lo() > other.hi() {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Position of `self` relative to `other`, decided from the four
    /// pairwise endpoint comparisons. Total over all pairs of intervals.
    pub fn cmp_detailed(&self, other: &Interval) -> Position {
        use Ordering::*;

        let ll = cmp_f64(self.lo(), other.lo());
        let hl = cmp_f64(self.hi(), other.lo());
        let lh = cmp_f64(self.lo(), other.hi());
        let hh = cmp_f64(self.hi(), other.hi());

        if hl == Less {
            return Position::Before;
        }
        if ll == Less && hh == Less {
            return if hl == Equal {
                Position::Meets
            } else {
                Position::Overlaps
            };
        }
        if lh == Greater {
            return Position::After;
        }
        if ll == Greater && hh == Greater {
            return if lh == Equal {
                Position::MetBy
            } else {
                Position::OverlappedBy
            };
        }
        if ll == hh {
            return Position::Equals;
        }
        if ll > hh {
            Position::Subset
        } else {
            Position::Superset
        }
    }

    /// The single overlap state of `self` relative to `other`; refines
    /// [`Interval::cmp_detailed`] so that the result is always a member of
    /// its [`Position::relations`].
    pub fn relation(&self, other: &Interval) -> Relation {
        use Ordering::*;

        let pos = self.cmp_detailed(other);
        let ll = cmp_f64(self.lo(), other.lo());
        let hh = cmp_f64(self.hi(), other.hi());
        match pos {
            Position::Before => Relation::Before,
            Position::Meets => Relation::Meets,
            Position::Overlaps => Relation::Overlaps,
            Position::Equals => Relation::Equals,
            Position::OverlappedBy => Relation::OverlappedBy,
            Position::MetBy => Relation::MetBy,
            Position::After => Relation::After,
            Position::Subset => match (ll, hh) {
                (Equal, _) => Relation::Starts,
                (_, Equal) => Relation::Finishes,
                _ => Relation::ContainedBy,
            },
            Position::Superset => match (ll, hh) {
                (Equal, _) => Relation::StartedBy,
                (_, Equal) => Relation::FinishedBy,
                _ => Relation::Contains,
            },
        }
    }
}
