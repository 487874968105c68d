use std::fmt;
use std::iter::FromIterator;
use std::ops::{BitAnd, BitOr, Sub};

use itertools::Itertools;

use crate::puzzle::{Value, MAX_DOMAIN};

/// The remaining candidate values of one cell, one bit per value
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CandidateSet(u16);

impl CandidateSet {
    pub const fn new() -> Self {
        Self(0)
    }

    /// A set holding every value `1..=domain_size`
    pub fn with_all(domain_size: usize) -> Self {
        debug_assert!(domain_size <= MAX_DOMAIN);
        if domain_size >= MAX_DOMAIN {
            Self(u16::MAX)
        } else {
            Self((1u16 << domain_size) - 1)
        }
    }

    pub fn from_values(values: &[Value]) -> Self {
        values.iter().copied().collect()
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, value: Value) -> bool {
        value >= 1 && usize::from(value) <= MAX_DOMAIN && self.0 & bit(value) != 0
    }

    /// Returns true if the value was not already present
    pub fn insert(&mut self, value: Value) -> bool {
        let absent = !self.contains(value);
        self.0 |= bit(value);
        absent
    }

    /// Returns true if the value was present
    pub fn remove(&mut self, value: Value) -> bool {
        let present = self.contains(value);
        self.0 &= !bit(value);
        present
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The only value in the set, if there is exactly one
    pub fn single_value(self) -> Option<Value> {
        if self.len() == 1 {
            self.min()
        } else {
            None
        }
    }

    pub fn min(self) -> Option<Value> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as Value + 1)
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Every value of the domain not in this set
    pub fn complement(self, domain_size: usize) -> Self {
        Self::with_all(domain_size).difference(self)
    }

    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates values in ascending order
    pub fn iter(self) -> Iter {
        Iter(self.0)
    }
}

fn bit(value: Value) -> u16 {
    debug_assert!(value >= 1 && usize::from(value) <= MAX_DOMAIN);
    1 << (value - 1)
}

#[derive(Clone, Debug)]
pub struct Iter(u16);

impl Iterator for Iter {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let value = self.0.trailing_zeros() as Value + 1;
        self.0 &= self.0 - 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for CandidateSet {
    type Item = Value;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Value> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Value> for CandidateSet {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl BitOr for CandidateSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for CandidateSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Sub for CandidateSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::CandidateSet;

    #[test]
    fn insert_remove() {
        let mut set = CandidateSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(9));
        assert_eq!(2, set.len());
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(Some(9), set.single_value());
    }

    #[test]
    fn with_all() {
        assert_eq!(vec![1, 2, 3, 4], CandidateSet::with_all(4).iter().collect::<Vec<_>>());
        assert_eq!(16, CandidateSet::with_all(16).len());
        assert!(CandidateSet::with_all(16).contains(16));
    }

    #[test]
    fn set_operations() {
        let a = CandidateSet::from_values(&[1, 2, 5]);
        let b = CandidateSet::from_values(&[2, 5, 7]);
        assert_eq!(CandidateSet::from_values(&[1, 2, 5, 7]), a | b);
        assert_eq!(CandidateSet::from_values(&[2, 5]), a & b);
        assert_eq!(CandidateSet::from_values(&[1]), a - b);
        assert_eq!(
            CandidateSet::from_values(&[3, 4, 6, 7, 8, 9]),
            a.complement(9)
        );
        assert!(CandidateSet::from_values(&[2, 5]).is_subset(a));
    }

    #[test]
    fn single_value_requires_exactly_one() {
        assert_eq!(None, CandidateSet::new().single_value());
        assert_eq!(Some(4), CandidateSet::from_values(&[4]).single_value());
        assert_eq!(None, CandidateSet::from_values(&[4, 6]).single_value());
    }

    #[test]
    fn iter_resumes_from_clone() {
        let mut iter = CandidateSet::from_values(&[2, 4, 7]).iter();
        assert_eq!(Some(2), iter.next());
        let rest = iter.clone();
        assert_eq!(vec![4, 7], iter.collect::<Vec<_>>());
        assert_eq!(2, rest.len());
    }

    #[test]
    fn debug_format() {
        assert_eq!("{1, 8}", format!("{:?}", CandidateSet::from_values(&[8, 1])));
    }
}
