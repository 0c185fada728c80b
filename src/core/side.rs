use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two competing teams.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides in a stable order.
    pub const fn sides() -> [Side; 2] {
        [Side::A, Side::B]
    }

    /// The other team.
    ///
    /// ```
    /// use petanque_sim::core::Side;
    ///
    /// assert_eq!(Side::B, Side::A.opponent());
    /// assert_eq!(Side::A, Side::B.opponent());
    /// ```
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// A value kept for each side, indexable by [`Side`].
///
/// ```
/// use petanque_sim::core::{PerSide, Side};
///
/// let mut balls = PerSide::splat(6u8);
/// balls[Side::B] -= 1;
/// assert_eq!(6, balls[Side::A]);
/// assert_eq!(5, balls[Side::B]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PerSide<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerSide<T> {
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build both values from a function of the side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            a: f(Side::A),
            b: f(Side::B),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerSide<U> {
        PerSide {
            a: f(self.a),
            b: f(self.b),
        }
    }

    pub fn as_ref(&self) -> PerSide<&T> {
        PerSide {
            a: &self.a,
            b: &self.b,
        }
    }

    /// Mutable access to the value for `side` and its opponent at once.
    pub fn split_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        match side {
            Side::A => (&mut self.a, &mut self.b),
            Side::B => (&mut self.b, &mut self.a),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::A, &self.a), (Side::B, &self.b)].into_iter()
    }
}

impl<T: Clone> PerSide<T> {
    pub fn splat(value: T) -> Self {
        Self {
            a: value.clone(),
            b: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mut_puts_side_first() {
        let mut counts = PerSide::new(1, 2);
        let (own, opp) = counts.split_mut(Side::B);
        *own += 10;
        *opp += 20;
        assert_eq!(PerSide::new(21, 12), counts);
    }

    #[test]
    fn test_from_fn_and_iter_order() {
        let names = PerSide::from_fn(|side| side.to_string());
        let collected: Vec<_> = names.iter().map(|(s, n)| (s, n.clone())).collect();
        assert_eq!(
            vec![(Side::A, "A".to_string()), (Side::B, "B".to_string())],
            collected
        );
    }
}
