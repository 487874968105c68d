use std::fmt::{self, Display};

use itertools::Itertools;

use crate::graph::{Rank, Strength};

/// A path of distinct vertices, each joined to the next by a link of a known strength
#[derive(Clone, Debug, PartialEq)]
pub struct Chain<V> {
    vertices: Vec<V>,
    /// `strengths[i]` joins `vertices[i]` and `vertices[i + 1]`
    strengths: Vec<Strength>,
}

impl<V> Chain<V>
where
    V: Clone + PartialEq,
{
    pub fn new(start: V) -> Self {
        Self {
            vertices: vec![start],
            strengths: Vec::new(),
        }
    }

    /// Appends a vertex to the open end. Returns false, leaving the chain
    /// unchanged, if the vertex is already on the chain.
    pub fn add(&mut self, strength: Strength, vertex: V) -> bool {
        if self.contains(&vertex) {
            return false;
        }
        self.vertices.push(vertex);
        self.strengths.push(strength);
        true
    }

    /// Removes the open end. The start vertex is never removed.
    pub fn remove_last(&mut self) -> Option<(Strength, V)> {
        let strength = self.strengths.pop()?;
        let vertex = self.vertices.pop()?;
        Some((strength, vertex))
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.vertices.contains(vertex)
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn start(&self) -> &V {
        &self.vertices[0]
    }

    pub fn end(&self) -> &V {
        &self.vertices[self.vertices.len() - 1]
    }

    pub fn last_strength(&self) -> Option<Strength> {
        self.strengths.last().copied()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Every link as `(from, strength, to)`
    pub fn links(&self) -> impl Iterator<Item = (&V, Strength, &V)> {
        self.vertices
            .iter()
            .tuple_windows()
            .zip(&self.strengths)
            .map(|((a, b), &s)| (a, s, b))
    }

    pub fn is_alternating(&self) -> bool {
        self.strengths.iter().tuple_windows().all(|(a, b)| a != b)
    }

    pub fn for_each_link(&self, strength: Strength, mut handler: impl FnMut(&V, &V)) {
        for (a, s, b) in self.links() {
            if s == strength {
                handler(a, b);
            }
        }
    }

    /// Closes the chain with a link from its end back to its start. A loop needs
    /// at least three vertices.
    pub fn try_close_as_loop(&self, closing: Strength) -> Option<Loop<V>> {
        if self.vertices.len() < 3 {
            return None;
        }
        let mut strengths = self.strengths.clone();
        strengths.push(closing);
        Some(Loop {
            vertices: self.vertices.clone(),
            strengths,
        })
    }
}

impl<V: Rank> Chain<V> {
    /// Links plus the rank of every vertex. Shorter, simpler chains rank lower.
    pub fn rank(&self) -> usize {
        self.strengths.len() + self.vertices.iter().map(Rank::rank).sum::<usize>()
    }
}

impl<V: Display> Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertices[0])?;
        for (v, s) in self.vertices[1..].iter().zip(&self.strengths) {
            write!(f, " {} {}", link_symbol(*s), v)?;
        }
        Ok(())
    }
}

/// A closed chain. There are as many links as vertices; the last link joins
/// the last vertex back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Loop<V> {
    vertices: Vec<V>,
    strengths: Vec<Strength>,
}

impl<V> Loop<V> {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Every link as `(from, strength, to)`, including the closing link
    pub fn links(&self) -> impl Iterator<Item = (&V, Strength, &V)> {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .zip(&self.strengths)
            .map(|((a, b), &s)| (a, s, b))
    }

    pub fn for_each_link(&self, strength: Strength, mut handler: impl FnMut(&V, &V)) {
        for (a, s, b) in self.links() {
            if s == strength {
                handler(a, b);
            }
        }
    }

    /// True if strengths alternate all the way around, including across the closing link
    pub fn is_alternating(&self) -> bool {
        self.strengths.len() % 2 == 0
            && self
                .strengths
                .iter()
                .zip(self.strengths.iter().cycle().skip(1))
                .all(|(a, b)| a != b)
    }
}

impl<V: Display> Display for Loop<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (v, s) in self.vertices.iter().zip(&self.strengths) {
            write!(f, "{} {} ", v, link_symbol(*s))?;
        }
        write!(f, "{}", self.vertices[0])
    }
}

fn link_symbol(strength: Strength) -> &'static str {
    match strength {
        Strength::Strong => "=",
        Strength::Weak => "-",
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Chain, Strength};

    #[test]
    fn add_and_backtrack() {
        let mut chain = Chain::new('a');
        assert!(chain.add(Strength::Strong, 'b'));
        assert!(chain.add(Strength::Weak, 'c'));
        assert_eq!(3, chain.len());
        assert!(chain.is_alternating());
        assert_eq!(Some((Strength::Weak, 'c')), chain.remove_last());
        assert_eq!(Some((Strength::Strong, 'b')), chain.remove_last());
        assert_eq!(None, chain.remove_last());
        assert_eq!(&'a', chain.start());
        assert_eq!(&'a', chain.end());
    }

    #[test]
    fn rejects_repeated_vertex() {
        let mut chain = Chain::new('a');
        chain.add(Strength::Strong, 'b');
        assert!(!chain.add(Strength::Weak, 'a'));
        chain.add(Strength::Weak, 'c');
        assert!(!chain.add(Strength::Strong, 'b'));
        assert_eq!(vec!['a', 'b', 'c'], chain.vertices().to_vec());
    }

    #[test]
    fn close_loop() {
        let mut chain = Chain::new('a');
        chain.add(Strength::Strong, 'b');
        assert!(chain.try_close_as_loop(Strength::Weak).is_none());
        chain.add(Strength::Weak, 'c');
        chain.add(Strength::Strong, 'd');
        let cycle = chain.try_close_as_loop(Strength::Weak).unwrap();
        assert_eq!(4, cycle.len());
        assert!(cycle.is_alternating());
        let links: Vec<_> = cycle.links().map(|(a, s, b)| (*a, s, *b)).collect();
        assert_eq!(
            vec![
                ('a', Strength::Strong, 'b'),
                ('b', Strength::Weak, 'c'),
                ('c', Strength::Strong, 'd'),
                ('d', Strength::Weak, 'a'),
            ],
            links
        );
        let mut weak = Vec::new();
        cycle.for_each_link(Strength::Weak, |a, b| weak.push((*a, *b)));
        assert_eq!(vec![('b', 'c'), ('d', 'a')], weak);
    }

    #[test]
    fn odd_loop_is_not_alternating() {
        let mut chain = Chain::new(1);
        chain.add(Strength::Strong, 2);
        chain.add(Strength::Weak, 3);
        let cycle = chain.try_close_as_loop(Strength::Strong).unwrap();
        assert_eq!(3, cycle.links().count());
        assert!(!cycle.is_alternating());
    }

    #[test]
    fn display() {
        let mut chain = Chain::new(1);
        chain.add(Strength::Strong, 2);
        chain.add(Strength::Weak, 3);
        assert_eq!("1 = 2 - 3", chain.to_string());
    }
}
