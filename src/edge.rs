//! A module for working with edges and weighted links.

use serde::{Deserialize, Serialize};

/// A pair of devices representing a graph edge. Edges don't have a direction: the endpoints are
/// stored in ascending order so `(a, b)` and `(b, a)` are the same edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T: Ord> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::edge::Edge;
    ///
    /// let edge = Edge::new("b", "a");
    /// assert_eq!(edge, Edge::new("a", "b"));
    /// assert_eq!(edge.source(), &"a");
    /// ```
    pub fn new(a: T, b: T) -> Self {
        if a <= b {
            Self {
                source: a,
                target: b,
            }
        } else {
            Self {
                source: b,
                target: a,
            }
        }
    }
}

impl<T> Edge<T> {
    /// Returns the lesser of the two vertices forming the edge.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the greater of the two vertices forming the edge.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether the edge contains the given vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    ///
    /// assert_eq!(edge.contains(&"a"), true);
    /// assert_eq!(edge.contains(&"c"), false);
    /// ```
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        &self.source == vertex || &self.target == vertex
    }

    /// Returns the endpoint opposite to `vertex`, if `vertex` is part of the edge.
    pub fn opposite(&self, vertex: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        if &self.source == vertex {
            Some(&self.target)
        } else if &self.target == vertex {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Returns whether both endpoints are the same vertex.
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }
}

/// A registered link between two devices, as entered. The weight is the cost (or latency) of
/// traversing the link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub u: String,
    pub v: String,
    pub weight: u32,
}

impl Link {
    pub fn new(u: impl Into<String>, v: impl Into<String>, weight: u32) -> Self {
        Self {
            u: u.into(),
            v: v.into(),
            weight,
        }
    }

    /// Returns the undirected edge this link spans.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::edge::{Edge, Link};
    ///
    /// let link = Link::new("S1", "R1", 10);
    /// assert_eq!(link.edge(), Edge::new("R1".to_owned(), "S1".to_owned()));
    /// ```
    pub fn edge(&self) -> Edge<String> {
        Edge::new(self.u.clone(), self.v.clone())
    }
}
