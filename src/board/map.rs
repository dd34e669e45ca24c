//! The territory graph.
//!
//! Maps are built programmatically (`Map::new` + `add_territory` + `connect`)
//! or deserialized from JSON. Adjacency is stored on each territory and kept
//! symmetric by `connect`; `validate` checks everything a hand-written map
//! file can get wrong.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::territory::{Continent, Territory, TerritoryId};
use crate::error::GameError;

/// A named map: territories, their adjacency, and continents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    pub territories: Vec<Territory>,
    #[serde(default)]
    pub continents: Vec<Continent>,
}

impl Map {
    /// Creates an empty map.
    pub fn new(name: impl Into<String>) -> Self {
        Map {
            name: name.into(),
            territories: Vec::new(),
            continents: Vec::new(),
        }
    }

    /// Parses a map from its JSON form.
    pub fn from_json_str(s: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Appends a territory and returns its id.
    pub fn add_territory(&mut self, name: impl Into<String>) -> TerritoryId {
        let id = TerritoryId(self.territories.len());
        self.territories.push(Territory::new(id, name));
        id
    }

    /// Connects two territories in both directions. Duplicate edges are ignored.
    pub fn connect(&mut self, a: TerritoryId, b: TerritoryId) -> Result<(), GameError> {
        self.territory(a)?;
        self.territory(b)?;
        if !self.territories[a.0].adjacent.contains(&b) {
            self.territories[a.0].adjacent.push(b);
        }
        if !self.territories[b.0].adjacent.contains(&a) {
            self.territories[b.0].adjacent.push(a);
        }
        Ok(())
    }

    /// Declares a continent over already-added territories.
    pub fn add_continent(
        &mut self,
        name: impl Into<String>,
        bonus: u32,
        territories: &[TerritoryId],
    ) -> Result<(), GameError> {
        for &t in territories {
            self.territory(t)?;
        }
        self.continents.push(Continent {
            name: name.into(),
            bonus,
            territories: territories.to_vec(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn territory(&self, id: TerritoryId) -> Result<&Territory, GameError> {
        self.territories
            .get(id.0)
            .ok_or(GameError::TerritoryNotFound(id.0))
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> Result<&mut Territory, GameError> {
        self.territories
            .get_mut(id.0)
            .ok_or(GameError::TerritoryNotFound(id.0))
    }

    /// Looks a territory up by raw index, as console input supplies it.
    pub fn territory_by_index(&self, index: usize) -> Result<&Territory, GameError> {
        self.territory(TerritoryId(index))
    }

    pub fn adjacent_territories(&self, id: TerritoryId) -> Result<&[TerritoryId], GameError> {
        Ok(&self.territory(id)?.adjacent)
    }

    pub fn is_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.territories
            .get(a.0)
            .is_some_and(|t| t.is_adjacent_to(b))
    }

    /// Sum of army counts on every territory.
    pub fn total_armies(&self) -> u64 {
        self.territories.iter().map(|t| u64::from(t.armies)).sum()
    }

    /// Checks the map is playable.
    ///
    /// A valid map is non-empty, has in-range and symmetric adjacency without
    /// self-loops, and is connected. If continents are declared, every
    /// territory belongs to exactly one of them and each continent is a
    /// connected subgraph.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.territories.is_empty() {
            return Err(GameError::InvalidMap("map has no territories".into()));
        }

        for (i, t) in self.territories.iter().enumerate() {
            if t.id.0 != i {
                return Err(GameError::InvalidMap(format!(
                    "territory '{}' has id {} but sits at index {}",
                    t.name, t.id, i
                )));
            }
            for &n in &t.adjacent {
                if n == t.id {
                    return Err(GameError::InvalidMap(format!("{} is adjacent to itself", t.id)));
                }
                let other = self.territories.get(n.0).ok_or_else(|| {
                    GameError::InvalidMap(format!("{} lists unknown neighbour {}", t.id, n))
                })?;
                if !other.is_adjacent_to(t.id) {
                    return Err(GameError::InvalidMap(format!(
                        "edge {} -> {} has no reverse edge",
                        t.id, n
                    )));
                }
            }
        }

        let all: Vec<TerritoryId> = self.territories.iter().map(|t| t.id).collect();
        if !self.is_connected_subgraph(&all) {
            return Err(GameError::InvalidMap("map graph is not connected".into()));
        }

        if self.continents.is_empty() {
            return Ok(());
        }

        let mut membership = vec![0usize; self.territories.len()];
        for c in &self.continents {
            if c.territories.is_empty() {
                return Err(GameError::InvalidMap(format!("continent '{}' is empty", c.name)));
            }
            for &t in &c.territories {
                let slot = membership.get_mut(t.0).ok_or_else(|| {
                    GameError::InvalidMap(format!("continent '{}' lists unknown {}", c.name, t))
                })?;
                *slot += 1;
            }
            if !self.is_connected_subgraph(&c.territories) {
                return Err(GameError::InvalidMap(format!(
                    "continent '{}' is not connected",
                    c.name
                )));
            }
        }
        if let Some(i) = membership.iter().position(|&m| m != 1) {
            return Err(GameError::InvalidMap(format!(
                "{} belongs to {} continents",
                TerritoryId(i),
                membership[i]
            )));
        }

        Ok(())
    }

    /// Breadth-first search restricted to `nodes`.
    fn is_connected_subgraph(&self, nodes: &[TerritoryId]) -> bool {
        let Some(&start) = nodes.first() else {
            return true;
        };
        let mut inside = vec![false; self.territories.len()];
        for &n in nodes {
            if let Some(slot) = inside.get_mut(n.0) {
                *slot = true;
            }
        }

        let mut seen = vec![false; self.territories.len()];
        let mut queue = VecDeque::from([start]);
        seen[start.0] = true;
        let mut reached = 1;
        while let Some(cur) = queue.pop_front() {
            for &n in &self.territories[cur.0].adjacent {
                if inside.get(n.0) == Some(&true) && !seen[n.0] {
                    seen[n.0] = true;
                    reached += 1;
                    queue.push_back(n);
                }
            }
        }
        reached == nodes.len()
    }

    /// A small built-in map with twelve territories over three continents.
    pub fn classic() -> Self {
        const NAMES: [&str; 12] = [
            "Aurora", "Borealis", "Cascade", "Dunmore", "Ember", "Fallow", "Glen", "Harrow",
            "Isle", "Juniper", "Kestrel", "Lowmarsh",
        ];
        const EDGES: [(usize, usize); 17] = [
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 3),
            (2, 3),
            (2, 4),
            (3, 7),
            (4, 5),
            (4, 6),
            (5, 6),
            (6, 8),
            (7, 8),
            (7, 9),
            (8, 9),
            (8, 10),
            (9, 11),
            (10, 11),
        ];

        let mut map = Map::new("classic");
        for name in NAMES {
            map.add_territory(name);
        }
        for (a, b) in EDGES {
            map.territories[a].adjacent.push(TerritoryId(b));
            map.territories[b].adjacent.push(TerritoryId(a));
        }
        let ids = |r: std::ops::Range<usize>| r.map(TerritoryId).collect::<Vec<_>>();
        map.continents = vec![
            Continent { name: "North".into(), bonus: 3, territories: ids(0..4) },
            Continent { name: "West".into(), bonus: 2, territories: ids(4..7) },
            Continent { name: "South".into(), bonus: 4, territories: ids(7..12) },
        ];
        map
    }
}
