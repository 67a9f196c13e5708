use std::cmp::Ordering;
use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

use super::datatype::Value;

/// A caller-chosen key addressing a row independently of its position.
///
/// IDs of the same kind are ordered naturally. IDs of different kinds have no
/// order between them, so a table mixing both cannot be sorted by row ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RowId {
    Integer(i64),
    Text(String),
}

impl PartialOrd for RowId {
    fn partial_cmp(&self, other: &RowId) -> Option<Ordering> {
        match (self, other) {
            (RowId::Integer(a), RowId::Integer(b)) => Some(a.cmp(b)),
            (RowId::Text(a), RowId::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Integer(id) => write!(f, "{}", id),
            RowId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> RowId {
        RowId::Text(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> RowId {
        RowId::Text(id)
    }
}

impl From<&String> for RowId {
    fn from(id: &String) -> RowId {
        RowId::Text(id.clone())
    }
}

impl From<&RowId> for RowId {
    fn from(id: &RowId) -> RowId {
        id.clone()
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> RowId {
        RowId::Integer(id)
    }
}

impl From<i32> for RowId {
    fn from(id: i32) -> RowId {
        RowId::Integer(id.into())
    }
}

impl From<usize> for RowId {
    fn from(id: usize) -> RowId {
        RowId::Integer(id as i64)
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Value {
        match id {
            RowId::Integer(id) => Value::Integer(id),
            RowId::Text(id) => Value::String(id),
        }
    }
}

/// Why a set of row ID mappings could not be put in sorted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortFailure {
    NotBijective { ids: usize },
    MixedKinds,
}

/// Maps row IDs to row positions in a [`super::store::RowStore`].
///
/// Several IDs may point at the same position, and a position may have no ID
/// at all. Insertion order of the IDs is preserved.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowIndex {
    key_index_map: IndexMap<RowId, usize>,
}

impl RowIndex {
    pub fn insert(&mut self, key: RowId, index: usize) {
        self.key_index_map.insert(key, index);
    }

    pub fn get(&self, key: &RowId) -> Option<usize> {
        self.key_index_map.get(key).copied()
    }

    pub fn contains(&self, key: &RowId) -> bool {
        self.key_index_map.contains_key(key)
    }

    pub fn remove(&mut self, key: &RowId) -> Option<usize> {
        self.key_index_map.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.key_index_map.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowId> {
        self.key_index_map.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&RowId, usize)> {
        self.key_index_map.iter().map(|(key, index)| (key, *index))
    }

    pub fn sorted_positions(&self, n_rows: usize) -> Result<Vec<usize>, SortFailure> {
        //! Row positions ordered by their IDs.
        //!
        //! Requires the mapping to be a bijection onto `0..n_rows` and every ID
        //! to be of the same kind.

        if self.key_index_map.len() != n_rows {
            return Err(SortFailure::NotBijective {
                ids: self.key_index_map.len(),
            });
        }

        let mut seen = vec![false; n_rows];
        for &index in self.key_index_map.values() {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(SortFailure::NotBijective {
                        ids: self.key_index_map.len(),
                    });
                }
            }
        }

        let mut entries: Vec<(&RowId, usize)> = self.entries().collect();
        if let Some((first, _)) = entries.first() {
            let comparable = entries
                .iter()
                .all(|(key, _)| first.partial_cmp(key).is_some());
            if !comparable {
                return Err(SortFailure::MixedKinds);
            }
        }

        entries.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Ok(entries.into_iter().map(|(_, index)| index).collect())
    }

    pub fn shift_by(self, offset: usize) -> impl Iterator<Item = (RowId, usize)> {
        //! Consume the index, yielding every mapping moved `offset` rows down.

        self.key_index_map
            .into_iter()
            .map(move |(key, index)| (key, index + offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_positions_follow_id_order() {
        let mut index = RowIndex::default();
        index.insert(RowId::from("c"), 0);
        index.insert(RowId::from("a"), 1);
        index.insert(RowId::from("b"), 2);

        assert_eq!(index.sorted_positions(3), Ok(vec![1, 2, 0]));
    }

    #[test]
    fn sorted_positions_require_a_bijection() {
        let mut index = RowIndex::default();
        index.insert(RowId::from("a"), 0);
        index.insert(RowId::from("b"), 0);

        assert_eq!(
            index.sorted_positions(2),
            Err(SortFailure::NotBijective { ids: 2 })
        );
        assert_eq!(
            index.sorted_positions(3),
            Err(SortFailure::NotBijective { ids: 2 })
        );
    }

    #[test]
    fn sorted_positions_reject_mixed_kinds() {
        let mut index = RowIndex::default();
        index.insert(RowId::from("a"), 0);
        index.insert(RowId::from(7i64), 1);

        assert_eq!(index.sorted_positions(2), Err(SortFailure::MixedKinds));
    }
}
