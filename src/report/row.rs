use std::fmt::Display;

use super::column::NULL_TEXT;
use super::datatype::Value;

/// One fixed-length row of cells. A `None` cell was never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Vec<Option<Value>>);

impl Row {
    pub fn empty(width: usize) -> Row {
        Row(vec![None; width])
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn text(&self, index: usize) -> String {
        //! Plain textual form of a cell, the basis of table equality.

        match self.get(index) {
            Some(value) => value.to_string(),
            None => NULL_TEXT.to_string(),
        }
    }

    pub fn starts_with(&self, values: &[Value]) -> bool {
        values.len() <= self.0.len()
            && values
                .iter()
                .zip(self.0.iter())
                .all(|(wanted, cell)| cell.as_ref() == Some(wanted))
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row: Vec<String> = (0..self.0.len()).map(|index| self.text(index)).collect();
        write!(f, "{}", row.join(" | "))
    }
}
