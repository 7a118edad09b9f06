use std::collections::HashMap;

use super::Column;
use crate::error::{DataTableError, Result};

/// Columns in registration order, addressable by index or name.
#[derive(Clone, Debug, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Column> {
        self.by_name.get(name).map(|&index| &self.columns[index])
    }

    /// Like [`get`](Self::get), but a miss is a [`DataTableError::NotFound`].
    pub fn column(&self, index: usize) -> Result<&Column> {
        self.get(index).ok_or_else(|| {
            DataTableError::not_found(format!(
                "column index {} is out of range [0, {})",
                index,
                self.len()
            ))
        })
    }

    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.get_by_name(name)
            .ok_or_else(|| DataTableError::not_found(format!("unknown column '{}'", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Index the next pushed column will get.
    pub fn next_index(&self) -> usize {
        self.columns.len()
    }

    /// Appends a column built for [`next_index`](Self::next_index).
    pub(crate) fn push(&mut self, column: Column) -> Result<()> {
        if self.contains(column.name()) {
            return Err(DataTableError::configuration(format!(
                "there is already a column named '{}'",
                column.name()
            )));
        }
        debug_assert_eq!(column.index(), self.next_index());
        self.by_name
            .insert(column.name().to_string(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Column> {
        self.columns.iter_mut()
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
