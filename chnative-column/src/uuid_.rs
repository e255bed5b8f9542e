use std::sync::Arc;

use chnative_dtype::{DType, TypeRef};
use uuid::Uuid;

use crate::UInt64Column;
use crate::column::delegate_word_pairs;

/// UUIDs, stored as their high and low 64-bit halves.
#[derive(Debug, Clone)]
pub struct UuidColumn {
    dtype: TypeRef,
    data: UInt64Column,
}

impl UuidColumn {
    /// An empty column.
    pub fn new() -> Self {
        Self {
            dtype: Arc::new(DType::Uuid),
            data: UInt64Column::new(),
        }
    }

    /// Appends one UUID.
    pub fn append(&mut self, value: Uuid) {
        let (high, low) = value.as_u64_pair();
        self.data.append(high);
        self.data.append(low);
    }

    /// The UUID at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> Uuid {
        Uuid::from_u64_pair(self.data.at(index * 2), self.data.at(index * 2 + 1))
    }
}

impl Default for UuidColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Uuid> for UuidColumn {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut column = Self::new();
        for value in iter {
            column.append(value);
        }
        column
    }
}

delegate_word_pairs!(UuidColumn);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    #[test]
    fn halves_on_the_wire() {
        let id = Uuid::parse_str("00000000-0000-0001-0000-000000000002").unwrap();
        let column: UuidColumn = [id, Uuid::nil()].into_iter().collect();
        assert_eq!(column.len(), 2);

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire.len(), 32);
        assert_eq!(wire[0], 1);
        assert_eq!(wire[8], 2);

        let mut loaded = UuidColumn::new();
        loaded.load(&mut wire.as_slice(), 2).unwrap();
        assert_eq!(loaded.at(0), id);
        assert!(loaded.at(1).is_nil());
    }

    #[test]
    fn slice_and_default() {
        let mut column: UuidColumn = (1..=3u128).map(Uuid::from_u128).collect();
        column.append_default();
        let slice = column.slice(2, 2).unwrap();
        let slice = slice.downcast_ref::<UuidColumn>().unwrap();
        assert_eq!(slice.at(0), Uuid::from_u128(3));
        assert!(slice.at(1).is_nil());
    }
}
