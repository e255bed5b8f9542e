use std::any::Any;
use std::sync::Arc;

use chnative_dtype::{DType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail};
use chnative_io::{WireRead, WireWrite};
use itertools::Itertools;

use crate::column::{check_code, same_column, slice_range};
use crate::{Column, ColumnRef, create_column};

/// Rows of fixed-arity tuples, stored as one column per element.
///
/// Every element column has the same number of rows. On the wire the element columns follow
/// each other in order.
#[derive(Debug)]
pub struct TupleColumn {
    dtype: TypeRef,
    columns: Vec<ColumnRef>,
}

impl TupleColumn {
    /// An empty column of `dtype`, which must be a `Tuple`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        check_code(&dtype, TypeCode::Tuple)?;
        let columns = dtype
            .tuple_types()
            .iter()
            .map(create_column)
            .collect::<ChResult<Vec<_>>>()?;
        Ok(Self { dtype, columns })
    }

    /// A column over element columns of equal length.
    pub fn from_columns(columns: Vec<ColumnRef>) -> ChResult<Self> {
        if columns.is_empty() {
            ch_bail!("a tuple needs at least one element");
        }
        if !columns.iter().map(|c| c.len()).all_equal() {
            ch_bail!(
                "tuple elements have different lengths: {}",
                columns.iter().map(|c| c.len()).join(", ")
            );
        }
        let dtype = Arc::new(DType::try_tuple(columns.iter().map(|c| c.dtype().clone()))?);
        Ok(Self { dtype, columns })
    }

    /// The element column at `index`.
    pub fn column(&self, index: usize) -> Option<&dyn Column> {
        self.columns.get(index).map(|c| c.as_ref())
    }

    /// Every element column, in order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }
}

impl Column for TupleColumn {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dtype(&self) -> &TypeRef {
        &self.dtype
    }

    fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
    }

    fn append_default(&mut self) {
        for column in &mut self.columns {
            column.append_default();
        }
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        for (column, other) in self.columns.iter_mut().zip(&other.columns) {
            column.try_append_column(other.as_ref())?;
        }
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let mut staged = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let mut element = column.clone_empty();
            element.load(input, rows)?;
            staged.push(element);
        }
        for (column, element) in self.columns.iter_mut().zip(&staged) {
            column.try_append_column(element.as_ref())?;
        }
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        self.columns.iter().try_for_each(|column| column.save(output))
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        slice_range(begin, len, Column::len(self))?;
        let columns = self
            .columns
            .iter()
            .map(|column| column.slice(begin, len))
            .collect::<ChResult<Vec<_>>>()?;
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            columns,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            columns: self.columns.iter().map(|c| c.clone_empty()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;
    use crate::{Int8Column, StringColumn};

    fn boxed(column: impl Column + 'static) -> ColumnRef {
        Box::new(column)
    }

    fn pairs() -> TupleColumn {
        let dtype: TypeRef = Arc::new("Tuple(Int8, String)".parse().unwrap());
        TupleColumn::try_with_dtype(dtype).unwrap()
    }

    #[test]
    fn elements_in_order() {
        let mut column = pairs();
        column.append_default();
        let other = TupleColumn::from_columns(vec![
            boxed(Int8Column::from_vec(vec![5])),
            boxed(["hi"].into_iter().collect::<StringColumn>()),
        ])
        .unwrap();
        column.try_append_column(&other).unwrap();
        assert_eq!(column.len(), 2);

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, [0, 5, 0, 2, b'h', b'i']);

        let mut loaded = column.clone_empty();
        loaded.load(&mut wire.as_slice(), 2).unwrap();
        let loaded = loaded.downcast_ref::<TupleColumn>().unwrap();
        let strings = loaded.column(1).unwrap().downcast_ref::<StringColumn>().unwrap();
        assert_eq!(strings.values(), &["", "hi"]);
        assert!(loaded.column(2).is_none());
    }

    #[test]
    fn failed_load_keeps_rows() {
        let mut column = pairs();
        column.append_default();
        let wire = [1u8, 2, 0, 9];
        assert!(matches!(
            column.load(&mut wire.as_slice(), 2),
            Err(ChError::UnexpectedEof(9, 0, _))
        ));
        assert_eq!(column.len(), 1);
        assert_eq!(column.columns()[1].len(), 1);
    }

    #[test]
    fn elements_must_line_up() {
        assert!(TupleColumn::from_columns(vec![]).is_err());
        let err = TupleColumn::from_columns(vec![
            boxed(Int8Column::from_vec(vec![1, 2])),
            boxed(Int8Column::from_vec(vec![1])),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("2, 1"));
    }

    #[test]
    fn slices_every_element() {
        let column = TupleColumn::from_columns(vec![
            boxed(Int8Column::from_vec(vec![1, 2, 3])),
            boxed(["a", "b", "c"].into_iter().collect::<StringColumn>()),
        ])
        .unwrap();
        assert_eq!(column.dtype().name(), "Tuple(Int8, String)");
        let slice = column.slice(2, 1).unwrap();
        let slice = slice.downcast_ref::<TupleColumn>().unwrap();
        let ints = slice.column(0).unwrap().downcast_ref::<Int8Column>().unwrap();
        assert_eq!(ints.values(), &[3]);
        assert!(column.slice(2, 2).is_err());
    }
}
