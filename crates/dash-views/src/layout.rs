//! Chart grid: full-width charts take a row, half-width charts pair up

use dash_core::ChartWidth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridRow {
    Full(usize),
    /// Left and optional right chart index
    Pair(usize, Option<usize>),
}

/// Arrange chart indices into rows, keeping declaration order
pub fn grid_rows(widths: &[ChartWidth]) -> Vec<GridRow> {
    let mut rows = Vec::new();
    let mut pending: Option<usize> = None;

    for (i, width) in widths.iter().enumerate() {
        match width {
            ChartWidth::Full => {
                if let Some(left) = pending.take() {
                    rows.push(GridRow::Pair(left, None));
                }
                rows.push(GridRow::Full(i));
            }
            ChartWidth::Half => match pending.take() {
                Some(left) => rows.push(GridRow::Pair(left, Some(i))),
                None => pending = Some(i),
            },
        }
    }

    if let Some(left) = pending {
        rows.push(GridRow::Pair(left, None));
    }
    rows
}
