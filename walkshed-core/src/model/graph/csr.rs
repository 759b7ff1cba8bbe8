use itertools::Itertools;

/// compressed sparse-row matrix of f32 edge weights. `outer` holds
/// rows + 1 row pointers, `inner` the column index of each nonzero, and
/// `data` the weights, all row-major. index arrays are i32 to match the
/// exported pointer contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    outer: Vec<i32>,
    inner: Vec<i32>,
    data: Vec<f32>,
}

/// raw view of a CSR for the export boundary. pointers remain valid until
/// the owning graph is mutated or dropped.
#[derive(Debug, Copy, Clone)]
pub struct CsrPointers {
    pub nnz: i32,
    pub rows: i32,
    pub cols: i32,
    pub data: *const f32,
    pub outer: *const i32,
    pub inner: *const i32,
}

impl CsrMatrix {
    pub fn empty(rows: usize, cols: usize) -> CsrMatrix {
        CsrMatrix {
            rows,
            cols,
            outer: vec![0; rows + 1],
            inner: Vec::new(),
            data: Vec::new(),
        }
    }

    /// assemble from (row, col, weight) triplets. duplicate (row, col)
    /// entries collapse to the last-written weight.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f32)]) -> CsrMatrix {
        // stable sort on (row, col) keeps insertion order within a
        // duplicate group, so the last entry of each group wins
        let sorted = triplets
            .iter()
            .sorted_by_key(|(row, col, _)| (*row, *col))
            .collect_vec();

        let mut outer = Vec::with_capacity(rows + 1);
        let mut inner: Vec<i32> = Vec::with_capacity(sorted.len());
        let mut data: Vec<f32> = Vec::with_capacity(sorted.len());

        outer.push(0);
        let mut current_row = 0usize;
        for (row, col, weight) in sorted {
            debug_assert!(*row < rows && *col < cols);
            while current_row < *row {
                outer.push(inner.len() as i32);
                current_row += 1;
            }
            let row_start = outer[current_row] as usize;
            if inner.len() > row_start && inner.last() == Some(&(*col as i32)) {
                // same (row, col) as the previous entry: overwrite
                *data.last_mut().expect("data parallel to inner") = *weight;
            } else {
                inner.push(*col as i32);
                data.push(*weight);
            }
        }
        while current_row < rows {
            outer.push(inner.len() as i32);
            current_row += 1;
        }

        CsrMatrix {
            rows,
            cols,
            outer,
            inner,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.inner.len()
    }

    /// nonzeros of one row as (col, weight) pairs, in column order
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let range = if row < self.rows {
            self.outer[row] as usize..self.outer[row + 1] as usize
        } else {
            0..0
        };
        range.map(move |i| (self.inner[i] as usize, self.data[i]))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.row(row)
            .find(|(c, _)| *c == col)
            .map(|(_, weight)| weight)
    }

    /// every nonzero as a (row, col, weight) triplet, row-major
    pub fn to_triplets(&self) -> Vec<(usize, usize, f32)> {
        (0..self.rows)
            .flat_map(|row| self.row(row).map(move |(col, weight)| (row, col, weight)))
            .collect()
    }

    pub fn pointers(&self) -> CsrPointers {
        CsrPointers {
            nnz: self.nnz() as i32,
            rows: self.rows as i32,
            cols: self.cols as i32,
            data: self.data.as_ptr(),
            outer: self.outer.as_ptr(),
            inner: self.inner.as_ptr(),
        }
    }

    pub fn outer(&self) -> &[i32] {
        &self.outer
    }

    pub fn inner(&self) -> &[i32] {
        &self.inner
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::CsrMatrix;

    #[test]
    fn test_assembly_layout() {
        // the layout documented at the export boundary:
        // edges {(0->1, 2.5), (0->2, 1.0), (1->2, 0.5)} over 4 rows
        let csr = CsrMatrix::from_triplets(4, 4, &[(0, 1, 2.5), (0, 2, 1.0), (1, 2, 0.5)]);
        assert_eq!(csr.outer(), &[0, 2, 3, 3, 3]);
        assert_eq!(csr.inner(), &[1, 2, 2]);
        assert_eq!(csr.data(), &[2.5, 1.0, 0.5]);
    }

    #[test]
    fn test_last_write_wins() {
        let csr = CsrMatrix::from_triplets(2, 2, &[(0, 1, 1.0), (0, 1, 7.0)]);
        assert_eq!(csr.nnz(), 1);
        assert_eq!(csr.get(0, 1), Some(7.0));
    }

    #[test]
    fn test_last_write_wins_out_of_order_insertion() {
        let csr = CsrMatrix::from_triplets(3, 3, &[(1, 0, 4.0), (0, 2, 2.0), (1, 0, 9.0)]);
        assert_eq!(csr.nnz(), 2);
        assert_eq!(csr.get(1, 0), Some(9.0));
        assert_eq!(csr.get(0, 2), Some(2.0));
    }

    #[test]
    fn test_same_column_across_rows_not_merged() {
        let csr = CsrMatrix::from_triplets(2, 3, &[(0, 2, 1.0), (1, 2, 5.0)]);
        assert_eq!(csr.nnz(), 2);
        assert_eq!(csr.get(0, 2), Some(1.0));
        assert_eq!(csr.get(1, 2), Some(5.0));
    }

    #[test]
    fn test_empty_rows_padded() {
        let csr = CsrMatrix::from_triplets(3, 3, &[(2, 0, 1.0)]);
        assert_eq!(csr.outer(), &[0, 0, 0, 1]);
        assert_eq!(csr.row(0).count(), 0);
        assert_eq!(csr.row(2).count(), 1);
    }

    #[test]
    fn test_round_trip_triplets() {
        let triplets = vec![(0, 1, 2.5), (0, 2, 1.0), (1, 2, 0.5)];
        let csr = CsrMatrix::from_triplets(3, 3, &triplets);
        assert_eq!(csr.to_triplets(), triplets);
    }

    #[test]
    fn test_out_of_range_row_reads_empty() {
        let csr = CsrMatrix::from_triplets(2, 2, &[(0, 1, 1.0)]);
        assert_eq!(csr.row(10).count(), 0);
        assert_eq!(csr.get(10, 0), None);
    }
}
