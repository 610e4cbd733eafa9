use rand::Rng;

use crate::error::{NnError, Result};

/// Dense row-major 2-D matrix of `f64`.
///
/// The shape only changes through `transpose_in_place`, which swaps the
/// dimensions and the backing grid together.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Uniform samples in [-1, 1) drawn from `rng`.
    pub fn random_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    /// Single-column matrix holding `values` top to bottom.
    pub fn from_column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Builds a matrix from nested rows. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());

        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::shape("from_data", (rows, cols), (1, bad.len())));
        }

        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from row-major values.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix> {
        if values.len() != rows * cols {
            return Err(NnError::shape("from_flat", (rows, cols), (values.len(), 1)));
        }

        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            values.chunks(cols).map(|chunk| chunk.to_vec()).collect()
        };

        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row-major copy of every element.
    pub fn to_flat(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    /// The single column as a plain vector. Fails unless `cols == 1`.
    pub fn to_column(&self) -> Result<Vec<f64>> {
        if self.cols != 1 {
            return Err(NnError::shape("to_column", self.shape(), (self.rows, 1)));
        }

        Ok(self.data.iter().map(|row| row[0]).collect())
    }

    /// Element-wise `self += other`.
    pub fn add_in_place(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape("add", other)?;
        self.map_in_place(|x, i, j| x + other.data[i][j]);
        Ok(())
    }

    /// Element-wise (Hadamard) `self *= other`.
    pub fn hadamard_in_place(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape("hadamard", other)?;
        self.map_in_place(|x, i, j| x * other.data[i][j]);
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        self.map_in_place(|x, _, _| x * factor);
    }

    /// Replaces every element with `f(value, row, col)`.
    ///
    /// The new grid is built in full before it replaces the old one.
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        self.data = self.map_indexed(f).data;
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Pure counterpart of `map_in_place`.
    pub fn map_indexed<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = f(self.data[i][j], i, j);
            }
        }

        res
    }

    /// Element-wise `a - b`.
    pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.check_same_shape("subtract", b)?;
        Ok(a.map_indexed(|x, i, j| x - b.data[i][j]))
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn transpose_in_place(&mut self) {
        *self = self.transpose();
    }

    /// Standard matrix product `a · b`; requires `a.cols == b.rows`.
    pub fn matmul(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(NnError::shape("matmul", a.shape(), b.shape()));
        }

        let mut res = Matrix::zeros(a.rows, b.cols);

        for i in 0..res.rows {
            let a_row = &a.data[i];
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..a.cols {
                    sum += a_row[k] * b.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    fn check_same_shape(&self, op: &'static str, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NnError::shape(op, self.shape(), other.shape()));
        }
        Ok(())
    }
}
