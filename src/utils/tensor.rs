//! Dense row-major tensor used as the data type flowing between layers
//!
//! A `Tensor` is a flat `Vec<f32>` plus a shape. Layers work on 2-D tensors
//! (batch_size × features); `FlattenLayer` also accepts higher ranks.
//! Every operation that can disagree on shape returns a
//! [`NetworkError::ShapeMismatch`] naming the operation instead of panicking.

use crate::error::{NetworkError, Result};

/// A multi-dimensional `f32` array stored contiguously in row-major order.
///
/// For shape `[2, 3]` the data is laid out as
/// `[r0c0, r0c1, r0c2, r1c0, r1c1, r1c2]`.
///
/// # Example
///
/// ```
/// use rust_neural_blocks::Tensor;
///
/// let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
/// let b = a.transpose().unwrap();
/// assert_eq!(b.shape(), &[3, 2]);
/// assert_eq!(b.get(2, 1), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Create a tensor from flat data and a shape.
    ///
    /// Fails if the product of `shape` does not equal `data.len()`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NetworkError::ShapeMismatch {
                op: "tensor construction",
                expected: shape,
                found: vec![data.len()],
            });
        }
        Ok(Self { data, shape })
    }

    /// Build a 2-D tensor from equally sized rows.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NetworkError::ShapeMismatch {
                    op: "tensor from rows",
                    expected: vec![cols],
                    found: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, vec![rows.len(), cols])
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let size: usize = shape.iter().product();
        Self {
            data: vec![0.0; size],
            shape: shape.to_vec(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the elements. The shape cannot change through this.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the first axis (the batch axis for layer inputs).
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Size of the second axis, or 1 for rank-1 tensors.
    pub fn cols(&self) -> usize {
        self.shape.get(1).copied().unwrap_or(1)
    }

    /// Returns `(rows, cols)` if the tensor is 2-D.
    pub fn dims2(&self, op: &'static str) -> Result<(usize, usize)> {
        match self.shape.as_slice() {
            &[rows, cols] => Ok((rows, cols)),
            other => Err(NetworkError::ShapeMismatch {
                op,
                expected: vec![0, 0],
                found: other.to_vec(),
            }),
        }
    }

    /// Element at `(row, col)` of a 2-D tensor.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols() + col]
    }

    /// Iterate over the rows of a 2-D tensor.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.cols().max(1))
    }

    pub fn ensure_shape(&self, expected: &[usize], op: &'static str) -> Result<()> {
        if self.shape != expected {
            return Err(NetworkError::ShapeMismatch {
                op,
                expected: expected.to_vec(),
                found: self.shape.clone(),
            });
        }
        Ok(())
    }

    /// Same data under a new shape with an equal element count.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Tensor> {
        let size: usize = new_shape.iter().product();
        if size != self.data.len() {
            return Err(NetworkError::ShapeMismatch {
                op: "reshape",
                expected: new_shape.to_vec(),
                found: self.shape.clone(),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            shape: new_shape.to_vec(),
        })
    }

    pub fn transpose(&self) -> Result<Tensor> {
        let (rows, cols) = self.dims2("transpose")?;
        let mut data = vec![0.0f32; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                data[c * rows + r] = self.data[r * cols + c];
            }
        }
        Ok(Tensor {
            data,
            shape: vec![cols, rows],
        })
    }

    /// Matrix product `self · other` for `[m, k] × [k, n]`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor> {
        let (m, k) = self.dims2("matmul")?;
        let (k2, n) = other.dims2("matmul")?;
        if k != k2 {
            return Err(NetworkError::ShapeMismatch {
                op: "matmul",
                expected: vec![k, n],
                found: other.shape.clone(),
            });
        }

        let mut data = vec![0.0f32; m * n];
        for i in 0..m {
            let out_row = &mut data[i * n..(i + 1) * n];
            for p in 0..k {
                let a = self.data[i * k + p];
                let b_row = &other.data[p * n..(p + 1) * n];
                for (out, &b) in out_row.iter_mut().zip(b_row) {
                    *out += a * b;
                }
            }
        }
        Ok(Tensor {
            data,
            shape: vec![m, n],
        })
    }

    /// Matrix product `self · otherᵗ` for `[m, k] × [n, k]`, without
    /// materializing the transpose.
    pub fn matmul_transposed(&self, other: &Tensor) -> Result<Tensor> {
        let (m, k) = self.dims2("matmul_transposed")?;
        let (n, k2) = other.dims2("matmul_transposed")?;
        if k != k2 {
            return Err(NetworkError::ShapeMismatch {
                op: "matmul_transposed",
                expected: vec![n, k],
                found: other.shape.clone(),
            });
        }

        let mut data = Vec::with_capacity(m * n);
        for a_row in self.data.chunks_exact(k.max(1)).take(m) {
            for b_row in other.data.chunks_exact(k.max(1)).take(n) {
                data.push(a_row.iter().zip(b_row).map(|(a, b)| a * b).sum());
            }
        }
        // k == 0 yields no chunks, so fill with zeros.
        data.resize(m * n, 0.0);
        Ok(Tensor {
            data,
            shape: vec![m, n],
        })
    }

    /// Apply `f` to every element.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Combine two equally shaped tensors element by element.
    pub fn zip_map(
        &self,
        other: &Tensor,
        op: &'static str,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Tensor> {
        other.ensure_shape(&self.shape, op)?;
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            shape: self.shape.clone(),
        })
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
