//! Activation kernels on scalars and row-major buffers
//!
//! These are the raw functions behind [`crate::layers::ActivationLayer`]:
//! - Sigmoid and its derivative expressed through the output
//! - ReLU and its derivative (zero at the kink)
//! - Row-wise softmax and its Jacobian-vector product

/// Sigmoid activation: 1 / (1 + exp(-x)).
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming `a = sigmoid(z)`.
pub fn sigmoid_derivative(a: f32) -> f32 {
    a * (1.0 - a)
}

pub fn relu(x: f32) -> f32 {
    x.max(0.0)
}

/// ReLU derivative. The boundary `z == 0` counts as inactive.
pub fn relu_derivative(z: f32) -> f32 {
    if z > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Softmax applied in place to each row of a row-major matrix.
///
/// Uses the max-subtraction trick so large logits cannot overflow `exp`.
///
/// # Arguments
/// * `outputs` - Flat array containing row-major matrix data
/// * `cols` - Number of columns (classes) per row
pub fn softmax_rows(outputs: &mut [f32], cols: usize) {
    if cols == 0 {
        return;
    }

    for row in outputs.chunks_exact_mut(cols) {
        let max_value = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mut sum = 0.0f32;
        for value in row.iter_mut() {
            *value = (*value - max_value).exp();
            sum += *value;
        }

        let inv_sum = 1.0f32 / sum;
        for value in row.iter_mut() {
            *value *= inv_sum;
        }
    }
}

/// Gradient through a row-wise softmax given its outputs.
///
/// For each row: `grad_in = a ⊙ (grad_out - <grad_out, a>)`.
pub fn softmax_rows_backward(outputs: &[f32], grad_output: &[f32], cols: usize) -> Vec<f32> {
    if cols == 0 {
        return Vec::new();
    }

    let mut grad_input = Vec::with_capacity(outputs.len());
    for (a_row, g_row) in outputs.chunks_exact(cols).zip(grad_output.chunks_exact(cols)) {
        let dot: f32 = a_row.iter().zip(g_row).map(|(a, g)| a * g).sum();
        grad_input.extend(a_row.iter().zip(g_row).map(|(a, g)| a * (g - dot)));
    }
    grad_input
}
