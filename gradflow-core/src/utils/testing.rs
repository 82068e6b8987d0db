use approx::relative_eq;
use ndarray::{ArrayD, NdFloat};

/// Checks that an array has the expected shape and approximately the expected
/// elements (logical, row-major order).
/// Panics if shapes differ or an element differs by more than `tolerance`
/// (absolute, or relative for large magnitudes).
pub fn check_array_near<A: NdFloat>(
    actual: &ArrayD<A>,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    assert_eq!(
        actual.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual.iter().zip(expected_data.iter()).enumerate() {
        let a = a.to_f64().unwrap_or(f64::NAN);
        if !relative_eq!(a, *e, epsilon = tolerance, max_relative = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i,
                a,
                e,
                (a - e).abs(),
                tolerance
            );
        }
    }
}
