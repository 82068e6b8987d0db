use super::*;
use crate::autograd::{apply_single, Function};
use crate::ops::{add_op, exp_op, mul_op, square_op};
use crate::utils::testing::check_array_near;
use ndarray::{arr0, array};

#[test]
fn test_numerical_diff_square() -> Result<(), GradFlowError> {
    let x = Variable::new(arr0(2.0));
    let dy = numerical_diff(square_op, &x, 1e-4)?;
    check_array_near(&dy, &[], &[4.0], 1e-6);
    Ok(())
}

#[test]
fn test_numerical_diff_does_not_record() -> Result<(), GradFlowError> {
    let x = Variable::new(array![0.5, 1.5]);
    let seen_recording = std::cell::Cell::new(true);
    numerical_diff(
        |v| {
            seen_recording.set(crate::autograd::is_recording_enabled());
            exp_op(v)
        },
        &x,
        1e-4,
    )?;
    assert!(!seen_recording.get());
    assert!(crate::autograd::is_recording_enabled());
    Ok(())
}

#[test]
fn test_numerical_diff_empty_input() {
    let x = Variable::<f64>::empty();
    assert!(matches!(
        numerical_diff(square_op, &x, 1e-4),
        Err(GradFlowError::InvalidOperand(_))
    ));
}

#[test]
fn test_check_grad_square_and_exp() -> Result<(), GradCheckError> {
    let x = Variable::new(array![[0.3, -1.2], [2.0, 0.0]]);
    check_grad(square_op, &x, 1e-6, 1e-5)?;
    check_grad(exp_op, &x, 1e-6, 1e-5)?;
    Ok(())
}

#[test]
fn test_check_grad_non_elementwise_composition() -> Result<(), GradCheckError> {
    // sum(x * exp(x) + x^2) touches every element through two paths.
    let x = Variable::new(array![0.1, 0.4, -0.7]);
    check_grad(
        |v| {
            let e = exp_op(v)?;
            let p = mul_op(v, &e)?;
            let s = square_op(v)?;
            add_op(&p, &s)
        },
        &x,
        1e-6,
        1e-5,
    )
}

#[derive(Debug)]
struct WrongSquare;

impl Function<f64> for WrongSquare {
    fn name(&self) -> &'static str {
        "wrong_square"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<Vec<ArrayD<f64>>, GradFlowError> {
        Ok(vec![xs[0].mapv(|v| v * v)])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<f64>],
        gys: &[Option<ArrayD<f64>>],
    ) -> Result<Vec<ArrayD<f64>>, GradFlowError> {
        // Forgets the factor 2.
        let gy = gys[0].as_ref().expect("gradient");
        Ok(vec![xs[0] * gy])
    }
}

#[test]
fn test_check_grad_reports_mismatch() {
    let x = Variable::new(arr0(3.0));
    let result = check_grad(|v| apply_single(WrongSquare, &[v]), &x, 1e-6, 1e-5);
    match result {
        Err(GradCheckError::GradientMismatch {
            analytical_grad,
            numerical_grad,
            ..
        }) => {
            assert!((analytical_grad - 3.0).abs() < 1e-9);
            assert!((numerical_grad - 6.0).abs() < 1e-4);
        }
        other => panic!("expected a gradient mismatch, got {:?}", other),
    }
}

#[test]
fn test_check_grad_rejects_non_leaf() -> Result<(), GradFlowError> {
    let x = Variable::new(arr0(1.0));
    let y = square_op(&x)?;
    assert!(matches!(
        check_grad(exp_op, &y, 1e-6, 1e-5),
        Err(GradCheckError::Engine(GradFlowError::InvalidOperand(_)))
    ));
    Ok(())
}
