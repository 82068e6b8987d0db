use super::*;
use crate::error::GradFlowError;
use ndarray::{arr0, array, Array3, IxDyn};

#[test]
fn test_new_leaf_defaults() {
    let x = Variable::new(array![1.0, 2.0, 3.0]);
    assert_eq!(x.data().unwrap(), array![1.0, 2.0, 3.0].into_dyn());
    assert!(x.grad().is_none());
    assert!(x.is_leaf());
    assert_eq!(x.generation(), 0);
    assert!(!x.is_empty());
}

#[test]
fn test_shape_accessors() {
    let x = Variable::new(Array3::<f32>::zeros((2, 3, 4)));
    assert_eq!(x.shape(), Some(vec![2, 3, 4]));
    assert_eq!(x.ndim(), Some(3));
    assert_eq!(x.size(), Some(24));
    assert_eq!(x.len(), Some(2));

    let s = Variable::scalar(1.5f32);
    assert_eq!(s.shape(), Some(vec![]));
    assert_eq!(s.len(), Some(1));

    let e = Variable::<f64>::empty();
    assert!(e.is_empty());
    assert_eq!(e.shape(), None);
    assert_eq!(e.size(), None);
}

#[test]
fn test_clone_shares_the_node() -> Result<(), GradFlowError> {
    let x = Variable::new(arr0(2.0));
    let alias = x.clone();
    assert!(alias.ptr_eq(&x));
    let y = x.square()?;
    y.backward(false)?;
    assert_eq!(alias.grad().unwrap(), arr0(4.0).into_dyn());
    assert!(!Variable::new(arr0(2.0)).ptr_eq(&x));
    Ok(())
}

#[test]
fn test_try_from_value_accepts_arrays() -> Result<(), GradFlowError> {
    let d = Variable::<f64>::try_from_value(ArrayD::<f64>::zeros(IxDyn(&[2, 2])))?;
    assert_eq!(d.shape(), Some(vec![2, 2]));
    let s = Variable::<f64>::try_from_value(arr0(1.0))?;
    assert_eq!(s.ndim(), Some(0));
    let v = Variable::<f64>::try_from_value(array![1.0, 2.0])?;
    assert_eq!(v.shape(), Some(vec![2]));
    let m = Variable::<f32>::try_from_value(array![[1.0f32], [2.0]])?;
    assert_eq!(m.shape(), Some(vec![2, 1]));
    Ok(())
}

#[test]
fn test_try_from_value_empty_sentinel() -> Result<(), GradFlowError> {
    let e = Variable::<f64>::try_from_value(None::<ArrayD<f64>>)?;
    assert!(e.is_empty());
    Ok(())
}

#[test]
fn test_try_from_value_rejects_other_types() {
    let err = Variable::<f64>::try_from_value(1.0f64).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::UnsupportedValueType {
            type_name: "f64".to_string()
        }
    );
    // Right container, wrong element type.
    assert!(matches!(
        Variable::<f64>::try_from_value(array![1.0f32]),
        Err(GradFlowError::UnsupportedValueType { .. })
    ));
    assert!(matches!(
        Variable::<f64>::try_from_value(vec![1.0f64, 2.0]),
        Err(GradFlowError::UnsupportedValueType { .. })
    ));
}

#[test]
fn test_accumulate_grad_adds() -> Result<(), GradFlowError> {
    let x = Variable::new(array![1.0, 1.0]);
    x.accumulate_grad(array![1.0, 2.0].into_dyn())?;
    x.accumulate_grad(array![0.5, 0.5].into_dyn())?;
    assert_eq!(x.grad().unwrap(), array![1.5, 2.5].into_dyn());
    Ok(())
}

#[test]
fn test_accumulate_grad_shape_mismatch() {
    let x = Variable::new(array![1.0, 1.0]);
    let result = x.accumulate_grad(array![1.0, 2.0, 3.0].into_dyn());
    assert!(matches!(result, Err(GradFlowError::ShapeMismatch { .. })));
    assert!(x.grad().is_none());
}

#[test]
fn test_accumulate_grad_into_empty() {
    let x = Variable::<f64>::empty();
    assert!(matches!(
        x.accumulate_grad(arr0(1.0).into_dyn()),
        Err(GradFlowError::InvalidOperand(_))
    ));
}

#[test]
fn test_cleargrad_is_idempotent() -> Result<(), GradFlowError> {
    let x = Variable::new(arr0(3.0));
    x.square()?.backward(false)?;
    assert!(x.grad().is_some());
    x.cleargrad();
    assert!(x.grad().is_none());
    x.cleargrad();
    assert!(x.grad().is_none());
    Ok(())
}

#[test]
fn test_method_sugar_matches_ops() -> Result<(), GradFlowError> {
    let x = Variable::new(arr0(2.0));
    let y = x.square()?.add(&x.exp()?)?.mul(&x.pow(3.0)?)?;
    // (x^2 + e^x) * x^3
    let expected = (4.0 + 2.0f64.exp()) * 8.0;
    assert!((y.data().unwrap().sum() - expected).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_display() {
    assert_eq!(Variable::new(arr0(1.5)).to_string(), "variable(1.5)");
    assert_eq!(Variable::<f64>::empty().to_string(), "variable(None)");
    let m = Variable::new(array![[1.0, 2.0], [3.0, 4.0]]).to_string();
    assert!(m.starts_with("variable([["));
    // Continuation rows are indented past the "variable(" prefix.
    assert!(m.contains("\n          [3"));
}

#[test]
fn test_debug_reports_creator_name() -> Result<(), GradFlowError> {
    let y = Variable::new(arr0(1.0)).exp()?;
    let text = format!("{:?}", y);
    assert!(text.contains("Some(\"exp\")"));
    assert!(text.contains("generation: 1"));
    Ok(())
}
