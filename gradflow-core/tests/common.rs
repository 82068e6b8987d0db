use gradflow_core::ndarray::{ArrayD, IxDyn};
use gradflow_core::Variable;

// Each test binary links this module and uses a different subset of it.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn create_test_variable(data: Vec<f64>, shape: Vec<usize>) -> Variable<f64> {
    let array = ArrayD::from_shape_vec(IxDyn(&shape), data).expect("Test variable creation failed");
    Variable::new(array)
}

#[allow(dead_code)]
pub fn scalar_value(var: &Variable<f64>) -> f64 {
    var.data().expect("variable has no value").sum()
}

#[allow(dead_code)]
pub fn scalar_grad(var: &Variable<f64>) -> f64 {
    var.grad().expect("variable has no gradient").sum()
}
