use std::cell::{Ref, RefCell};
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{ArrayD, NdFloat};

use crate::autograd::config::is_recording_enabled;
use crate::error::GradFlowError;
use crate::variable::Variable;
use crate::variable_data::VariableData;

static NEXT_FUNCTION_ID: AtomicUsize = AtomicUsize::new(0);

/// A differentiable computation: a forward rule and its vector-Jacobian
/// product.
///
/// Implementations are plain structs (`Square`, `Add`, ...). They are run
/// through [`apply`], which records a [`FunctionNode`] owning the
/// implementation for the backward pass.
///
/// Both rules default to `GradFlowError::UnimplementedOperation`, so an
/// implementation only used for inference may leave `backward` out.
pub trait Function<A: NdFloat>: Debug {
    /// Name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Computes the output values from the input values.
    ///
    /// May return several outputs; an empty `Vec` is rejected by [`apply`].
    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        let _ = xs;
        Err(GradFlowError::UnimplementedOperation {
            op: self.name(),
            rule: "forward",
        })
    }

    /// Computes \( \frac{dL}{dx_i} \) for every input given
    /// \( \frac{dL}{dy_j} \) for every output.
    ///
    /// # Arguments
    /// * `xs`: the input values seen by `forward`, in call order.
    /// * `gys`: one entry per output. `None` when that output received no
    ///   gradient (or was already dropped); no zero default is substituted.
    ///
    /// # Returns
    /// Exactly one gradient per input, in input order. Any other count makes
    /// the backward pass fail with `GradFlowError::ArityMismatch`.
    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        let _ = (xs, gys);
        Err(GradFlowError::UnimplementedOperation {
            op: self.name(),
            rule: "backward",
        })
    }
}

/// One recorded invocation of a [`Function`].
///
/// Inputs are held strongly so their values stay available for the backward
/// rule. Outputs are held through `Weak` handles: each output owns this node
/// through its `creator` link, and an owning edge back would form an `Rc`
/// cycle that is never freed.
pub struct FunctionNode<A: NdFloat> {
    id: usize,
    func: Box<dyn Function<A>>,
    generation: usize,
    inputs: Vec<Variable<A>>,
    outputs: Vec<Weak<RefCell<VariableData<A>>>>,
}

impl<A: NdFloat> FunctionNode<A> {
    /// Unique per invocation.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.func.name()
    }

    /// Maximum generation among the inputs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn inputs(&self) -> &[Variable<A>] {
        &self.inputs
    }

    /// Upgrades the output handles; dropped outputs come back as `None`.
    pub fn outputs(&self) -> Vec<Option<Variable<A>>> {
        self.outputs
            .iter()
            .map(|output| output.upgrade().map(Variable::from_inner))
            .collect()
    }

    /// Current gradient of every output, `None` where unavailable.
    pub(crate) fn output_grads(&self) -> Vec<Option<ArrayD<A>>> {
        self.outputs
            .iter()
            .map(|output| output.upgrade().and_then(|cell| cell.borrow().grad.clone()))
            .collect()
    }

    /// Drops the gradients held by the live outputs.
    pub(crate) fn clear_output_grads(&self) {
        for output in self.outputs.iter().filter_map(Weak::upgrade) {
            output.borrow_mut().grad = None;
        }
    }

    /// Runs the backward rule against the retained input values.
    pub(crate) fn backward(
        &self,
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        let guards: Vec<Ref<'_, VariableData<A>>> =
            self.inputs.iter().map(|input| input.read_data()).collect();
        let xs = input_values(self.name(), &guards)?;

        let gxs = self.func.backward(&xs, gys)?;
        if gxs.len() != self.inputs.len() {
            return Err(GradFlowError::ArityMismatch {
                op: self.name(),
                expected: self.inputs.len(),
                actual: gxs.len(),
            });
        }
        Ok(gxs)
    }
}

impl<A: NdFloat> Debug for FunctionNode<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionNode")
            .field("id", &self.id)
            .field("func", &self.func)
            .field("generation", &self.generation)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

// Dropping a node would otherwise recurse once per upstream function
// (node -> input -> creator -> node ...) and overflow the stack on long
// chains. Nodes whose last owner is this teardown are unlinked into a local
// worklist instead.
impl<A: NdFloat> Drop for FunctionNode<A> {
    fn drop(&mut self) {
        let mut pending: Vec<Rc<FunctionNode<A>>> = Vec::new();
        release_inputs(&mut self.inputs, &mut pending);
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                release_inputs(&mut node.inputs, &mut pending);
            }
        }
    }
}

/// Drops `inputs`, moving the creator of every input we held last into
/// `pending`.
fn release_inputs<A: NdFloat>(
    inputs: &mut Vec<Variable<A>>,
    pending: &mut Vec<Rc<FunctionNode<A>>>,
) {
    for input in inputs.drain(..) {
        if let Ok(cell) = Rc::try_unwrap(input.inner) {
            if let Some(creator) = cell.into_inner().creator {
                pending.push(creator);
            }
        }
    }
}

fn input_values<'a, A: NdFloat>(
    op: &'static str,
    guards: &'a [Ref<'_, VariableData<A>>],
) -> Result<Vec<&'a ArrayD<A>>, GradFlowError> {
    guards
        .iter()
        .enumerate()
        .map(|(i, guard)| {
            guard.data.as_ref().ok_or_else(|| {
                GradFlowError::InvalidOperand(format!("input {} of '{}' is empty", i, op))
            })
        })
        .collect()
}

/// Invokes `func` on `inputs` and returns every output it produced.
///
/// When graph recording is enabled (see [`crate::autograd::config`]), a
/// [`FunctionNode`] is created and becomes the creator of each output.
/// Otherwise the outputs are plain leaves and nothing is retained.
///
/// # Errors
/// * `GradFlowError::InvalidOperand` if `inputs` is empty or an input is the
///   empty sentinel.
/// * `GradFlowError::NoOutputs` if the forward rule returned nothing.
/// * Whatever the forward rule itself returns.
pub fn apply<A, F>(func: F, inputs: &[&Variable<A>]) -> Result<Vec<Variable<A>>, GradFlowError>
where
    A: NdFloat,
    F: Function<A> + 'static,
{
    let name = func.name();
    if inputs.is_empty() {
        return Err(GradFlowError::InvalidOperand(format!(
            "'{}' called without inputs",
            name
        )));
    }

    let ys = {
        let guards: Vec<Ref<'_, VariableData<A>>> =
            inputs.iter().map(|input| input.read_data()).collect();
        let xs = input_values(name, &guards)?;
        func.forward(&xs)?
    };
    if ys.is_empty() {
        return Err(GradFlowError::NoOutputs { op: name });
    }
    let outputs: Vec<Variable<A>> = ys.into_iter().map(|y| Variable::from_data(Some(y))).collect();

    if !is_recording_enabled() {
        log::trace!("'{}' evaluated without recording", name);
        return Ok(outputs);
    }

    let generation = inputs
        .iter()
        .map(|input| input.generation())
        .max()
        .unwrap_or(0);
    let node = Rc::new(FunctionNode {
        id: NEXT_FUNCTION_ID.fetch_add(1, Ordering::Relaxed),
        func: Box::new(func),
        generation,
        inputs: inputs.iter().map(|input| (*input).clone()).collect(),
        outputs: outputs.iter().map(Variable::downgrade).collect(),
    });
    for output in &outputs {
        output.set_creator(Rc::clone(&node));
    }
    log::trace!(
        "Recorded '{}' (id {}, generation {}, {} input(s), {} output(s))",
        name,
        node.id,
        generation,
        inputs.len(),
        outputs.len()
    );

    Ok(outputs)
}

/// [`apply`] for functions with exactly one output.
///
/// # Errors
/// Everything [`apply`] reports, plus `GradFlowError::ArityMismatch` when the
/// function produced more than one output.
pub fn apply_single<A, F>(func: F, inputs: &[&Variable<A>]) -> Result<Variable<A>, GradFlowError>
where
    A: NdFloat,
    F: Function<A> + 'static,
{
    let name = func.name();
    let mut outputs = apply(func, inputs)?;
    if outputs.len() != 1 {
        return Err(GradFlowError::ArityMismatch {
            op: name,
            expected: 1,
            actual: outputs.len(),
        });
    }
    outputs.pop().ok_or(GradFlowError::NoOutputs { op: name })
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
