use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use ndarray::{ArrayD, NdFloat};

use crate::autograd::FunctionNode;
use crate::error::GradFlowError;
use crate::variable::Variable;

/// Heap entry: highest generation first, then first-queued first.
struct Pending<A: NdFloat> {
    generation: usize,
    order: usize,
    func: Rc<FunctionNode<A>>,
}

impl<A: NdFloat> PartialEq for Pending<A> {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation && self.order == other.order
    }
}

impl<A: NdFloat> Eq for Pending<A> {}

impl<A: NdFloat> PartialOrd for Pending<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: NdFloat> Ord for Pending<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.generation
            .cmp(&other.generation)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Functions waiting for their backward rule, each queued at most once.
struct ReadyQueue<A: NdFloat> {
    heap: BinaryHeap<Pending<A>>,
    seen: HashSet<usize>,
    queued: usize,
}

impl<A: NdFloat> ReadyQueue<A> {
    fn new() -> Self {
        ReadyQueue {
            heap: BinaryHeap::new(),
            seen: HashSet::new(),
            queued: 0,
        }
    }

    fn push(&mut self, func: Rc<FunctionNode<A>>) {
        if !self.seen.insert(func.id()) {
            return;
        }
        self.heap.push(Pending {
            generation: func.generation(),
            order: self.queued,
            func,
        });
        self.queued += 1;
    }

    fn pop(&mut self) -> Option<Rc<FunctionNode<A>>> {
        self.heap.pop().map(|pending| pending.func)
    }
}

/// Computes gradients of `root` with respect to every variable it depends on.
///
/// Functions are visited by decreasing generation. A function's generation
/// is strictly lower than that of every function consuming its outputs, so
/// by the time it runs every contribution to its output gradients has been
/// accumulated.
///
/// If `root` has no gradient yet it is seeded with ones of its shape. Unless
/// `retain_grad` is set, output gradients are dropped as soon as their
/// producing function has run; leaves keep theirs.
///
/// # Errors
/// * `GradFlowError::InvalidOperand` if `root` is empty or has no creator.
///   Nothing is mutated in that case.
/// * The first error raised by a backward rule or by gradient accumulation.
pub fn backward<A: NdFloat>(root: &Variable<A>, retain_grad: bool) -> Result<(), GradFlowError> {
    let (creator, seed) = {
        let guard = root.read_data();
        let data = guard.data.as_ref().ok_or_else(|| {
            GradFlowError::InvalidOperand("backward called on an empty variable".to_string())
        })?;
        let creator = guard.creator.clone().ok_or_else(|| {
            GradFlowError::InvalidOperand(
                "backward called on a variable with no creator; no graph was recorded".to_string(),
            )
        })?;
        let seed = match guard.grad {
            Some(_) => None,
            None => Some(ArrayD::<A>::ones(data.raw_dim())),
        };
        (creator, seed)
    };
    if let Some(seed) = seed {
        root.inner.borrow_mut().grad = Some(seed);
    }

    log::debug!(
        "Backward pass from '{}' (generation {})",
        creator.name(),
        creator.generation()
    );

    let mut queue = ReadyQueue::new();
    queue.push(creator);
    let mut processed = 0usize;

    while let Some(func) = queue.pop() {
        let gys = func.output_grads();
        if gys.iter().all(Option::is_none) {
            log::debug!(
                "Skipping '{}' (id {}): no output carries a gradient",
                func.name(),
                func.id()
            );
            continue;
        }

        let gxs = func.backward(&gys)?;
        for (input, gx) in func.inputs().iter().zip(gxs) {
            input.accumulate_grad(gx)?;
            if let Some(input_creator) = input.creator() {
                queue.push(input_creator);
            }
        }

        if !retain_grad {
            func.clear_output_grads();
        }
        processed += 1;
    }

    log::debug!("Backward pass done: {} function(s) processed", processed);
    Ok(())
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
