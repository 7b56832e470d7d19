//! Compute-once storage for a node's output shapes.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use crate::error::{Error, Result};
use crate::lazy::{Node, Shape};

/// Backend capability that derives the output shapes of a node from its
/// operator, parameters and operand shapes.
pub trait ShapeInference: Send + Sync {
    fn infer(&self, node: &Node) -> Result<Vec<Shape>>;
}

impl<F> ShapeInference for F
where
    F: Fn(&Node) -> Result<Vec<Shape>> + Send + Sync,
{
    fn infer(&self, node: &Node) -> Result<Vec<Shape>> {
        self(node)
    }
}

pub type ShapeThunk = Box<dyn FnOnce(&Node) -> Result<Vec<Shape>> + Send>;

type Shapes = Arc<[Shape]>;

enum CellState {
    Unevaluated(ShapeThunk),
    Evaluating(ThreadId),
    Evaluated(Result<Shapes>),
}

/// Tri-state lazy cell. The thunk runs at most once; concurrent readers
/// block until the owning thread publishes the result, and a re-entrant read
/// from the owning thread is reported instead of deadlocking.
pub struct ShapeCell {
    state: Mutex<CellState>,
    published: Condvar,
}

impl ShapeCell {
    pub fn ready(shapes: Vec<Shape>) -> Self {
        Self::with_state(CellState::Evaluated(Ok(shapes.into())))
    }

    pub fn deferred(thunk: ShapeThunk) -> Self {
        Self::with_state(CellState::Unevaluated(thunk))
    }

    fn with_state(state: CellState) -> Self {
        Self {
            state: Mutex::new(state),
            published: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CellState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(&*self.lock(), CellState::Evaluated(_))
    }

    pub fn get_or_compute(&self, node: &Node) -> Result<Shapes> {
        let current = thread::current().id();
        let mut state = self.lock();
        let thunk = loop {
            match std::mem::replace(&mut *state, CellState::Evaluating(current)) {
                CellState::Evaluated(result) => {
                    *state = CellState::Evaluated(result.clone());
                    return result;
                }
                CellState::Evaluating(owner) => {
                    *state = CellState::Evaluating(owner);
                    if owner == current {
                        return Err(Error::malformed(format!(
                            "re-entrant shape evaluation of {}",
                            node.kind()
                        )));
                    }
                    state = match self.published.wait(state) {
                        Ok(guard) => guard,
                        Err(poison) => poison.into_inner(),
                    };
                }
                CellState::Unevaluated(thunk) => break thunk,
            }
        };
        drop(state);

        let mut publisher = Publisher {
            cell: self,
            result: Some(Err(Error::shape_inference(
                node.kind().as_str(),
                "shape inference panicked",
            ))),
        };
        let result = thunk(node).and_then(|shapes| check_arity(node, shapes));
        publisher.result = Some(result.clone());
        drop(publisher);
        result
    }
}

fn check_arity(node: &Node, shapes: Vec<Shape>) -> Result<Shapes> {
    if shapes.len() != node.num_outputs() {
        return Err(Error::shape_inference(
            node.kind().as_str(),
            format!(
                "backend produced {} shape(s) for {} output(s)",
                shapes.len(),
                node.num_outputs()
            ),
        ));
    }
    Ok(shapes.into())
}

/// Stores the outcome and wakes waiters, also when the thunk unwinds.
struct Publisher<'a> {
    cell: &'a ShapeCell,
    result: Option<Result<Shapes>>,
}

impl Drop for Publisher<'_> {
    fn drop(&mut self) {
        if let Some(result) = self.result.take() {
            *self.cell.lock() = CellState::Evaluated(result);
            self.cell.published.notify_all();
        }
    }
}

impl fmt::Debug for ShapeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.lock() {
            CellState::Unevaluated(_) => f.write_str("ShapeCell(unevaluated)"),
            CellState::Evaluating(_) => f.write_str("ShapeCell(evaluating)"),
            CellState::Evaluated(Ok(shapes)) => write!(f, "ShapeCell({:?})", shapes),
            CellState::Evaluated(Err(err)) => write!(f, "ShapeCell(error: {})", err),
        }
    }
}
