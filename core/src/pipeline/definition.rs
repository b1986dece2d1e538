// stockroom/src/pipeline/definition.rs

//! Contains the `Pipeline<TData, Err>` struct definition and methods for its
//! construction and structural modification.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::WorkflowError;
use std::collections::HashMap;

/// Step tuple accepted by [`Pipeline::new`]: `(name, optional, skip_if)`.
pub type StepSpec<'a, TData> = (&'a str, bool, Option<SkipCondition<TData>>);

/// An ordered list of named steps over a shared root data type `TData`.
///
/// `Err` is what handlers return; it must be `From<WorkflowError>` so the
/// engine can report its own failures (e.g. a required step with no handler)
/// through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Ordered list of step definitions for this pipeline.
  pub(crate) steps: Vec<StepDef<TData>>,

  // Handlers for the three phases of each step.
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Creates a new `Pipeline` with an initial set of step definitions.
  pub fn new(step_defs: &[StepSpec<'_, TData>]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef::new(*name, *optional, skip_cond_opt.clone()))
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Names of the steps, in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position_of(&self, step_name: &str) -> usize {
    // A typo in a step name is a programming error, not a runtime failure.
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .unwrap_or_else(|| panic!("Pipeline setup error: Step '{}' not found in pipeline definition.", step_name))
  }

  /// Panics if no step with the given name exists.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    self.position_of(step_name);
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline setup error: Step '{}' already exists in pipeline definition.",
        step_name
      );
    }
  }

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.position_of(existing_step_name);
    let name_str: String = new_step_name.into();
    self.ensure_step_not_exists(&name_str);
    self.steps.insert(idx, StepDef::new(name_str, optional, skip_if));
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.position_of(existing_step_name);
    let name_str: String = new_step_name.into();
    self.ensure_step_not_exists(&name_str);
    self.steps.insert(idx + 1, StepDef::new(name_str, optional, skip_if));
  }
}
