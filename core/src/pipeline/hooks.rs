// stockroom/src/pipeline/hooks.rs

//! Registration of `before`, `on`, and `after` handlers for pipeline steps.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::core::handler::Handler;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use std::future::Future;

/// Boxes a user handler whose error converts into the pipeline's `Err`.
fn wrap_handler<TData, Err, F, UserProvidedErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
  UserProvidedErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn push_handler(
    phase: &mut HashMap<String, Vec<Handler<TData, Err>>>,
    step_name: &str,
    handler: Handler<TData, Err>,
  ) {
    phase.entry(step_name.to_string()).or_default().push(handler);
  }

  /// Registers a `before` hook for a given step.
  ///
  /// The handler's error type must be convertible into the pipeline's `Err`.
  pub fn before_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.before, step_name, wrap_handler(handler_fn));
  }

  /// Registers the main (`on`) handler for a given step.
  pub fn on_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.on, step_name, wrap_handler(handler_fn));
  }

  /// Registers an `after` hook for a given step.
  pub fn after_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.after, step_name, wrap_handler(handler_fn));
  }
}
