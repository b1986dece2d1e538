// stockroom/src/pipeline/execution.rs

//! Contains the `Pipeline::run()` method, responsible for executing the pipeline's steps and handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

/// Result of running one phase (`before`, `on` or `after`) of a step.
enum PhaseOutcome {
  Continue,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  async fn run_phase(
    phase: &'static str,
    handlers: Option<&Vec<Handler<TData, Err>>>,
    ctx_data: &ContextData<TData>,
  ) -> Result<PhaseOutcome, Err> {
    let Some(handlers) = handlers else {
      return Ok(PhaseOutcome::Continue);
    };
    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let handler_span = span!(Level::DEBUG, "step_handler", phase = phase, handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(handler_span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, phase = phase, "Pipeline stopped by a handler.");
          return Ok(PhaseOutcome::Stopped);
        }
        Err(e) => {
          event!(Level::ERROR, phase = phase, error = %e, "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(PhaseOutcome::Continue)
  }

  /// Executes the pipeline against the given shared context `ctx_data`.
  ///
  /// Steps run in order; within a step the `before`, `on` and `after`
  /// handlers run in registration order. The first error aborts the run and
  /// is returned as-is. A non-optional step without any handler fails with
  /// `WorkflowError::HandlerMissing`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          step_span.in_scope(|| event!(Level::INFO, "Step skipped due to 'skip_if' condition."));
          continue;
        }
      }

      let before = self.before.get(step_name).filter(|v| !v.is_empty());
      let on = self.on.get(step_name).filter(|v| !v.is_empty());
      let after = self.after.get(step_name).filter(|v| !v.is_empty());

      if before.is_none() && on.is_none() && after.is_none() {
        if step_def.optional {
          step_span.in_scope(|| event!(Level::DEBUG, "Optional step has no handlers, skipping."));
          continue;
        }
        step_span.in_scope(|| event!(Level::ERROR, "Non-optional step has no handlers."));
        return Err(Err::from(WorkflowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_outcome = async {
        for (phase, handlers) in [("before", before), ("on", on), ("after", after)] {
          if let PhaseOutcome::Stopped = Self::run_phase(phase, handlers, &ctx_data).await? {
            return Ok(PhaseOutcome::Stopped);
          }
        }
        event!(Level::DEBUG, "Step processing finished successfully.");
        Ok::<_, Err>(PhaseOutcome::Continue)
      }
      .instrument(step_span)
      .await?;

      if let PhaseOutcome::Stopped = step_outcome {
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }
}
