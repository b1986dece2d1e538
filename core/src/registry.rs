// stockroom/src/registry.rs

//! Defines `WorkflowRegistry<E>`, a registry of pipelines keyed by the type of
//! their root context data. Runs return the application-level error type `E`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased runner stored in the registry.
#[async_trait]
trait AnyPipelineRunner<ApplicationError>: Send + Sync
where
  ApplicationError: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must be a `Box<ContextData<TData>>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, ApplicationError>;
}

struct PipelineWrapper<TData, HandlerError, ApplicationError>
where
  TData: 'static + Send + Sync,
  HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<HandlerError> + From<WorkflowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerError>>,
  _phantom_app_err: PhantomData<fn() -> ApplicationError>,
}

#[async_trait]
impl<TData, HandlerError, ApplicationError> AnyPipelineRunner<ApplicationError>
  for PipelineWrapper<TData, HandlerError, ApplicationError>
where
  TData: 'static + Send + Sync,
  HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<HandlerError> + From<WorkflowError> + Send + Sync + 'static,
{
  #[instrument(
    name = "PipelineWrapper::run_erased",
    skip_all,
    fields(target_tdata_type = %std::any::type_name::<TData>()),
    err(Display)
  )]
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, ApplicationError> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed_ctx_data) => *boxed_ctx_data,
      Err(_) => {
        let expected_type_name = std::any::type_name::<ContextData<TData>>();
        event!(Level::ERROR, "Context object type mismatch. Expected {}.", expected_type_name);
        return Err(ApplicationError::from(WorkflowError::TypeMismatch {
          step_name: "registry_dispatch".to_string(),
          expected_type: expected_type_name.to_string(),
        }));
      }
    };

    self.pipeline.run(typed_ctx_data).await.map_err(ApplicationError::from)
  }
}

/// Registry of pipelines, one per root context data type.
pub struct WorkflowRegistry<ApplicationError = WorkflowError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  registry: Mutex<HashMap<TypeId, Arc<dyn AnyPipelineRunner<ApplicationError>>>>,
}

impl<ApplicationError> Default for WorkflowRegistry<ApplicationError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<ApplicationError> WorkflowRegistry<ApplicationError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: Mutex::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context data type, replacing any pipeline
  /// previously registered for the same `TData`.
  pub fn register_pipeline<TData, HandlerError>(&self, pipeline: Pipeline<TData, HandlerError>)
  where
    TData: 'static + Send + Sync,
    HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
    ApplicationError: From<HandlerError>,
  {
    event!(
      Level::DEBUG,
      tdata_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let wrapper = PipelineWrapper::<TData, HandlerError, ApplicationError> {
      pipeline: Arc::new(pipeline),
      _phantom_app_err: PhantomData,
    };
    self.registry.lock().insert(TypeId::of::<TData>(), Arc::new(wrapper));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.registry.lock().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for the underlying data type `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, ApplicationError>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.registry.lock().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, "No pipeline registered for TData type {}.", type_name);
      ApplicationError::from(WorkflowError::ConfigurationError {
        step_name: "WorkflowRegistry::run".to_string(),
        message: format!("No pipeline registered for TData type {}", type_name),
      })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}
