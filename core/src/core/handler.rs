// stockroom/src/core/handler.rs

//! Defines the `Handler<TData, Err>` type for pipeline step handlers.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every step handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>;

/// Type alias for a pipeline step handler.
///
/// A handler receives a clone of the shared `ContextData<TData>` and resolves
/// to `Result<PipelineControl, Err>`.
///
/// Handlers must drop every lock guard taken on the `ContextData` BEFORE any
/// `.await` suspension point. State that has to live across awaits (such as an
/// open database transaction) belongs behind an async-aware lock inside `TData`.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
