// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Mingle reactors
//!
//! Values in the Mingle model can be transported as a flat stream of structural events
//! ([`ReactorEvent`]) rather than as complete trees. This crate provides the machinery to
//! consume such streams: terminal [`Reactor`]s (such as the [`ValueBuilder`]) and
//! [`Processor`]s that can be chained into a [`Pipeline`] to validate, annotate, reorder and
//! cast the events as they pass through, without ever materializing the intermediate tree.
//!
//! The processors provided are:
//!
//! - [`StructuralCheck`]: verifies that the stream is well formed.
//! - [`PathSetter`]: stamps each event with its location in the logical tree.
//! - [`FieldOrderProcessor`]: reorders the fields of structs into a canonical order.
//! - [`CastProcessor`]: validates and coerces values against an expected type.
//! - [`TracingProcessor`]: logs each event that passes through it.

mod builder;
pub mod cast;
mod check;
mod debug;
mod error;
mod event;
pub mod order;
mod path;
mod pipeline;
pub mod schema;
#[cfg(test)]
mod tests;
mod visit;

pub use builder::ValueBuilder;
pub use cast::{cast_value, CastDelegate, CastProcessor, DefaultCastDelegate, FieldTyper};
pub use check::{StructuralCheck, TopType};
pub use debug::TracingProcessor;
pub use error::{PipelineError, ProtocolError, ReactorError, ValueError};
pub use event::{EventKind, ReactorEvent};
pub use order::{FieldOrder, FieldOrderProcessor, FieldSpecification, OrderGetter};
pub use path::PathSetter;
pub use pipeline::{DiscardReactor, Pipeline, Processor, Reactor};
pub use visit::visit_value;
