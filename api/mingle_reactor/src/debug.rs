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

use crate::{Processor, Reactor, ReactorError, ReactorEvent};
use tracing::trace;

/// A [`Processor`] that logs every event passing through it, at `TRACE` level, and forwards it
/// unchanged.
#[derive(Debug, Clone)]
pub struct TracingProcessor {
    stage: String,
}

impl TracingProcessor {
    /// The stage name is attached to each log record to distinguish between several tracing
    /// stages in the same pipeline.
    pub fn new(stage: impl Into<String>) -> Self {
        TracingProcessor {
            stage: stage.into(),
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }
}

impl Default for TracingProcessor {
    fn default() -> Self {
        TracingProcessor::new("reactor")
    }
}

impl Processor for TracingProcessor {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        let stage = self.stage.as_str();
        match &event.path {
            Some(path) => trace!(stage, path = %path, event = %event.kind, "Event received."),
            None => trace!(stage, event = %event.kind, "Event received."),
        }
        next.process_event(event)
    }
}
