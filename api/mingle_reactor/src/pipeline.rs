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

use crate::{PipelineError, ReactorError, ReactorEvent};

/// A consumer of a stream of [`ReactorEvent`]s. Events are fed in one at a time, strictly in
/// order, and processing stops at the first error.
pub trait Reactor {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError>;
}

impl<R: Reactor + ?Sized> Reactor for &mut R {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        (**self).process_event(event)
    }
}

impl<R: Reactor + ?Sized> Reactor for Box<R> {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        (**self).process_event(event)
    }
}

/// A stage of a [`Pipeline`]. A processor receives each event along with the remainder of the
/// pipeline. It may forward the event unchanged, alter or replace it, withhold it (to forward
/// it later) or emit additional events.
pub trait Processor {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError>;
}

/// A [`Reactor`] that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardReactor;

impl Reactor for DiscardReactor {
    fn process_event(&mut self, _event: ReactorEvent) -> Result<(), ReactorError> {
        Ok(())
    }
}

/// A chain of [`Processor`]s terminating in a [`Reactor`]. Each event is passed through the
/// processors in order before reaching the terminal reactor. A pipeline holds the state of a
/// single visit and should not be reused for another.
pub struct Pipeline<R> {
    processors: Vec<Box<dyn Processor>>,
    terminal: R,
}

impl<R: Reactor> Pipeline<R> {
    /// Create a pipeline. At least one processor is required.
    pub fn new(processors: Vec<Box<dyn Processor>>, terminal: R) -> Result<Self, PipelineError> {
        if processors.is_empty() {
            Err(PipelineError::NoProcessors)
        } else {
            Ok(Pipeline::from_parts(processors, terminal))
        }
    }

    pub(crate) fn from_parts(processors: Vec<Box<dyn Processor>>, terminal: R) -> Self {
        Pipeline {
            processors,
            terminal,
        }
    }

    pub fn terminal(&self) -> &R {
        &self.terminal
    }

    pub fn into_terminal(self) -> R {
        self.terminal
    }
}

/// The remainder of a pipeline after some number of processors.
struct Chain<'a, R: ?Sized> {
    processors: &'a mut [Box<dyn Processor>],
    terminal: &'a mut R,
}

impl<'a, R: Reactor + ?Sized> Reactor for Chain<'a, R> {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        let Chain {
            processors,
            terminal,
        } = self;
        match processors.split_first_mut() {
            Some((head, tail)) => {
                let mut next = Chain {
                    processors: tail,
                    terminal: &mut **terminal,
                };
                head.process_event(event, &mut next)
            }
            None => terminal.process_event(event),
        }
    }
}

impl<R: Reactor> Reactor for Pipeline<R> {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        let Pipeline {
            processors,
            terminal,
        } = self;
        Chain {
            processors: processors.as_mut_slice(),
            terminal,
        }
        .process_event(event)
    }
}
