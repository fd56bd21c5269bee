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


use crate::{EventKind, Processor, Reactor, ReactorError, ReactorEvent};
use mingle_model::{Identifier, ObjectPath, QualifiedTypeName};

/// A terminal reactor that records the events it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingReactor {
    pub events: Vec<ReactorEvent>,
}

impl RecordingReactor {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|event| event.kind.clone()).collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| event.path_or_root().to_string())
            .collect()
    }
}

impl Reactor for RecordingReactor {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        self.events.push(event);
        Ok(())
    }
}

pub(crate) fn id(text: &str) -> Identifier {
    text.parse().expect("Invalid identifier.")
}

pub(crate) fn qn(text: &str) -> QualifiedTypeName {
    text.parse().expect("Invalid type name.")
}

pub(crate) fn path(fields: &[&str]) -> ObjectPath {
    fields
        .iter()
        .fold(ObjectPath::root(), |path, field| path.descend(id(field)))
}

/// Feed a sequence of events through a single processor, recording its output.
pub(crate) fn run_processor<P>(
    processor: &mut P,
    events: Vec<ReactorEvent>,
) -> (RecordingReactor, Result<(), ReactorError>)
where
    P: Processor,
{
    let mut recorder = RecordingReactor::default();
    let mut result = Ok(());
    for event in events {
        result = processor.process_event(event, &mut recorder);
        if result.is_err() {
            break;
        }
    }
    (recorder, result)
}

pub(crate) fn events(kinds: Vec<EventKind>) -> Vec<ReactorEvent> {
    kinds.into_iter().map(ReactorEvent::new).collect()
}

pub(crate) fn field(name: &str) -> EventKind {
    EventKind::StartField(id(name))
}

pub(crate) fn start_struct(name: &str) -> EventKind {
    EventKind::StartStruct(qn(name))
}

pub(crate) fn value<V: Into<mingle_model::Value>>(v: V) -> EventKind {
    EventKind::Value(v.into())
}
