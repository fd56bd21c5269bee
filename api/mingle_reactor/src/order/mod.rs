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

//! Reordering of struct fields into a canonical order.

use crate::{EventKind, Processor, Reactor, ReactorError, ReactorEvent, ValueError};
use mingle_model::{Identifier, QualifiedTypeName};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

#[cfg(test)]
mod tests;

/// A field in a [`FieldOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpecification {
    pub field: Identifier,
    pub required: bool,
}

impl FieldSpecification {
    pub fn required(field: Identifier) -> Self {
        FieldSpecification {
            field,
            required: true,
        }
    }

    pub fn optional(field: Identifier) -> Self {
        FieldSpecification {
            field,
            required: false,
        }
    }
}

/// The canonical order of the fields of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOrder {
    fields: Vec<FieldSpecification>,
}

impl FieldOrder {
    pub fn new(fields: Vec<FieldSpecification>) -> Self {
        FieldOrder { fields }
    }

    pub fn fields(&self) -> &[FieldSpecification] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldSpecification> for FieldOrder {
    fn from_iter<T: IntoIterator<Item = FieldSpecification>>(iter: T) -> Self {
        FieldOrder::new(iter.into_iter().collect())
    }
}

/// Provides the canonical field order for struct types.
pub trait OrderGetter {
    /// The order for the named type or nothing if its fields should not be reordered.
    fn field_order_for(&self, type_name: &QualifiedTypeName) -> Option<FieldOrder>;
}

impl<F> OrderGetter for F
where
    F: Fn(&QualifiedTypeName) -> Option<FieldOrder>,
{
    fn field_order_for(&self, type_name: &QualifiedTypeName) -> Option<FieldOrder> {
        self(type_name)
    }
}

/// The events of the value of a field that arrived before it was expected.
struct BufferedField {
    start: ReactorEvent,
    events: Vec<ReactorEvent>,
    depth: usize,
}

impl BufferedField {
    fn new(start: ReactorEvent) -> Self {
        BufferedField {
            start,
            events: vec![],
            depth: 0,
        }
    }

    /// Capture an event, returning whether it completes the value of the field.
    fn capture(&mut self, event: ReactorEvent) -> bool {
        let complete = match &event.kind {
            EventKind::Value(_) => self.depth == 0,
            EventKind::StartList | EventKind::StartMap | EventKind::StartStruct(_) => {
                self.depth += 1;
                false
            }
            EventKind::End => {
                self.depth = self.depth.saturating_sub(1);
                self.depth == 0
            }
            EventKind::StartField(_) => false,
        };
        self.events.push(event);
        complete
    }
}

enum ActiveField {
    /// The field is being forwarded as it arrives.
    Forwarding,
    /// The field arrived early and its events are being held back.
    Buffering(BufferedField),
}

/// The state of a struct whose fields are being reordered.
struct StructAcc {
    expected: VecDeque<FieldSpecification>,
    pending: HashSet<Identifier>,
    buffered: HashMap<Identifier, BufferedField>,
    active: Option<ActiveField>,
    missing: Vec<Identifier>,
    flushing: bool,
}

impl StructAcc {
    fn new(order: FieldOrder) -> Self {
        let FieldOrder { fields } = order;
        StructAcc {
            pending: fields.iter().map(|spec| spec.field.clone()).collect(),
            expected: fields.into(),
            buffered: HashMap::new(),
            active: None,
            missing: vec![],
            flushing: false,
        }
    }

    fn is_next(&self, name: &Identifier) -> bool {
        self.expected
            .front()
            .map(|spec| &spec.field == name)
            .unwrap_or(false)
    }

    fn advance(&mut self) -> Option<FieldSpecification> {
        let spec = self.expected.pop_front()?;
        self.pending.remove(&spec.field);
        Some(spec)
    }
}

enum Frame {
    Ordered(StructAcc),
    /// A list, map or struct with no declared order.
    Relay,
}

/// A [`Processor`] that emits the fields of structs in the canonical order provided by an
/// [`OrderGetter`], regardless of the order in which they arrive. A field that arrives before
/// it is expected is held back until all of the fields that precede it have been emitted.
/// Fields that are not part of the order are forwarded immediately.
///
/// When a struct ends, any fields that are still held back are emitted, absent optional fields
/// are skipped and, if any required fields are absent, a [`ValueError::MissingFields`] error
/// is raised naming all of them.
///
/// Held back values are stored as flat sequences of events and are fed back through the
/// processor when they are emitted. Structs nested inside them are therefore reordered when
/// they are emitted, against the order provided at that point.
pub struct FieldOrderProcessor<O> {
    orders: O,
    stack: Vec<Frame>,
}

impl<O: OrderGetter> FieldOrderProcessor<O> {
    pub fn new(orders: O) -> Self {
        FieldOrderProcessor {
            orders,
            stack: vec![],
        }
    }

    fn start_struct(&mut self, type_name: &QualifiedTypeName) -> Frame {
        match self.orders.field_order_for(type_name) {
            Some(order) if !order.is_empty() => Frame::Ordered(StructAcc::new(order)),
            _ => Frame::Relay,
        }
    }

    fn start_field(
        &mut self,
        event: ReactorEvent,
        name: Identifier,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        if let Some(Frame::Ordered(acc)) = self.stack.last_mut() {
            if acc.is_next(&name) {
                acc.advance();
            } else if acc.pending.contains(&name) {
                debug!(field = %name, "Holding back out of order field.");
                acc.active = Some(ActiveField::Buffering(BufferedField::new(event)));
                return Ok(());
            }
            acc.active = Some(ActiveField::Forwarding);
        }
        next.process_event(event)
    }

    /// Called when a value has been completely forwarded.
    fn value_complete(&mut self, next: &mut dyn Reactor) -> Result<(), ReactorError> {
        if let Some(Frame::Ordered(acc)) = self.stack.last_mut() {
            if matches!(acc.active, Some(ActiveField::Forwarding)) {
                acc.active = None;
                if !acc.flushing {
                    return self.flush(next, false);
                }
            }
        }
        Ok(())
    }

    /// Emit held back fields for as long as the next expected field is available. At the end
    /// of the struct, absent fields are skipped (and recorded if they are required).
    fn flush(&mut self, next: &mut dyn Reactor, at_end: bool) -> Result<(), ReactorError> {
        if let Some(Frame::Ordered(acc)) = self.stack.last_mut() {
            acc.flushing = true;
        }
        loop {
            let Some(Frame::Ordered(acc)) = self.stack.last_mut() else {
                return Ok(());
            };
            let Some(spec) = acc.expected.front() else {
                break;
            };
            if let Some(field) = acc.buffered.remove(&spec.field) {
                debug!(field = %spec.field, "Emitting held back field.");
                let BufferedField { start, events, .. } = field;
                self.handle(start, next)?;
                for event in events {
                    self.handle(event, next)?;
                }
            } else if at_end {
                if let Some(spec) = acc.advance() {
                    if spec.required {
                        acc.missing.push(spec.field);
                    }
                }
            } else {
                break;
            }
        }
        if let Some(Frame::Ordered(acc)) = self.stack.last_mut() {
            acc.flushing = false;
        }
        Ok(())
    }

    fn end(&mut self, event: ReactorEvent, next: &mut dyn Reactor) -> Result<(), ReactorError> {
        if matches!(self.stack.last(), Some(Frame::Ordered(_))) {
            self.flush(next, true)?;
        }
        if let Some(Frame::Ordered(acc)) = self.stack.pop() {
            let StructAcc { mut missing, .. } = acc;
            if !missing.is_empty() {
                missing.sort();
                return Err(ValueError::MissingFields {
                    path: event.path_or_root(),
                    fields: missing,
                }
                .into());
            }
        }
        next.process_event(event)?;
        self.value_complete(next)
    }

    fn handle(&mut self, event: ReactorEvent, next: &mut dyn Reactor) -> Result<(), ReactorError> {
        if let Some(Frame::Ordered(acc)) = self.stack.last_mut() {
            if let Some(ActiveField::Buffering(field)) = &mut acc.active {
                if field.capture(event) {
                    if let Some(ActiveField::Buffering(field)) = acc.active.take() {
                        if let Some(name) = field.start.field().cloned() {
                            acc.buffered.insert(name, field);
                        }
                    }
                    if !acc.flushing {
                        return self.flush(next, false);
                    }
                }
                return Ok(());
            }
        }
        match &event.kind {
            EventKind::StartStruct(type_name) => {
                let frame = self.start_struct(type_name);
                self.stack.push(frame);
                next.process_event(event)
            }
            EventKind::StartList | EventKind::StartMap => {
                self.stack.push(Frame::Relay);
                next.process_event(event)
            }
            EventKind::StartField(name) => {
                let name = name.clone();
                self.start_field(event, name, next)
            }
            EventKind::Value(_) => {
                next.process_event(event)?;
                self.value_complete(next)
            }
            EventKind::End => self.end(event, next),
        }
    }
}

impl<O: OrderGetter> Processor for FieldOrderProcessor<O> {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        self.handle(event, next)
    }
}
