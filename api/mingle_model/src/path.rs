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

use crate::Identifier;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A single descent from a container into one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Field(Identifier),
    Index(usize),
}

#[derive(Debug, PartialEq, Eq)]
struct PathNode {
    step: PathStep,
    parent: ObjectPath,
}

/// The location of a value within a tree of values, for use in diagnostics. Paths are
/// persistent: extending a path shares its prefix with the original so paths can be cloned
/// and retained cheaply.
///
/// # Examples
///
/// ```
/// use mingle_model::ObjectPath;
///
/// let path = ObjectPath::root()
///     .descend("items".parse().unwrap())
///     .index(2)
///     .descend("name".parse().unwrap());
/// assert_eq!(path.to_string(), "items[2].name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPath {
    head: Option<Arc<PathNode>>,
}

impl ObjectPath {
    /// The empty path, denoting the root of the tree.
    pub fn root() -> Self {
        ObjectPath::default()
    }

    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    fn push(&self, step: PathStep) -> Self {
        ObjectPath {
            head: Some(Arc::new(PathNode {
                step,
                parent: self.clone(),
            })),
        }
    }

    /// Extend the path with a field.
    pub fn descend(&self, field: Identifier) -> Self {
        self.push(PathStep::Field(field))
    }

    /// Extend the path with a list index.
    pub fn index(&self, index: usize) -> Self {
        self.push(PathStep::Index(index))
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.head.as_ref().map(|node| &node.step)
    }

    /// The path with its final step removed. The parent of the root is the root.
    pub fn parent(&self) -> ObjectPath {
        self.head
            .as_ref()
            .map(|node| node.parent.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut current = self;
        while let Some(node) = &current.head {
            len += 1;
            current = &node.parent;
        }
        len
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// The steps of the path, starting from the root.
    pub fn steps(&self) -> Vec<&PathStep> {
        let mut steps = vec![];
        let mut current = self;
        while let Some(node) = &current.head {
            steps.push(&node.step);
            current = &node.parent;
        }
        steps.reverse();
        steps
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps().into_iter().enumerate() {
            match step {
                PathStep::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Field(name) => write!(f, ".{}", name)?,
                PathStep::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}
