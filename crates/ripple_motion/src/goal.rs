//! Goal decomposition
//!
//! A [`Goal`] is the dynamic form of any animatable value. When a motion is
//! created, [`GoalShape::of`] inspects the initial goal once and picks one of
//! four layouts (scalar, sequence, mapping, container). From then on the
//! layout alone maps goals to channels and channels back to goals; the value
//! is never re-inspected to find out what it is.
//!
//! Non-numeric fields of sequences and mappings are not channels. They are
//! remembered from the initial value and copied through on every rebuild.

use crate::channel::ChannelKey;
use crate::error::{MotionError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// `(channel index, value)` pairs produced by decomposition
pub type ChannelValues = SmallVec<[(usize, f32); 4]>;

// ============================================================================
// Goal values
// ============================================================================

/// One element of a sequence or mapping goal
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// Animated
    Number(f32),
    Bool(bool),
    Text(String),
    /// A hole; in a partial goal it means "leave this channel alone"
    Empty,
}

impl Field {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Field::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f32> for Field {
    fn from(value: f32) -> Self {
        Field::Number(value)
    }
}

impl From<Option<f32>> for Field {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Field::Empty, Field::Number)
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Bool(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_owned())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

/// Static description of a structured container type
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ContainerKind {
    pub name: &'static str,
    /// Component names in extraction order
    pub components: &'static [&'static str],
}

impl ContainerKind {
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|component| *component == name)
    }
}

/// The components of one structured value, tagged with its kind
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    kind: &'static ContainerKind,
    components: SmallVec<[f32; 4]>,
}

impl Container {
    pub fn new(
        kind: &'static ContainerKind,
        components: impl IntoIterator<Item = f32>,
    ) -> Result<Self> {
        let components: SmallVec<[f32; 4]> = components.into_iter().collect();
        if components.len() != kind.components.len() {
            return Err(MotionError::mismatch(
                format!("{} with {} components", kind.name, kind.components.len()),
                format!("{} components", components.len()),
            ));
        }
        Ok(Self { kind, components })
    }

    /// Build without checking the component count against the kind
    pub(crate) fn from_parts(kind: &'static ContainerKind, components: SmallVec<[f32; 4]>) -> Self {
        Self { kind, components }
    }

    pub fn kind(&self) -> &'static ContainerKind {
        self.kind
    }

    pub fn components(&self) -> &[f32] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<f32> {
        self.kind
            .component_index(name)
            .and_then(|index| self.components.get(index).copied())
    }
}

/// Dynamic animatable value
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    Scalar(f32),
    Sequence(Vec<Field>),
    Mapping(BTreeMap<String, Field>),
    Container(Container),
}

impl Goal {
    /// A sequence of numbers
    pub fn sequence(values: impl IntoIterator<Item = f32>) -> Self {
        Goal::Sequence(values.into_iter().map(Field::Number).collect())
    }

    /// A mapping of numbers
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, f32)>) -> Self {
        Goal::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), Field::Number(value)))
                .collect(),
        )
    }

    /// Human-readable structure, used in shape errors
    pub fn describe(&self) -> String {
        match self {
            Goal::Scalar(_) => "number".to_owned(),
            Goal::Sequence(fields) => format!("sequence of {} fields", fields.len()),
            Goal::Mapping(entries) => format!("mapping of {} keys", entries.len()),
            Goal::Container(container) => container.kind.name.to_owned(),
        }
    }
}

impl From<f32> for Goal {
    fn from(value: f32) -> Self {
        Goal::Scalar(value)
    }
}

impl From<Container> for Goal {
    fn from(container: Container) -> Self {
        Goal::Container(container)
    }
}

// ============================================================================
// Layouts
// ============================================================================

/// Maps goals of one fixed structure to channels and back
pub trait ChannelLayout {
    /// Channel keys in decomposition order
    fn keys(&self) -> &[ChannelKey];

    /// Channels named by a full or partial goal, in decomposition order
    ///
    /// Fails without side effects if any part of the goal does not fit.
    fn decompose(&self, goal: &Goal) -> Result<ChannelValues>;

    /// Rebuild a goal from one value per channel
    fn recompose(&self, values: &[f32]) -> Goal;
}

/// Layout of a plain number
#[derive(Clone, Debug)]
pub struct ScalarLayout {
    keys: [ChannelKey; 1],
}

impl ChannelLayout for ScalarLayout {
    fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    fn decompose(&self, goal: &Goal) -> Result<ChannelValues> {
        match goal {
            Goal::Scalar(value) => Ok(smallvec::smallvec![(0, *value)]),
            other => Err(MotionError::mismatch("number", other.describe())),
        }
    }

    fn recompose(&self, values: &[f32]) -> Goal {
        Goal::Scalar(values.first().copied().unwrap_or_default())
    }
}

/// Layout of a fixed-arity sequence
#[derive(Clone, Debug)]
pub struct SequenceLayout {
    template: Vec<Field>,
    /// Channel index for each position; `None` for passthrough fields
    slots: Vec<Option<usize>>,
    keys: Vec<ChannelKey>,
}

impl SequenceLayout {
    fn new(template: &[Field]) -> Self {
        let mut keys = Vec::new();
        let slots = template
            .iter()
            .enumerate()
            .map(|(position, field)| {
                field.as_number().map(|_| {
                    keys.push(ChannelKey::Index(position));
                    keys.len() - 1
                })
            })
            .collect();
        Self {
            template: template.to_vec(),
            slots,
            keys,
        }
    }
}

impl ChannelLayout for SequenceLayout {
    fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    fn decompose(&self, goal: &Goal) -> Result<ChannelValues> {
        let Goal::Sequence(fields) = goal else {
            return Err(MotionError::mismatch(
                format!("sequence of {} fields", self.template.len()),
                goal.describe(),
            ));
        };
        if fields.len() > self.template.len() {
            return Err(MotionError::mismatch(
                format!("sequence of {} fields", self.template.len()),
                goal.describe(),
            ));
        }

        let mut out = ChannelValues::new();
        for (position, field) in fields.iter().enumerate() {
            let Some(value) = field.as_number() else {
                continue;
            };
            match self.slots[position] {
                Some(channel) => out.push((channel, value)),
                None => return Err(MotionError::InvalidChannel(ChannelKey::Index(position))),
            }
        }
        Ok(out)
    }

    fn recompose(&self, values: &[f32]) -> Goal {
        Goal::Sequence(
            self.template
                .iter()
                .zip(&self.slots)
                .map(|(field, slot)| match slot.and_then(|channel| values.get(channel)) {
                    Some(value) => Field::Number(*value),
                    None => field.clone(),
                })
                .collect(),
        )
    }
}

/// Layout of a mapping with a fixed key set
#[derive(Clone, Debug)]
pub struct MappingLayout {
    template: BTreeMap<String, Field>,
    index: FxHashMap<String, usize>,
    keys: Vec<ChannelKey>,
}

impl MappingLayout {
    fn new(template: &BTreeMap<String, Field>) -> Self {
        let mut index = FxHashMap::default();
        let mut keys = Vec::new();
        for (key, field) in template {
            if field.as_number().is_some() {
                index.insert(key.clone(), keys.len());
                keys.push(ChannelKey::Key(key.clone()));
            }
        }
        Self {
            template: template.clone(),
            index,
            keys,
        }
    }
}

impl ChannelLayout for MappingLayout {
    fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    fn decompose(&self, goal: &Goal) -> Result<ChannelValues> {
        let Goal::Mapping(entries) = goal else {
            return Err(MotionError::mismatch(
                format!("mapping of {} keys", self.template.len()),
                goal.describe(),
            ));
        };

        let mut out = ChannelValues::new();
        for (key, field) in entries {
            match (self.index.get(key), field.as_number()) {
                (Some(channel), Some(value)) => out.push((*channel, value)),
                // Known passthrough key, or a hole: nothing to animate
                (_, None) if self.template.contains_key(key) => {}
                _ => return Err(MotionError::InvalidChannel(ChannelKey::Key(key.clone()))),
            }
        }
        out.sort_by_key(|(channel, _)| *channel);
        Ok(out)
    }

    fn recompose(&self, values: &[f32]) -> Goal {
        Goal::Mapping(
            self.template
                .iter()
                .map(|(key, field)| {
                    let field = match self.index.get(key).and_then(|channel| values.get(*channel)) {
                        Some(value) => Field::Number(*value),
                        None => field.clone(),
                    };
                    (key.clone(), field)
                })
                .collect(),
        )
    }
}

/// Layout of a structured container
///
/// Accepts either a container of the same kind (every component) or a
/// mapping from component names to numbers (just those components).
#[derive(Clone, Debug)]
pub struct ContainerLayout {
    kind: &'static ContainerKind,
    keys: Vec<ChannelKey>,
}

impl ContainerLayout {
    fn new(kind: &'static ContainerKind) -> Self {
        Self {
            kind,
            keys: kind
                .components
                .iter()
                .map(|name| ChannelKey::Component(*name))
                .collect(),
        }
    }
}

impl ChannelLayout for ContainerLayout {
    fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    fn decompose(&self, goal: &Goal) -> Result<ChannelValues> {
        match goal {
            Goal::Container(container) if container.kind == self.kind => Ok(container
                .components
                .iter()
                .copied()
                .enumerate()
                .collect()),
            Goal::Mapping(entries) => {
                let mut out = ChannelValues::new();
                for (name, field) in entries {
                    let Some(channel) = self.kind.component_index(name) else {
                        return Err(MotionError::InvalidChannel(ChannelKey::Key(name.clone())));
                    };
                    if let Some(value) = field.as_number() {
                        out.push((channel, value));
                    }
                }
                out.sort_by_key(|(channel, _)| *channel);
                Ok(out)
            }
            other => Err(MotionError::mismatch(self.kind.name, other.describe())),
        }
    }

    fn recompose(&self, values: &[f32]) -> Goal {
        let components = (0..self.keys.len())
            .map(|channel| values.get(channel).copied().unwrap_or_default())
            .collect();
        Goal::Container(Container::from_parts(self.kind, components))
    }
}

// ============================================================================
// Shape
// ============================================================================

/// The fixed structure of one motion's value
#[derive(Clone, Debug)]
pub enum GoalShape {
    Scalar(ScalarLayout),
    Sequence(SequenceLayout),
    Mapping(MappingLayout),
    Container(ContainerLayout),
}

impl GoalShape {
    /// Pick the layout for `goal` and return its initial channel values
    pub fn of(goal: &Goal) -> (GoalShape, Vec<f32>) {
        let shape = match goal {
            Goal::Scalar(_) => GoalShape::Scalar(ScalarLayout {
                keys: [ChannelKey::Value],
            }),
            Goal::Sequence(fields) => GoalShape::Sequence(SequenceLayout::new(fields)),
            Goal::Mapping(entries) => GoalShape::Mapping(MappingLayout::new(entries)),
            Goal::Container(container) => {
                GoalShape::Container(ContainerLayout::new(container.kind))
            }
        };

        let mut values = vec![0.0; shape.keys().len()];
        // A goal always fits the layout derived from it
        if let Ok(channels) = shape.decompose(goal) {
            for (channel, value) in channels {
                values[channel] = value;
            }
        }
        (shape, values)
    }

    pub fn layout(&self) -> &dyn ChannelLayout {
        match self {
            GoalShape::Scalar(layout) => layout,
            GoalShape::Sequence(layout) => layout,
            GoalShape::Mapping(layout) => layout,
            GoalShape::Container(layout) => layout,
        }
    }

    pub fn keys(&self) -> &[ChannelKey] {
        self.layout().keys()
    }

    pub fn decompose(&self, goal: &Goal) -> Result<ChannelValues> {
        self.layout().decompose(goal)
    }

    pub fn recompose(&self, values: &[f32]) -> Goal {
        self.layout().recompose(values)
    }

    /// Channel index of `key`
    pub fn index_of(&self, key: &ChannelKey) -> Option<usize> {
        self.keys().iter().position(|candidate| candidate == key)
    }
}
