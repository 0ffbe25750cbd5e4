use std::fmt;

use shared::domain::{format_time, Party, PartyId};

pub const EMPTY_PLACEHOLDER: &str = "No parties.";

/// Action bound to a rendered item. The id travels as data, never as
/// generated markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Delete(PartyId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

impl DisplayField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Party {
        id: PartyId,
        fields: Vec<DisplayField>,
        on_delete: UiAction,
    },
    Placeholder(&'static str),
}

impl DisplayNode {
    pub fn from_party(party: &Party) -> Self {
        let mut fields = Vec::with_capacity(5);
        fields.push(DisplayField::new("Name", party.name.as_str()));
        fields.push(DisplayField::new(
            "Date",
            party.date.format("%Y-%m-%d").to_string(),
        ));
        if let Some(time) = party.time {
            fields.push(DisplayField::new("Time", format_time(time)));
        }
        fields.push(DisplayField::new("Location", party.location.as_str()));
        fields.push(DisplayField::new("Description", party.description.as_str()));

        Self::Party {
            id: party.id.clone(),
            fields,
            on_delete: UiAction::Delete(party.id.clone()),
        }
    }

    pub fn action(&self) -> Option<&UiAction> {
        match self {
            Self::Party { on_delete, .. } => Some(on_delete),
            Self::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

impl fmt::Display for DisplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Party { fields, .. } => {
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}: {}", field.label, field.value)?;
                }
                Ok(())
            }
            Self::Placeholder(text) => f.write_str(text),
        }
    }
}

/// Maps parties to display nodes. An empty slice yields the placeholder.
pub fn render(parties: &[Party]) -> Vec<DisplayNode> {
    if parties.is_empty() {
        return vec![DisplayNode::Placeholder(EMPTY_PLACEHOLDER)];
    }
    parties.iter().map(DisplayNode::from_party).collect()
}

/// Container for the most recent render. Every update replaces the whole
/// node list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    nodes: Vec<DisplayNode>,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            nodes: render(&[]),
        }
    }
}

impl ListView {
    pub fn replace(&mut self, nodes: Vec<DisplayNode>) {
        self.nodes = nodes;
    }

    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Delegated lookup of the action bound to the item at `index`.
    pub fn action_at(&self, index: usize) -> Option<UiAction> {
        self.nodes.get(index)?.action().cloned()
    }
}
