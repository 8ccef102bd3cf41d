use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaUiError;
use crate::value::SuValue;

pub type PropMap = BTreeMap<String, SuValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    Text,
    Button,
    Grid,
    State,
    Input,
    List,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        Self::Container,
        Self::Text,
        Self::Button,
        Self::Grid,
        Self::State,
        Self::Input,
        Self::List,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Text => "Text",
            Self::Button => "Button",
            Self::Grid => "Grid",
            Self::State => "State",
            Self::Input => "Input",
            Self::List => "List",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of a declarative UI tree, as authored in JSON.
///
/// The `type` field is kept as raw text so that a schema naming an
/// unsupported kind still loads; [`SchemaNode::kind`] returns `None` for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: PropMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self::named(kind.as_str())
    }

    pub fn named(kind_name: impl Into<String>) -> Self {
        Self {
            kind_name: kind_name.into(),
            props: PropMap::new(),
            children: Vec::new(),
            on_click: None,
            on_change: None,
            item_schema: None,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, SchemaUiError> {
        serde_json::from_str(raw).map_err(|error| {
            SchemaUiError::new("SCHEMA_PARSE", format!("Invalid schema JSON: {}", error))
        })
    }

    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::parse(&self.kind_name)
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<SuValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_item_schema(mut self, item: SchemaNode) -> Self {
        self.item_schema = Some(Box::new(item));
        self
    }

    pub fn with_on_click(mut self, action: impl Into<String>) -> Self {
        self.on_click = Some(action.into());
        self
    }

    pub fn with_on_change(mut self, action: impl Into<String>) -> Self {
        self.on_change = Some(action.into());
        self
    }
}
