//! A2UI Protocol Message Types
//!
//! This module defines the Rust types for all inbound A2UI protocol messages
//! and the typed property bags of the standard component catalog.
//! Messages are serialized/deserialized using serde_json.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{BridgeError, Result};
use super::value::DataValue;

/// Lenient f64 deserializer: accepts numbers, ignores other types.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let val = Option::<Value>::deserialize(d)?.and_then(|v| v.as_f64());
    Ok(val)
}

/// Lenient list deserializer. Decodes each element on its own and drops the
/// malformed ones, so one bad item does not discard the whole message.
fn lenient_vec<'de, D, T>(d: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value(v) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("[A2UI message] Skipping malformed item [{}]: {}", i, e);
                None
            }
        })
        .collect())
}

/// Top-level inbound A2UI message.
///
/// On the wire a message is a JSON object with exactly one key naming its
/// kind. Kinds this processor does not know are kept as [`Message::Unknown`]
/// so that newer producers do not break older consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Initialize (or re-root) a UI surface
    BeginRendering(BeginRendering),

    /// Add or update components in the tree
    SurfaceUpdate(SurfaceUpdate),

    /// Update the data model
    DataModelUpdate(DataModelUpdate),

    /// Delete a surface
    DeleteSurface(DeleteSurface),

    /// A message kind this processor does not understand
    Unknown { kind: String },
}

impl Message {
    /// Get the surface ID this message applies to
    pub fn surface_id(&self) -> Option<&str> {
        match self {
            Message::BeginRendering(m) => Some(&m.surface_id),
            Message::SurfaceUpdate(m) => Some(&m.surface_id),
            Message::DataModelUpdate(m) => Some(&m.surface_id),
            Message::DeleteSurface(m) => Some(&m.surface_id),
            Message::Unknown { .. } => None,
        }
    }

    /// Wire name of the message kind
    pub fn kind(&self) -> &str {
        match self {
            Message::BeginRendering(_) => "beginRendering",
            Message::SurfaceUpdate(_) => "surfaceUpdate",
            Message::DataModelUpdate(_) => "dataModelUpdate",
            Message::DeleteSurface(_) => "deleteSurface",
            Message::Unknown { kind } => kind,
        }
    }

    /// Decode a message from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(BridgeError::InvalidEnvelope(
                "message must be a JSON object".to_string(),
            ));
        };

        let mut entries = map.into_iter();
        let (kind, body) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => {
                return Err(BridgeError::InvalidEnvelope(
                    "message object has no kind key".to_string(),
                ));
            }
            (Some((first, _)), Some((second, _))) => {
                return Err(BridgeError::InvalidEnvelope(format!(
                    "message object has more than one kind key ('{first}', '{second}', ...)"
                )));
            }
        };

        let message = match kind.as_str() {
            "beginRendering" => Message::BeginRendering(serde_json::from_value(body)?),
            "surfaceUpdate" => Message::SurfaceUpdate(serde_json::from_value(body)?),
            "dataModelUpdate" => Message::DataModelUpdate(serde_json::from_value(body)?),
            "deleteSurface" => Message::DeleteSurface(serde_json::from_value(body)?),
            _ => Message::Unknown { kind },
        };
        Ok(message)
    }

    /// Parse a single message from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Message::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Message::BeginRendering(m) => map.serialize_entry("beginRendering", m)?,
            Message::SurfaceUpdate(m) => map.serialize_entry("surfaceUpdate", m)?,
            Message::DataModelUpdate(m) => map.serialize_entry("dataModelUpdate", m)?,
            Message::DeleteSurface(m) => map.serialize_entry("deleteSurface", m)?,
            Message::Unknown { kind } => {
                map.serialize_entry(kind, &serde_json::Map::new())?
            }
        }
        map.end()
    }
}

/// Initialize a new UI surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "beginRendering": {
///     "surfaceId": "main",
///     "root": "root-column",
///     "styles": {
///       "primaryColor": "#007BFF",
///       "font": "Roboto"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    /// Unique identifier for this surface
    pub surface_id: String,

    /// ID of the root component
    #[serde(default)]
    pub root: String,

    /// Optional style configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<SurfaceStyles>,
}

/// Style hints for a surface. Opaque to the processor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStyles {
    /// Primary color (hex format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    /// Font family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Additional custom styles
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Add or update components in the surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "surfaceUpdate": {
///     "surfaceId": "main",
///     "components": [
///       {
///         "id": "root",
///         "component": {
///           "Column": {
///             "children": ["header", "content"]
///           }
///         }
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    /// Target surface ID
    pub surface_id: String,

    /// Components to add or update
    #[serde(default, deserialize_with = "lenient_vec")]
    pub components: Vec<ComponentDefinition>,
}

/// A single component definition in the adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Unique component ID
    pub id: String,

    /// Optional flex weight for Row/Column layouts
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// The component type and its raw properties
    pub component: RawComponent,
}

/// The `{ "<Type>": { ...properties } }` wrapper, still undecoded.
///
/// Typed decoding happens later through the component catalog, so that the
/// set of known types is a runtime table rather than a compile-time match.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComponent {
    pub type_name: String,
    pub properties: Value,
}

impl<'de> Deserialize<'de> for RawComponent {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(d)?;
        if map.len() > 1 {
            log::warn!(
                "[A2UI message] Component wrapper has {} type keys, using the first",
                map.len()
            );
        }
        let (type_name, properties) = map
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("component wrapper has no type key"))?;
        Ok(RawComponent {
            type_name,
            properties,
        })
    }
}

impl Serialize for RawComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.type_name, &self.properties)?;
        map.end()
    }
}

/// Update the data model.
///
/// # Example JSON
///
/// ```text
/// {
///   "dataModelUpdate": {
///     "surfaceId": "main",
///     "path": "/form",
///     "contents": [
///       {"key": "firstName", "value": {"literalString": "John"}}
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    /// Target surface ID
    pub surface_id: String,

    /// Base path for updates (default "/")
    #[serde(default = "default_path")]
    pub path: String,

    /// Data updates
    #[serde(default, deserialize_with = "lenient_vec")]
    pub contents: Vec<DataEntry>,
}

fn default_path() -> String {
    "/".to_string()
}

/// A single data model entry.
///
/// Accepted shapes:
///
/// ```text
/// {"key": "name", "value": {"literalString": "Alice"}}
/// {"key": "name", "valueString": "Alice"}
/// {"key": "user", "valueMap": [{"key": "name", "valueString": "Alice"}]}
/// {"key": "tags", "valueArray": [{"valueString": "a"}, "b"]}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    /// Key name, possibly dotted
    pub key: String,

    /// Entry value
    pub value: EntryValue,
}

impl DataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<EntryValue>) -> Self {
        DataEntry {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value of a data model entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// A literal, or a path whose current value is copied
    Value(DataValue),
    /// Nested entries, flattened under the parent key
    Map(Vec<DataEntry>),
    /// Items stored under `key.0`, `key.1`, ...
    Array(Vec<EntryValue>),
}

impl From<DataValue> for EntryValue {
    fn from(value: DataValue) -> Self {
        EntryValue::Value(value)
    }
}

impl EntryValue {
    fn from_json(value: &Value) -> Option<Self> {
        if let Value::Object(map) = value {
            if let Some(items) = map.get("valueMap").and_then(Value::as_array) {
                let entries = items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect();
                return Some(EntryValue::Map(entries));
            }
            if let Some(items) = map.get("valueArray").and_then(Value::as_array) {
                return Some(EntryValue::Array(
                    items.iter().filter_map(EntryValue::from_json).collect(),
                ));
            }
        }
        DataValue::from_json(value).map(EntryValue::Value)
    }
}

impl Serialize for EntryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EntryValue::Value(value) => value.serialize(serializer),
            EntryValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("valueMap", entries)?;
                map.end()
            }
            EntryValue::Array(items) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("valueArray", items)?;
                map.end()
            }
        }
    }
}

impl Serialize for DataEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("key", &self.key)?;
        match &self.value {
            EntryValue::Value(value) => map.serialize_entry("value", value)?,
            EntryValue::Map(entries) => map.serialize_entry("valueMap", entries)?,
            EntryValue::Array(items) => map.serialize_entry("valueArray", items)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataEntry {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let Value::Object(mut map) = Value::deserialize(d)? else {
            return Err(de::Error::custom("data entry must be an object"));
        };

        let key = match map.remove("key") {
            Some(Value::String(key)) => key,
            _ => return Err(de::Error::custom("data entry has no string 'key'")),
        };

        let value = match map.remove("value") {
            Some(value) => EntryValue::from_json(&value),
            None => EntryValue::from_json(&Value::Object(map)),
        }
        .ok_or_else(|| de::Error::custom(format!("data entry '{key}' has no usable value")))?;

        Ok(DataEntry { key, value })
    }
}

/// Delete a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    /// Surface ID to delete
    pub surface_id: String,
}

// ============================================================================
// Component property bags
// ============================================================================

/// A decoded component: one typed variant per catalog type, plus an opaque
/// bag for everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    // Layout components
    Column(ColumnComponent),
    Row(RowComponent),
    List(ListComponent),
    Card(CardComponent),
    Grid(GridComponent),

    // Display components
    Text(TextComponent),
    Image(ImageComponent),
    Icon(IconComponent),
    Video(VideoComponent),
    AudioPlayer(AudioPlayerComponent),
    Divider(DividerComponent),
    Badge(BadgeComponent),
    Label(LabelComponent),
    Progress(ProgressComponent),
    Spinner(SpinnerComponent),
    Alert(AlertComponent),
    Avatar(AvatarComponent),
    Toast(ToastComponent),

    // Interactive components
    Button(ButtonComponent),
    Link(LinkComponent),
    TextField(TextFieldComponent),
    TextArea(TextAreaComponent),
    Input(InputComponent),
    DateTimeInput(DateTimeInputComponent),
    CheckBox(CheckBoxComponent),
    Switch(SwitchComponent),
    Slider(SliderComponent),
    Select(SelectComponent),
    RadioGroup(RadioGroupComponent),
    MultipleChoice(MultipleChoiceComponent),
    Pagination(PaginationComponent),
    Breadcrumb(BreadcrumbComponent),
    DropdownMenu(DropdownMenuComponent),

    // Container components
    Modal(ModalComponent),
    Dialog(DialogComponent),
    Sheet(SheetComponent),
    Popover(PopoverComponent),
    Collapsible(CollapsibleComponent),
    Tabs(TabsComponent),
    Accordion(AccordionComponent),
    AccordionItem(AccordionItemComponent),
    Table(TableComponent),
    TableRow(TableRowComponent),
    TableCell(TableCellComponent),

    /// Unknown type, or a known type whose properties did not decode
    Other { type_name: String, properties: Value },
}

impl ComponentKind {
    /// The component type name as it appears on the wire
    pub fn type_name(&self) -> &str {
        match self {
            ComponentKind::Column(_) => "Column",
            ComponentKind::Row(_) => "Row",
            ComponentKind::List(_) => "List",
            ComponentKind::Card(_) => "Card",
            ComponentKind::Grid(_) => "Grid",
            ComponentKind::Text(_) => "Text",
            ComponentKind::Image(_) => "Image",
            ComponentKind::Icon(_) => "Icon",
            ComponentKind::Video(_) => "Video",
            ComponentKind::AudioPlayer(_) => "AudioPlayer",
            ComponentKind::Divider(_) => "Divider",
            ComponentKind::Badge(_) => "Badge",
            ComponentKind::Label(_) => "Label",
            ComponentKind::Progress(_) => "Progress",
            ComponentKind::Spinner(_) => "Spinner",
            ComponentKind::Alert(_) => "Alert",
            ComponentKind::Avatar(_) => "Avatar",
            ComponentKind::Toast(_) => "Toast",
            ComponentKind::Button(_) => "Button",
            ComponentKind::Link(_) => "Link",
            ComponentKind::TextField(_) => "TextField",
            ComponentKind::TextArea(_) => "TextArea",
            ComponentKind::Input(_) => "Input",
            ComponentKind::DateTimeInput(_) => "DateTimeInput",
            ComponentKind::CheckBox(_) => "CheckBox",
            ComponentKind::Switch(_) => "Switch",
            ComponentKind::Slider(_) => "Slider",
            ComponentKind::Select(_) => "Select",
            ComponentKind::RadioGroup(_) => "RadioGroup",
            ComponentKind::MultipleChoice(_) => "MultipleChoice",
            ComponentKind::Pagination(_) => "Pagination",
            ComponentKind::Breadcrumb(_) => "Breadcrumb",
            ComponentKind::DropdownMenu(_) => "DropdownMenu",
            ComponentKind::Modal(_) => "Modal",
            ComponentKind::Dialog(_) => "Dialog",
            ComponentKind::Sheet(_) => "Sheet",
            ComponentKind::Popover(_) => "Popover",
            ComponentKind::Collapsible(_) => "Collapsible",
            ComponentKind::Tabs(_) => "Tabs",
            ComponentKind::Accordion(_) => "Accordion",
            ComponentKind::AccordionItem(_) => "AccordionItem",
            ComponentKind::Table(_) => "Table",
            ComponentKind::TableRow(_) => "TableRow",
            ComponentKind::TableCell(_) => "TableCell",
            ComponentKind::Other { type_name, .. } => type_name,
        }
    }

    /// Ids of the components this one references as children, in render order.
    pub fn child_ids(&self) -> Vec<&str> {
        match self {
            ComponentKind::Column(c) => c.children.ids(),
            ComponentKind::Row(c) => c.children.ids(),
            ComponentKind::List(c) => c.children.ids(),
            ComponentKind::Grid(c) => c.children.ids(),
            ComponentKind::Card(c) => c.child.as_deref().into_iter().chain(c.children.ids()).collect(),
            ComponentKind::Button(c) => c.child.as_deref().into_iter().collect(),
            ComponentKind::Modal(c) => c
                .entry_point_child
                .as_deref()
                .into_iter()
                .chain(c.content_child.as_deref())
                .collect(),
            ComponentKind::Dialog(c) => c.children.ids(),
            ComponentKind::Sheet(c) => c.children.ids(),
            ComponentKind::Popover(c) => c.children.ids(),
            ComponentKind::Collapsible(c) => c.children.ids(),
            ComponentKind::Tabs(c) => c.tab_items.iter().map(|t| t.child.as_str()).collect(),
            ComponentKind::Accordion(c) => c.children.ids(),
            ComponentKind::AccordionItem(c) => c.children.ids(),
            ComponentKind::Table(c) => c.children.ids(),
            ComponentKind::TableRow(c) => c.children.ids(),
            ComponentKind::TableCell(c) => c.children.ids(),
            ComponentKind::Other { properties, .. } => opaque_child_ids(properties),
            ComponentKind::Text(_)
            | ComponentKind::Image(_)
            | ComponentKind::Icon(_)
            | ComponentKind::Video(_)
            | ComponentKind::AudioPlayer(_)
            | ComponentKind::Divider(_)
            | ComponentKind::Badge(_)
            | ComponentKind::Label(_)
            | ComponentKind::Progress(_)
            | ComponentKind::Spinner(_)
            | ComponentKind::Alert(_)
            | ComponentKind::Avatar(_)
            | ComponentKind::Toast(_)
            | ComponentKind::Link(_)
            | ComponentKind::TextField(_)
            | ComponentKind::TextArea(_)
            | ComponentKind::Input(_)
            | ComponentKind::DateTimeInput(_)
            | ComponentKind::CheckBox(_)
            | ComponentKind::Switch(_)
            | ComponentKind::Slider(_)
            | ComponentKind::Select(_)
            | ComponentKind::RadioGroup(_)
            | ComponentKind::MultipleChoice(_)
            | ComponentKind::Pagination(_)
            | ComponentKind::Breadcrumb(_)
            | ComponentKind::DropdownMenu(_) => Vec::new(),
        }
    }

    /// The component-level action: a click, change, close or open-change
    /// handler depending on the type.
    ///
    /// Opaque bags are searched for the same handler keys, so components
    /// outside the catalog can still dispatch.
    pub fn action(&self) -> Option<Cow<'_, Action>> {
        let action = match self {
            ComponentKind::Button(c) => c.action.as_ref(),
            ComponentKind::Link(c) => c.action.as_ref(),
            ComponentKind::TextArea(c) => c.action.as_ref(),
            ComponentKind::Input(c) => c.action.as_ref(),
            ComponentKind::Switch(c) => c.action.as_ref(),
            ComponentKind::Select(c) => c.action.as_ref(),
            ComponentKind::RadioGroup(c) => c.action.as_ref(),
            ComponentKind::Pagination(c) => c.action.as_ref(),
            ComponentKind::Dialog(c) => c.on_close.as_ref(),
            ComponentKind::Sheet(c) => c.on_close.as_ref(),
            ComponentKind::Toast(c) => c.on_close.as_ref(),
            ComponentKind::Popover(c) => c.on_open_change.as_ref(),
            ComponentKind::Collapsible(c) => c.on_open_change.as_ref(),
            ComponentKind::Other { properties, .. } => {
                return opaque_action(properties).map(Cow::Owned);
            }
            _ => None,
        };
        action.map(Cow::Borrowed)
    }

    /// The action of the `index`th item of a list-of-items component
    /// (Breadcrumb, DropdownMenu, or an opaque bag with `items`).
    pub fn item_action(&self, index: usize) -> Option<Cow<'_, Action>> {
        match self {
            ComponentKind::Breadcrumb(c) => c.items.get(index)?.action.as_ref().map(Cow::Borrowed),
            ComponentKind::DropdownMenu(c) => {
                c.items.get(index)?.action.as_ref().map(Cow::Borrowed)
            }
            ComponentKind::Other { properties, .. } => {
                let item = properties.get("items")?.get(index)?;
                opaque_action(item).map(Cow::Owned)
            }
            _ => None,
        }
    }
}

/// Keys under which producers attach handlers to a component
const ACTION_KEYS: [&str; 5] = ["action", "onChange", "onClose", "onOpenChange", "onClick"];

/// First handler in an opaque bag that decodes as a named [`Action`].
fn opaque_action(properties: &Value) -> Option<Action> {
    ACTION_KEYS
        .iter()
        .filter_map(|key| properties.get(*key))
        .filter_map(|value| Action::deserialize(value).ok())
        .find(|action| !action.name.is_empty())
}

/// Child discovery for opaque property bags: `children`, `child` and
/// `tabItems[].child`.
fn opaque_child_ids(properties: &Value) -> Vec<&str> {
    let mut ids = Vec::new();

    match properties.get("children") {
        Some(Value::Array(items)) => ids.extend(items.iter().filter_map(Value::as_str)),
        Some(Value::Object(map)) => {
            if let Some(Value::Array(items)) = map.get("explicitList") {
                ids.extend(items.iter().filter_map(Value::as_str));
            }
        }
        _ => {}
    }

    if let Some(child) = properties.get("child").and_then(Value::as_str) {
        ids.push(child);
    }

    if let Some(Value::Array(items)) = properties.get("tabItems") {
        ids.extend(
            items
                .iter()
                .filter_map(|item| item.get("child").and_then(Value::as_str)),
        );
    }

    ids
}

/// Children reference - a bare list of ids or the `explicitList` wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildrenRef {
    /// Bare list of child component IDs
    Ids(Vec<String>),

    /// `{"explicitList": [...]}`
    Explicit {
        #[serde(rename = "explicitList")]
        explicit_list: Vec<String>,
    },
}

impl ChildrenRef {
    /// Child ids in order
    pub fn ids(&self) -> Vec<&str> {
        match self {
            ChildrenRef::Ids(ids) | ChildrenRef::Explicit { explicit_list: ids } => {
                ids.iter().map(String::as_str).collect()
            }
        }
    }
}

impl Default for ChildrenRef {
    fn default() -> Self {
        ChildrenRef::Ids(vec![])
    }
}

// ============================================================================
// Layout Components
// ============================================================================

/// Vertical layout container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnComponent {
    /// Child component references
    #[serde(default)]
    pub children: ChildrenRef,

    /// Cross-axis alignment
    #[serde(default)]
    pub alignment: Option<DataValue>,

    /// Main-axis distribution
    #[serde(default)]
    pub distribution: Option<DataValue>,
}

/// Horizontal layout container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowComponent {
    /// Child component references
    #[serde(default)]
    pub children: ChildrenRef,

    /// Cross-axis alignment
    #[serde(default)]
    pub alignment: Option<DataValue>,

    /// Main-axis distribution
    #[serde(default)]
    pub distribution: Option<DataValue>,
}

/// Scrollable list container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    /// Scroll direction
    #[serde(default)]
    pub direction: Option<DataValue>,
}

/// Card container, with either a single child or a list of children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardComponent {
    #[serde(default)]
    pub child: Option<String>,

    #[serde(default)]
    pub children: ChildrenRef,
}

/// Grid layout container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    /// Column template, e.g. `"repeat(3, 1fr)"`
    #[serde(default)]
    pub columns: Option<DataValue>,

    #[serde(default)]
    pub min_column_width: Option<DataValue>,

    /// Gap as a number of pixels or a CSS length
    #[serde(default)]
    pub gap: Option<Value>,

    #[serde(default)]
    pub justify_items: Option<DataValue>,

    #[serde(default)]
    pub align_items: Option<DataValue>,
}

// ============================================================================
// Display Components
// ============================================================================

/// Text display component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextComponent {
    /// Text content (literal or path-bound)
    #[serde(default)]
    pub text: DataValue,

    /// Usage hint for styling (h1, h2, h3, body, caption, etc.)
    #[serde(default)]
    pub usage_hint: Option<DataValue>,
}

/// Image display component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComponent {
    /// Image URL (literal or path-bound)
    pub url: DataValue,

    #[serde(default)]
    pub fit: Option<DataValue>,

    #[serde(default)]
    pub usage_hint: Option<DataValue>,
}

/// Icon component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconComponent {
    /// Icon name (e.g., "settings", "check", "close")
    pub name: DataValue,
}

/// Visual divider/separator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerComponent {
    #[serde(default, alias = "orientation")]
    pub axis: Option<DataValue>,
}

/// Small status label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeComponent {
    pub text: DataValue,

    #[serde(default)]
    pub variant: Option<DataValue>,
}

/// Video player
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoComponent {
    pub url: DataValue,
}

/// Audio player
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerComponent {
    pub url: DataValue,

    #[serde(default)]
    pub description: Option<DataValue>,
}

/// Form label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelComponent {
    #[serde(default)]
    pub text: Option<DataValue>,

    /// Id of the input this label names
    #[serde(default)]
    pub html_for: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,
}

/// Progress bar
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressComponent {
    #[serde(default)]
    pub value: Option<DataValue>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub max: Option<f64>,

    #[serde(default)]
    pub show_label: Option<bool>,
}

/// Loading indicator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinnerComponent {
    #[serde(default)]
    pub size: Option<DataValue>,

    #[serde(default)]
    pub label: Option<DataValue>,
}

/// Inline callout with a title and description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertComponent {
    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub description: Option<DataValue>,

    #[serde(default)]
    pub variant: Option<DataValue>,
}

/// User picture with a text fallback
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarComponent {
    #[serde(default)]
    pub src: Option<DataValue>,

    #[serde(default)]
    pub alt: Option<DataValue>,

    #[serde(default)]
    pub fallback: Option<DataValue>,

    #[serde(default)]
    pub size: Option<DataValue>,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastComponent {
    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub description: Option<DataValue>,

    #[serde(default)]
    pub variant: Option<DataValue>,

    /// Milliseconds before the toast closes itself
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,

    #[serde(default)]
    pub on_close: Option<Action>,
}

// ============================================================================
// Interactive Components
// ============================================================================

/// Clickable button component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonComponent {
    /// Child component ID (button content)
    #[serde(default)]
    pub child: Option<String>,

    /// Whether this is a primary action
    #[serde(default)]
    pub primary: Option<bool>,

    /// Action to trigger on click
    #[serde(default)]
    pub action: Option<Action>,
}

/// Text input field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFieldComponent {
    /// Current value (path-bound for two-way binding)
    #[serde(default)]
    pub text: Option<DataValue>,

    #[serde(default)]
    pub label: Option<DataValue>,

    #[serde(default)]
    pub placeholder: Option<DataValue>,

    /// Input type (shortText, longText, number, date)
    #[serde(default, rename = "type", alias = "inputType")]
    pub field_type: Option<DataValue>,

    #[serde(default)]
    pub validation_regexp: Option<String>,
}

/// Checkbox component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckBoxComponent {
    /// Current checked state (path-bound)
    pub value: DataValue,

    #[serde(default)]
    pub label: Option<DataValue>,
}

/// Slider component for numeric input
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderComponent {
    /// Current value (path-bound)
    pub value: DataValue,

    #[serde(default, alias = "min", deserialize_with = "lenient_f64")]
    pub min_value: Option<f64>,

    #[serde(default, alias = "max", deserialize_with = "lenient_f64")]
    pub max_value: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub step: Option<f64>,
}

/// Multiple choice selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceComponent {
    /// Selected value(s): a path, or a `literalArray`
    #[serde(default)]
    pub selections: Option<Value>,

    /// Available options
    #[serde(default, deserialize_with = "lenient_vec")]
    pub options: Vec<ChoiceOption>,

    #[serde(default)]
    pub max_allowed_selections: Option<u32>,
}

/// A single choice option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    /// Option value
    pub value: String,
    /// Display label
    pub label: DataValue,
}

/// Hyperlink, optionally routed through an action instead of `href`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkComponent {
    #[serde(default)]
    pub href: Option<DataValue>,

    #[serde(default)]
    pub text: Option<DataValue>,

    #[serde(default)]
    pub external: Option<bool>,

    #[serde(default)]
    pub action: Option<Action>,
}

/// Multi-line text input
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaComponent {
    #[serde(default)]
    pub value: Option<DataValue>,

    #[serde(default)]
    pub placeholder: Option<DataValue>,

    #[serde(default)]
    pub disabled: Option<bool>,

    #[serde(default)]
    pub read_only: Option<bool>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub rows: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_length: Option<f64>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// Single-line input with an HTML input type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputComponent {
    /// text, email, password, number, tel or url
    #[serde(default, rename = "type")]
    pub input_type: Option<DataValue>,

    #[serde(default)]
    pub value: Option<DataValue>,

    #[serde(default)]
    pub placeholder: Option<DataValue>,

    #[serde(default)]
    pub disabled: Option<bool>,

    #[serde(default)]
    pub read_only: Option<bool>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// Date and/or time picker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeInputComponent {
    /// Current value (path-bound)
    pub value: DataValue,

    #[serde(default)]
    pub enable_date: Option<bool>,

    #[serde(default)]
    pub enable_time: Option<bool>,

    #[serde(default)]
    pub output_format: Option<String>,
}

/// On/off toggle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchComponent {
    /// Current state, a literal or a bound path
    #[serde(default)]
    pub checked: Option<DataValue>,

    #[serde(default)]
    pub disabled: Option<bool>,

    #[serde(default)]
    pub label: Option<DataValue>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// Drop-down selection of one option
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectComponent {
    #[serde(default)]
    pub label: Option<DataValue>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub options: Vec<ChoiceOption>,

    /// Selected option value (path-bound)
    #[serde(default)]
    pub value: Option<DataValue>,

    #[serde(default)]
    pub placeholder: Option<DataValue>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// Radio buttons, one option selectable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroupComponent {
    #[serde(default)]
    pub value: Option<DataValue>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub options: Vec<RadioOption>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// A single radio option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOption {
    pub label: DataValue,

    /// Falls back to the label when absent
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub disabled: Option<bool>,
}

/// Page navigation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationComponent {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_page: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_pages: Option<f64>,

    #[serde(default)]
    pub show_first_last: Option<bool>,

    #[serde(default, alias = "onChange")]
    pub action: Option<Action>,
}

/// Navigation trail; each item may carry its own action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbComponent {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub items: Vec<BreadcrumbItem>,

    #[serde(default)]
    pub separator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    pub label: DataValue,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub action: Option<Action>,
}

/// Menu behind a trigger button; each item may carry its own action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownMenuComponent {
    #[serde(default)]
    pub trigger_label: Option<DataValue>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default)]
    pub label: Option<DataValue>,

    /// `"separator"` for a divider line
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,

    #[serde(default)]
    pub action: Option<Action>,

    #[serde(default)]
    pub disabled: Option<bool>,
}

// ============================================================================
// Container Components
// ============================================================================

/// Modal dialog: an entry point (e.g. a button) and the content it opens
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalComponent {
    #[serde(default)]
    pub entry_point_child: Option<String>,

    #[serde(default)]
    pub content_child: Option<String>,
}

/// Tabbed interface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsComponent {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tab_items: Vec<TabItem>,
}

/// A single tab: its title and the component shown when selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    #[serde(default)]
    pub title: DataValue,
    pub child: String,
}

/// Dialog window around its children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub open: Option<DataValue>,

    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub description: Option<DataValue>,

    #[serde(default)]
    pub on_close: Option<Action>,
}

/// Panel sliding in from a screen edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub open: Option<DataValue>,

    /// top, bottom, left or right
    #[serde(default)]
    pub side: Option<DataValue>,

    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub description: Option<DataValue>,

    #[serde(default)]
    pub on_close: Option<Action>,
}

/// Floating panel anchored to a trigger
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopoverComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub open: Option<DataValue>,

    #[serde(default)]
    pub trigger_label: Option<DataValue>,

    #[serde(default)]
    pub align: Option<DataValue>,

    #[serde(default)]
    pub side: Option<DataValue>,

    #[serde(default)]
    pub on_open_change: Option<Action>,
}

/// Section that can be expanded and collapsed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsibleComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub open: Option<DataValue>,

    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub on_open_change: Option<Action>,
}

/// Stack of expandable [`AccordionItemComponent`]s
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    /// single or multiple
    #[serde(default, rename = "type")]
    pub accordion_type: Option<String>,

    /// Initially open item value(s): a string or a list of strings
    #[serde(default)]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionItemComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub title: Option<DataValue>,

    #[serde(default)]
    pub open: Option<bool>,
}

/// Data table; rows are its children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub caption: Option<DataValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub selected: Option<bool>,
}

/// Table cell: either inline `text` or child components
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellComponent {
    #[serde(default)]
    pub children: ChildrenRef,

    #[serde(default)]
    pub is_header: Option<bool>,

    #[serde(default)]
    pub align: Option<DataValue>,

    #[serde(default)]
    pub text: Option<DataValue>,
}

// ============================================================================
// Action
// ============================================================================

/// Action definition for interactive components
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action name (e.g., "addToCart", "submit"); an empty name never dispatches
    #[serde(default)]
    pub name: String,

    /// Context values resolved at dispatch time
    #[serde(default, deserialize_with = "lenient_vec")]
    pub context: Vec<ActionContextItem>,
}

/// A single context item for an action.
///
/// LLMs sometimes generate malformed context items (e.g. `{"path": "/x"}`
/// instead of `{"key": "x", "value": {"path": "/x"}}`). Fields are
/// defaulted to make deserialization lenient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContextItem {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub value: DataValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_begin_rendering() {
        let json = r##"{"beginRendering": {"surfaceId": "main", "root": "root-column", "styles": {"primaryColor": "#007BFF", "radius": "8px"}}}"##;

        let msg = Message::from_json(json).unwrap();
        match msg {
            Message::BeginRendering(br) => {
                assert_eq!(br.surface_id, "main");
                assert_eq!(br.root, "root-column");
                let styles = br.styles.unwrap();
                assert_eq!(styles.primary_color, Some("#007BFF".to_string()));
                assert_eq!(styles.extra.get("radius"), Some(&json!("8px")));
            }
            _ => panic!("Expected BeginRendering"),
        }
    }

    #[test]
    fn test_parse_surface_update() {
        let json = r##"{"surfaceUpdate": {"surfaceId": "main", "components": [{"id": "title", "component": {"Text": {"text": {"literalString": "Hello"}, "usageHint": "h1"}}}]}}"##;

        let msg = Message::from_json(json).unwrap();
        match msg {
            Message::SurfaceUpdate(su) => {
                assert_eq!(su.surface_id, "main");
                assert_eq!(su.components.len(), 1);
                assert_eq!(su.components[0].id, "title");
                assert_eq!(su.components[0].component.type_name, "Text");
            }
            _ => panic!("Expected SurfaceUpdate"),
        }
    }

    #[test]
    fn test_malformed_component_is_skipped() {
        let json = r##"{"surfaceUpdate": {"surfaceId": "main", "components": [
            {"component": {"Text": {}}},
            {"id": "ok", "component": {"Divider": {}}}
        ]}}"##;

        let Message::SurfaceUpdate(su) = Message::from_json(json).unwrap() else {
            panic!("Expected SurfaceUpdate");
        };
        assert_eq!(su.components.len(), 1);
        assert_eq!(su.components[0].id, "ok");
    }

    #[test]
    fn test_parse_data_model_update() {
        let json = r##"{"dataModelUpdate": {"surfaceId": "main", "path": "/", "contents": [{"key": "name", "value": {"literalString": "Alice"}}, {"key": "count", "valueNumber": 42}]}}"##;

        let msg = Message::from_json(json).unwrap();
        match msg {
            Message::DataModelUpdate(dm) => {
                assert_eq!(dm.surface_id, "main");
                assert_eq!(dm.contents.len(), 2);
                assert_eq!(
                    dm.contents[1].value,
                    EntryValue::Value(DataValue::number(42.0))
                );
            }
            _ => panic!("Expected DataModelUpdate"),
        }
    }

    #[test]
    fn test_data_model_path_defaults_to_root() {
        let json = r#"{"dataModelUpdate": {"surfaceId": "main", "contents": []}}"#;
        let Message::DataModelUpdate(dm) = Message::from_json(json).unwrap() else {
            panic!("Expected DataModelUpdate");
        };
        assert_eq!(dm.path, "/");
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let msg = Message::from_json(r#"{"streamStatus": {"done": true}}"#).unwrap();
        assert_eq!(msg, Message::Unknown { kind: "streamStatus".into() });
        assert_eq!(msg.surface_id(), None);
    }

    #[test]
    fn test_envelope_errors() {
        assert!(matches!(
            Message::from_json("[1, 2]"),
            Err(BridgeError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            Message::from_json("{}"),
            Err(BridgeError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            Message::from_json(r#"{"deleteSurface": {"surfaceId": "a"}, "beginRendering": {}}"#),
            Err(BridgeError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            Message::from_json(r#"{"beginRendering": "#),
            Err(BridgeError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_message_array() {
        let json = r##"[
            {"beginRendering": {"surfaceId": "main", "root": "root-column"}},
            {"surfaceUpdate": {"surfaceId": "main", "components": []}},
            {"dataModelUpdate": {"surfaceId": "main", "path": "/", "contents": [{"key": "products", "valueArray": [{"valueMap": [{"key": "name", "valueString": "Test"}]}]}]}}
        ]"##;

        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].kind(), "dataModelUpdate");
    }

    #[test]
    fn test_message_serializes_to_wire_shape() {
        let msg = Message::DeleteSurface(DeleteSurface {
            surface_id: "@default".into(),
        });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"deleteSurface": {"surfaceId": "@default"}})
        );
    }

    #[test]
    fn test_child_ids_from_known_shapes() {
        let card = ComponentKind::Card(CardComponent {
            child: None,
            children: ChildrenRef::Explicit {
                explicit_list: vec!["a".into(), "b".into()],
            },
        });
        assert_eq!(card.child_ids(), vec!["a", "b"]);

        let tabs = ComponentKind::Tabs(TabsComponent {
            tab_items: vec![
                TabItem { title: DataValue::string("One"), child: "t1".into() },
                TabItem { title: DataValue::string("Two"), child: "t2".into() },
            ],
        });
        assert_eq!(tabs.child_ids(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_child_ids_from_opaque_bag() {
        let other = ComponentKind::Other {
            type_name: "Accordion".into(),
            properties: json!({
                "children": ["x", 3, "y"],
                "child": "z",
                "tabItems": [{"child": "w"}, {"title": "no child"}]
            }),
        };
        assert_eq!(other.child_ids(), vec!["x", "y", "z", "w"]);
    }

    fn decode<T: DeserializeOwned>(properties: Value) -> T {
        serde_json::from_value(properties).unwrap()
    }

    #[test]
    fn test_actions_on_non_button_components() {
        let link = ComponentKind::Link(decode(json!({
            "text": "Docs",
            "action": {"name": "openDocs"}
        })));
        assert_eq!(link.action().unwrap().name, "openDocs");

        let switch = ComponentKind::Switch(decode(json!({"onChange": {"name": "toggle"}})));
        assert_eq!(switch.action().unwrap().name, "toggle");

        let dialog = ComponentKind::Dialog(decode(json!({"onClose": {"name": "dismiss"}})));
        assert_eq!(dialog.action().unwrap().name, "dismiss");

        let text = ComponentKind::Text(decode(json!({"text": "plain"})));
        assert!(text.action().is_none());
    }

    #[test]
    fn test_action_from_opaque_bag() {
        let other = ComponentKind::Other {
            type_name: "HoverCard".into(),
            properties: json!({
                "action": "not an action",
                "onChange": {"context": []},
                "onOpenChange": {"name": "peek"}
            }),
        };
        assert_eq!(other.action().unwrap().name, "peek");

        let silent = ComponentKind::Other {
            type_name: "Tooltip".into(),
            properties: json!({"content": "hi"}),
        };
        assert!(silent.action().is_none());
    }

    #[test]
    fn test_item_actions() {
        let menu = ComponentKind::DropdownMenu(decode(json!({
            "items": [
                {"label": "Edit", "action": {"name": "edit"}},
                {"type": "separator"},
                {"label": "Delete", "action": {"name": "delete"}}
            ]
        })));
        assert_eq!(menu.item_action(2).unwrap().name, "delete");
        assert!(menu.item_action(1).is_none());
        assert!(menu.item_action(9).is_none());
        assert!(menu.action().is_none());

        let crumbs = ComponentKind::Other {
            type_name: "Crumbs".into(),
            properties: json!({"items": [{"label": "Home", "action": {"name": "home"}}]}),
        };
        assert_eq!(crumbs.item_action(0).unwrap().name, "home");
    }
}
