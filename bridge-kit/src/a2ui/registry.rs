//! A2UI Component Catalog
//!
//! Maps A2UI component type names to the decoders that turn a raw property
//! bag into a typed [`ComponentKind`].

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::message::*;

/// Decoder from a raw property bag to a typed component.
pub type DecodeFn = fn(&Value) -> Result<ComponentKind, serde_json::Error>;

/// Broad grouping of catalog types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentCategory {
    Layout,
    Display,
    Interactive,
    Container,
}

/// Catalog information for a component type
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: ComponentCategory,

    /// Description of the component
    pub description: &'static str,

    /// Property decoder
    pub decode: DecodeFn,
}

/// Registry of known component types.
///
/// Types that are not registered still flow through the processor as
/// [`ComponentKind::Other`], so a catalog only decides which components get
/// a typed view, never which ones survive.
///
/// # Example
///
/// ```rust
/// use bridge_kit::a2ui::{ComponentCatalog, ComponentKind};
/// use serde_json::json;
///
/// let catalog = ComponentCatalog::with_standard_catalog();
///
/// let kind = catalog.decode("Text", &json!({"text": {"literalString": "Hi"}}));
/// assert!(matches!(kind, ComponentKind::Text(_)));
///
/// let kind = catalog.decode("Sparkline", &json!({"points": [1, 2, 3]}));
/// assert_eq!(kind.type_name(), "Sparkline");
/// ```
#[derive(Debug, Clone)]
pub struct ComponentCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::with_standard_catalog()
    }
}

impl ComponentCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        ComponentCatalog {
            entries: HashMap::new(),
        }
    }

    /// Create a catalog with the standard A2UI component types
    pub fn with_standard_catalog() -> Self {
        use ComponentCategory::*;

        let mut catalog = Self::new();

        // Layout components
        catalog.register("Column", Layout, "Vertical layout container", |p| {
            ColumnComponent::deserialize(p).map(ComponentKind::Column)
        });
        catalog.register("Row", Layout, "Horizontal layout container", |p| {
            RowComponent::deserialize(p).map(ComponentKind::Row)
        });
        catalog.register("List", Layout, "Scrollable list", |p| {
            ListComponent::deserialize(p).map(ComponentKind::List)
        });
        catalog.register("Card", Layout, "Card container with elevation", |p| {
            CardComponent::deserialize(p).map(ComponentKind::Card)
        });
        catalog.register("Grid", Layout, "Grid layout with column template", |p| {
            GridComponent::deserialize(p).map(ComponentKind::Grid)
        });

        // Display components
        catalog.register("Text", Display, "Text display with usage hints", |p| {
            TextComponent::deserialize(p).map(ComponentKind::Text)
        });
        catalog.register("Image", Display, "Image display with fit modes", |p| {
            ImageComponent::deserialize(p).map(ComponentKind::Image)
        });
        catalog.register("Icon", Display, "Icon display", |p| {
            IconComponent::deserialize(p).map(ComponentKind::Icon)
        });
        catalog.register("Divider", Display, "Visual separator", |p| {
            DividerComponent::deserialize(p).map(ComponentKind::Divider)
        });
        catalog.register("Badge", Display, "Small status label", |p| {
            BadgeComponent::deserialize(p).map(ComponentKind::Badge)
        });
        catalog.register("Video", Display, "Video player", |p| {
            VideoComponent::deserialize(p).map(ComponentKind::Video)
        });
        catalog.register("AudioPlayer", Display, "Audio player with description", |p| {
            AudioPlayerComponent::deserialize(p).map(ComponentKind::AudioPlayer)
        });
        catalog.register("Label", Display, "Form label", |p| {
            LabelComponent::deserialize(p).map(ComponentKind::Label)
        });
        catalog.register("Progress", Display, "Progress bar", |p| {
            ProgressComponent::deserialize(p).map(ComponentKind::Progress)
        });
        catalog.register("Spinner", Display, "Loading indicator", |p| {
            SpinnerComponent::deserialize(p).map(ComponentKind::Spinner)
        });
        catalog.register("Alert", Display, "Callout with title and description", |p| {
            AlertComponent::deserialize(p).map(ComponentKind::Alert)
        });
        catalog.register("Avatar", Display, "User picture with fallback", |p| {
            AvatarComponent::deserialize(p).map(ComponentKind::Avatar)
        });
        catalog.register("Toast", Display, "Transient notification", |p| {
            ToastComponent::deserialize(p).map(ComponentKind::Toast)
        });

        // Interactive components
        catalog.register("Button", Interactive, "Clickable button with action", |p| {
            ButtonComponent::deserialize(p).map(ComponentKind::Button)
        });
        catalog.register("TextField", Interactive, "Text input with two-way binding", |p| {
            TextFieldComponent::deserialize(p).map(ComponentKind::TextField)
        });
        catalog.register("CheckBox", Interactive, "Boolean toggle", |p| {
            CheckBoxComponent::deserialize(p).map(ComponentKind::CheckBox)
        });
        catalog.register("Slider", Interactive, "Numeric range slider", |p| {
            SliderComponent::deserialize(p).map(ComponentKind::Slider)
        });
        catalog.register("MultipleChoice", Interactive, "Selection from options", |p| {
            MultipleChoiceComponent::deserialize(p).map(ComponentKind::MultipleChoice)
        });
        catalog.register("Link", Interactive, "Hyperlink or action trigger", |p| {
            LinkComponent::deserialize(p).map(ComponentKind::Link)
        });
        catalog.register("TextArea", Interactive, "Multi-line text input", |p| {
            TextAreaComponent::deserialize(p).map(ComponentKind::TextArea)
        });
        catalog.register("Input", Interactive, "Single-line typed input", |p| {
            InputComponent::deserialize(p).map(ComponentKind::Input)
        });
        catalog.register("DateTimeInput", Interactive, "Date and time picker", |p| {
            DateTimeInputComponent::deserialize(p).map(ComponentKind::DateTimeInput)
        });
        catalog.register("Switch", Interactive, "On/off toggle", |p| {
            SwitchComponent::deserialize(p).map(ComponentKind::Switch)
        });
        catalog.register("Select", Interactive, "Drop-down selection", |p| {
            SelectComponent::deserialize(p).map(ComponentKind::Select)
        });
        catalog.register("RadioGroup", Interactive, "Single choice radio buttons", |p| {
            RadioGroupComponent::deserialize(p).map(ComponentKind::RadioGroup)
        });
        catalog.register("Pagination", Interactive, "Page navigation", |p| {
            PaginationComponent::deserialize(p).map(ComponentKind::Pagination)
        });
        catalog.register("Breadcrumb", Interactive, "Navigation trail", |p| {
            BreadcrumbComponent::deserialize(p).map(ComponentKind::Breadcrumb)
        });
        catalog.register("DropdownMenu", Interactive, "Menu of actions", |p| {
            DropdownMenuComponent::deserialize(p).map(ComponentKind::DropdownMenu)
        });

        // Container components
        catalog.register("Modal", Container, "Modal dialog overlay", |p| {
            ModalComponent::deserialize(p).map(ComponentKind::Modal)
        });
        catalog.register("Tabs", Container, "Tabbed interface", |p| {
            TabsComponent::deserialize(p).map(ComponentKind::Tabs)
        });
        catalog.register("Dialog", Container, "Dialog window", |p| {
            DialogComponent::deserialize(p).map(ComponentKind::Dialog)
        });
        catalog.register("Sheet", Container, "Edge panel", |p| {
            SheetComponent::deserialize(p).map(ComponentKind::Sheet)
        });
        catalog.register("Popover", Container, "Anchored floating panel", |p| {
            PopoverComponent::deserialize(p).map(ComponentKind::Popover)
        });
        catalog.register("Collapsible", Container, "Expandable section", |p| {
            CollapsibleComponent::deserialize(p).map(ComponentKind::Collapsible)
        });
        catalog.register("Accordion", Container, "Stack of expandable items", |p| {
            AccordionComponent::deserialize(p).map(ComponentKind::Accordion)
        });
        catalog.register("AccordionItem", Container, "Single accordion section", |p| {
            AccordionItemComponent::deserialize(p).map(ComponentKind::AccordionItem)
        });
        catalog.register("Table", Container, "Data table", |p| {
            TableComponent::deserialize(p).map(ComponentKind::Table)
        });
        catalog.register("TableRow", Container, "Table row", |p| {
            TableRowComponent::deserialize(p).map(ComponentKind::TableRow)
        });
        catalog.register("TableCell", Container, "Table cell", |p| {
            TableCellComponent::deserialize(p).map(ComponentKind::TableCell)
        });

        // Alternate spellings
        catalog.alias("Checkbox", "CheckBox");
        catalog.alias("Separator", "Divider");

        catalog
    }

    /// Register a component type, replacing any previous entry of that name
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        category: ComponentCategory,
        description: &'static str,
        decode: DecodeFn,
    ) {
        self.entries.insert(
            type_name.into(),
            CatalogEntry {
                category,
                description,
                decode,
            },
        );
    }

    /// Make `alias` decode exactly like the already registered `target`
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) {
        if let Some(entry) = self.entries.get(target).cloned() {
            self.entries.insert(alias.into(), entry);
        }
    }

    /// Get the catalog entry for a type name
    pub fn get(&self, type_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(type_name)
    }

    /// Check if a type name is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decode a raw property bag.
    ///
    /// Unknown types, and known types whose properties do not match the
    /// expected shape, come back as [`ComponentKind::Other`] holding the
    /// original bag.
    pub fn decode(&self, type_name: &str, properties: &Value) -> ComponentKind {
        let Some(entry) = self.entries.get(type_name) else {
            log::warn!(
                "[A2UI catalog] Unknown component type '{}', keeping raw properties",
                type_name
            );
            return ComponentKind::Other {
                type_name: type_name.to_string(),
                properties: properties.clone(),
            };
        };

        let empty = Value::Object(Default::default());
        let input = if properties.is_null() { &empty } else { properties };

        match (entry.decode)(input) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!(
                    "[A2UI catalog] Properties of '{}' did not decode ({}), keeping raw properties",
                    type_name,
                    e
                );
                ComponentKind::Other {
                    type_name: type_name.to_string(),
                    properties: properties.clone(),
                }
            }
        }
    }
}
