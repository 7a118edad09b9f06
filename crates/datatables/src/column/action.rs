use std::fmt;
use std::sync::Arc;

use minijinja::context;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use super::{
    kind_options, CellTemplate, Column, ColumnOptions, ColumnType, OptionKind, OptionSchema,
};
use crate::error::Result;

const TOOLBAR: &str = r##"<div class="datatable-actions">{% for item in items %}<a href="{{ item.path|default("#") }}" class="btn btn-sm btn-icon{% if item.contextClass %} btn-{{ item.contextClass }}{% endif %}" data-action="{{ item.key }}"{% if item.label %} title="{{ item.label }}"{% endif %}>{% if item.icon %}<i class="{{ item.icon }}"></i>{% elif item.label %}{{ item.label }}{% else %}{{ item.key }}{% endif %}</a>{% endfor %}</div>"##;
const DROPDOWN: &str = r##"<div class="dropdown datatable-actions"><button class="btn btn-sm dropdown-toggle" type="button" data-bs-toggle="dropdown" aria-expanded="false">{{ label }}</button><ul class="dropdown-menu">{% for item in items %}<li><a class="dropdown-item{% if item.contextClass %} text-{{ item.contextClass }}{% endif %}" href="{{ item.path|default("#") }}" data-action="{{ item.key }}">{% if item.icon %}<i class="{{ item.icon }}"></i> {% endif %}{% if item.label %}{{ item.label }}{% else %}{{ item.key }}{% endif %}</a></li>{% endfor %}</ul></div>"##;

/// One link in an action column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionColumnItem {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_class: Option<String>,
}

impl ActionColumnItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn context_class(mut self, class: impl Into<String>) -> Self {
        self.context_class = Some(class.into());
        self
    }
}

/// Items shown for a row.
#[derive(Clone)]
pub enum ActionItems {
    Static(Vec<ActionColumnItem>),
    /// Computed from the row on every render.
    PerRow(Arc<dyn Fn(&Json) -> Vec<ActionColumnItem> + Send + Sync>),
}

impl ActionItems {
    fn resolve(&self, row: &Json) -> Vec<ActionColumnItem> {
        match self {
            ActionItems::Static(items) => items.clone(),
            ActionItems::PerRow(items) => items(row),
        }
    }
}

impl fmt::Debug for ActionItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionItems::Static(items) => f.debug_tuple("Static").field(items).finish(),
            ActionItems::PerRow(_) => f.write_str("PerRow(<fn>)"),
        }
    }
}

/// Built-in markup used when no custom template is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLayout {
    #[default]
    Toolbar,
    Dropdown,
}

impl ActionLayout {
    fn template(self) -> &'static str {
        match self {
            ActionLayout::Toolbar => TOOLBAR,
            ActionLayout::Dropdown => DROPDOWN,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionOptions {
    #[serde(rename = "type", default)]
    layout: ActionLayout,
    #[serde(default)]
    template: Option<String>,
    items: Vec<ActionColumnItem>,
}

/// Per-row action links, as a toolbar or a dropdown.
///
/// A row with no items renders as an empty string. Never orderable or
/// searchable unless set explicitly.
#[derive(Clone, Debug)]
pub struct ActionColumn {
    items: ActionItems,
    layout: ActionLayout,
    template: Option<String>,
    compiled: OnceCell<CellTemplate>,
}

impl Default for ActionColumn {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ActionColumn {
    pub fn new(items: Vec<ActionColumnItem>) -> Self {
        Self::with_items(ActionItems::Static(items))
    }

    pub fn per_row<F>(items: F) -> Self
    where
        F: Fn(&Json) -> Vec<ActionColumnItem> + Send + Sync + 'static,
    {
        Self::with_items(ActionItems::PerRow(Arc::new(items)))
    }

    fn with_items(items: ActionItems) -> Self {
        Self {
            items,
            layout: ActionLayout::default(),
            template: None,
            compiled: OnceCell::new(),
        }
    }

    pub fn layout(mut self, layout: ActionLayout) -> Self {
        self.layout = layout;
        self.compiled = OnceCell::new();
        self
    }

    /// Replaces the layout markup. `row`, `value`, `label` and `items` are
    /// in context.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self.compiled = OnceCell::new();
        self
    }

    fn compiled(&self) -> Result<&CellTemplate> {
        self.compiled.get_or_try_init(|| {
            CellTemplate::html(
                self.template
                    .as_deref()
                    .unwrap_or_else(|| self.layout.template()),
            )
        })
    }
}

impl ColumnType for ActionColumn {
    fn kind(&self) -> &'static str {
        "action"
    }

    fn configure_defaults(&self, options: &mut ColumnOptions) {
        options.orderable.get_or_insert(false);
        options.searchable.get_or_insert(false);
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema
            .define("type", OptionKind::String)
            .define("template", OptionKind::String)
            .define("items", OptionKind::Array)
            .require("items");
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        let parsed: ActionOptions = kind_options(self.kind(), options)?;
        let mut column = ActionColumn::new(parsed.items).layout(parsed.layout);
        column.template = parsed.template;
        Ok(Arc::new(column))
    }

    fn validate(&self) -> Result<()> {
        self.compiled().map(|_| ())
    }

    fn normalize(&self, value: Json) -> Json {
        value
    }

    fn render(&self, column: &Column, value: Json, row: &Json) -> Result<Json> {
        let items = self.items.resolve(row);
        if items.is_empty() {
            return Ok(Json::String(String::new()));
        }
        let rendered = self.compiled()?.render(context! {
            row => row,
            value => value,
            label => column.label().unwrap_or_default(),
            items => items,
        })?;
        Ok(Json::String(rendered))
    }
}
