//! Webview host adapter: HTML stub generation with consistent escaping
use crate::errors::HostError;
use crate::host::HostAdapter;
use crate::props::{diff_props_filtered, PropDelta, PropValue, Props};
use crate::snapshot::TreeNode;
use crate::types::{next_id, Handle, Initializer, RenderPayload};
use phf::{phf_map, phf_set};
use std::collections::HashMap;

// Compile-time widget tag lookup (zero allocation)
static WIDGET_TAGS: phf::Map<&'static str, &'static str> = phf_map! {
    "Text" => "p",
    "Image" => "img",
    "Icon" => "i",
    "Spacer" => "div",
    "SizedBox" => "div",
    "TextButton" => "button",
    "ElevatedButton" => "button",
    "IconButton" => "button",
    "FloatingActionButton" => "button",
    "SnackBarAction" => "button",
    "ListTile" => "div",
    "Divider" => "div",
    "Dialog" => "div",
    "AspectRatio" => "div",
    "ClipPath" => "div",
    "Positioned" => "div",
};

/// Callback props are re-created on every build; diffing them would turn
/// every round into an UPDATE.
static IGNORED_PROPS: phf::Set<&'static str> = phf_set! {
    "widget_instance",
    "itemBuilder",
    "onChanged",
    "onPressed",
    "onTap",
    "onDrag",
};

static VOID_TAGS: phf::Set<&'static str> = phf_set! { "img", "hr", "br" };

/// Widgets that only compose others; they never reach the page.
static COMPOSABLE_TYPES: phf::Set<&'static str> = phf_set! {
    "StatefulWidget",
    "StatelessWidget",
    "_WidgetProxy",
};

/// Marker prop and the page-script initializer it requests. The initializer
/// receives the node's full props.
const PROP_INITIALIZERS: [(&str, &str); 5] = [
    ("init_dropdown", "dropdown"),
    ("init_slider", "slider"),
    ("init_gesture_detector", "gesture_detector"),
    ("init_virtual_list", "virtual_list"),
    ("init_gradient_clip_border", "gradient_clip_border"),
];

/// Custom stub renderer for one widget type.
pub type StubRenderer = fn(&Handle, &Props) -> Result<RenderPayload, HostError>;

/// Host adapter for the HTML/webview renderer. Handles come from the
/// process-wide `fw_id_N` sequence.
#[derive(Default)]
pub struct HtmlHost {
    renderers: HashMap<String, StubRenderer>,
}

impl HtmlHost {
    pub fn new() -> Self {
        HtmlHost::default()
    }

    /// Use `renderer` instead of the generic stub for `node_type`.
    pub fn register_renderer(&mut self, node_type: impl Into<String>, renderer: StubRenderer) {
        self.renderers.insert(node_type.into(), renderer);
    }
}

impl HostAdapter for HtmlHost {
    fn allocate_handle(&mut self) -> Result<Handle, HostError> {
        Ok(next_id())
    }

    fn render_stub(&mut self, handle: &Handle, node_type: &str, props: &Props) -> Result<RenderPayload, HostError> {
        match self.renderers.get(node_type) {
            Some(renderer) => renderer(handle, props).map_err(|e| {
                HostError::new(format!("stub generation failed for widget '{}': {}", node_type, e))
            }),
            None => Ok(generate_html_stub(handle, node_type, props)),
        }
    }

    fn prop_delta(&self, old: &Props, new: &Props) -> PropDelta {
        diff_props_filtered(old, new, |name| IGNORED_PROPS.contains(name))
    }

    fn renders(&self, node_type: &str) -> bool {
        !COMPOSABLE_TYPES.contains(node_type)
    }

    fn mount_initializers(&mut self, handle: &Handle, node: &TreeNode) -> Vec<Initializer> {
        mount_initializers(handle, node)
    }
}

/// Initializers the page script runs once an element is attached.
pub fn mount_initializers(handle: &Handle, node: &TreeNode) -> Vec<Initializer> {
    let mut initializers = Vec::new();
    let init = |init_type: &str, data: serde_json::Value| Initializer {
        init_type: init_type.to_string(),
        target_id: Some(handle.clone()),
        data,
        id: None,
    };

    if node.node_type == "Scrollbar" {
        let options = node
            .props
            .get("simplebar_options")
            .map(PropValue::to_json)
            .unwrap_or_else(|| serde_json::json!({}));
        initializers.push(init("SimpleBar", options));
    }

    if let Some(clip) = node.props.get("responsive_clip_path") {
        initializers.push(init("ResponsiveClipPath", clip.to_json()));
    }

    for (marker, init_type) in PROP_INITIALIZERS {
        // sliders also need their `type` prop
        let wanted = node.props.contains_key(marker) && (marker != "init_slider" || node.props.contains_key("type"));
        if wanted {
            initializers.push(init(init_type, PropValue::Map(node.props.clone()).to_json()));
        }
    }

    if let Some(js_init) = node.props.get("_js_init").and_then(PropValue::as_map) {
        let engine = js_init
            .get("engine")
            .and_then(PropValue::as_str)
            .unwrap_or("generic");
        let mut data = PropValue::Map(js_init.clone()).to_json();
        if let Some(object) = data.as_object_mut() {
            object.insert("widget_key".into(), node.key.as_str().into());
        }
        initializers.push(init(engine, data));
    }

    initializers
}

/// Consistent HTML attribute escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// CSS text for a prop value; bare numbers become pixels when `px` is set.
fn css_value(value: &PropValue, px: bool) -> String {
    match value {
        PropValue::String(s) => s.clone(),
        PropValue::Number(n) if px => format!("{}px", n),
        PropValue::Number(n) => n.to_string(),
        PropValue::Bool(b) => b.to_string(),
        other => other.to_json().to_string(),
    }
}

#[derive(Default)]
struct StubBuilder {
    classes: Vec<String>,
    attrs: String,
    styles: Vec<String>,
}

impl StubBuilder {
    fn attr(&mut self, name: &str, value: &str) {
        self.attrs.push_str(&format!(r#" {}="{}""#, html_escape(name), html_escape(value)));
    }

    fn style(&mut self, name: &str, value: impl Into<String>) {
        self.styles.push(format!("{}: {}", name, value.into()));
    }

    fn style_from(&mut self, props: &Props, prop: &str, css: &str, px: bool) {
        if let Some(value) = props.get(prop).filter(|v| !v.is_null()) {
            self.style(css, css_value(value, px));
        }
    }

    fn class_attr(&self) -> String {
        html_escape(&self.classes.join(" "))
    }

    fn finish(mut self, tag: &str, handle: &Handle, inner: &str) -> String {
        if !self.styles.is_empty() {
            let styles = self.styles.join("; ");
            self.attr("style", &styles);
        }
        let (id, classes, attrs) = (html_escape(handle.as_str()), self.class_attr(), self.attrs);
        if VOID_TAGS.contains(tag) {
            format!(r#"<{tag} id="{id}" class="{classes}"{attrs}>"#)
        } else {
            format!(r#"<{tag} id="{id}" class="{classes}"{attrs}>{inner}</{tag}>"#)
        }
    }
}

/// Generic HTML stub for a widget type. Unknown types render as `div`.
pub fn generate_html_stub(handle: &Handle, node_type: &str, props: &Props) -> String {
    let tag = WIDGET_TAGS.get(node_type).copied().unwrap_or("div");
    let mut stub = StubBuilder::default();

    if let Some(css_class) = props.get("css_class").and_then(PropValue::as_str) {
        stub.classes.extend(css_class.split_whitespace().map(String::from));
    }
    if let Some(required) = props.get("required_css_classes").and_then(PropValue::as_list) {
        stub.classes.extend(required.iter().filter_map(PropValue::as_str).map(String::from));
    }

    match node_type {
        "Icon" => {
            if let Some(icon_name) = props.get("data").and_then(PropValue::as_str) {
                if props.get("render_type").and_then(PropValue::as_str) == Some("img") {
                    let src = props.get("custom_icon_src").and_then(PropValue::as_str).unwrap_or("");
                    stub.attr("src", src);
                    stub.attr("alt", icon_name);
                    return stub.finish("img", handle, "");
                }
                stub.classes.push(icon_name.to_string());
            }
        }
        "Text" => {
            let text = props.get("data").and_then(PropValue::as_str).unwrap_or("");
            return stub.finish(tag, handle, &html_escape(text));
        }
        "Image" => {
            if let Some(src) = props.get("src").and_then(PropValue::as_str) {
                stub.attr("src", src);
            }
            stub.attr("alt", "");
        }
        "ClipPath" => {
            stub.style_from(props, "width", "width", false);
            stub.style_from(props, "height", "height", false);
            stub.style_from(props, "clip_path_string", "clip-path", false);
            stub.style_from(props, "aspectRatio", "aspect-ratio", false);
        }
        "SizedBox" => {
            stub.style_from(props, "width", "width", true);
            stub.style_from(props, "height", "height", true);
        }
        "Divider" => {
            stub.style("width", "100%");
            stub.style_from(props, "height", "height", true);
            stub.style_from(props, "color", "background-color", false);
            stub.style_from(props, "margin", "margin", false);
        }
        "AspectRatio" => stub.style_from(props, "aspectRatio", "aspect-ratio", false),
        "Positioned" => {
            for side in ["top", "bottom", "left", "right", "width", "height"] {
                stub.style_from(props, side, side, false);
            }
        }
        _ => {}
    }

    if let Some(style) = props.get("style").and_then(PropValue::as_map) {
        for (name, value) in style {
            stub.style(&name.replace('_', "-"), css_value(value, false));
        }
    }
    stub.style_from(props, "position_type", "position", false);

    if let Some(attributes) = props.get("attributes").and_then(PropValue::as_map) {
        for (name, value) in attributes {
            stub.attr(name, &css_value(value, false));
        }
    }

    let enabled = props.get("enabled").and_then(PropValue::as_bool).unwrap_or(true);
    if let Some(callback) = props.get("onPressedName").and_then(PropValue::as_str).filter(|_| enabled) {
        let onclick = match props.get("onPressedArgs").and_then(PropValue::as_list) {
            Some(args) if !args.is_empty() => {
                let args = PropValue::List(args.to_vec()).to_json().to_string();
                format!("handleClickWithArgs('{}', '{}')", callback, args)
            }
            _ => format!("handleClick('{}')", callback),
        };
        stub.attr("onclick", &onclick);
    }

    if let Some(tooltip) = props.get("tooltip").and_then(PropValue::as_str) {
        stub.attr("title", tooltip);
    }

    let inner = props.get("inner_html").and_then(PropValue::as_str).unwrap_or("");
    stub.finish(tag, handle, &html_escape(inner))
}
