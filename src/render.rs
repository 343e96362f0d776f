//! Page rendering.
//!
//! Handlers build a JSON context and hand it to a [`Renderer`] together
//! with a template name. [`HtmlRenderer`] is the built-in implementation:
//! three plain HTML templates shared by both record kinds.
//!
//! | Template    | Context keys                                                     |
//! |-------------|------------------------------------------------------------------|
//! | `list.html` | `kind`, `columns`, `records`, `next_page_token`                  |
//! | `view.html` | `kind`, `record`                                                 |
//! | `form.html` | `kind`, `action`, `fields`, `record`, `accepts_image`            |

use std::fmt;

use serde_json::Value;

use crate::error::AppError;

/// Turns a template name and context into an HTML document.
pub trait Renderer: Send + Sync + fmt::Debug {
    /// Renders `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Render`] for an unknown template or a context
    /// missing required keys.
    fn render(&self, template: &str, context: &Value) -> Result<String, AppError>;
}

/// Minimal HTML templates with escaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, AppError> {
        let kind = str_key(context, "kind")?;
        let (title, body) = match template {
            "list.html" => (format!("{} list", capitalize(kind)), list_body(kind, context)?),
            "view.html" => (capitalize(kind), view_body(kind, context)?),
            "form.html" => {
                let action = str_key(context, "action")?;
                (format!("{action} {kind}"), form_body(context)?)
            }
            other => return Err(AppError::Render(format!("unknown template `{other}`"))),
        };
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body>\n<nav><a href=\"/hotel\">Hotels</a> | <a href=\"/customer\">Customers</a></nav>\n\
             <h1>{title}</h1>\n{body}</body>\n</html>\n",
            title = escape(&title),
        ))
    }
}

fn list_body(kind: &str, context: &Value) -> Result<String, AppError> {
    let columns = array_key(context, "columns")?;
    let records = array_key(context, "records")?;

    let mut html = format!("<p><a href=\"/{kind}/add\">Add {kind}</a></p>\n");
    if records.is_empty() {
        html.push_str(&format!("<p>No {kind}s found.</p>\n"));
        return Ok(html);
    }

    html.push_str("<table>\n<tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape(&display(column))));
    }
    html.push_str("</tr>\n");
    for record in records {
        let id = display(record.get("id").unwrap_or(&Value::Null));
        html.push_str("<tr>");
        for (i, column) in columns.iter().enumerate() {
            let key = column.as_str().unwrap_or_default();
            let cell = escape(&display(record.get(key).unwrap_or(&Value::Null)));
            if i == 0 {
                html.push_str(&format!("<td><a href=\"/{kind}/{id}\">{cell}</a></td>"));
            } else {
                html.push_str(&format!("<td>{cell}</td>"));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    if let Some(token) = context.get("next_page_token").filter(|t| !t.is_null()) {
        html.push_str(&format!(
            "<p><a href=\"/{kind}?page_token={}\">More</a></p>\n",
            escape(&display(token))
        ));
    }
    Ok(html)
}

fn view_body(kind: &str, context: &Value) -> Result<String, AppError> {
    let record = object_key(context, "record")?;
    let id = display(record.get("id").unwrap_or(&Value::Null));

    let mut html = String::new();
    if let Some(url) = record.get("imageUrl").and_then(Value::as_str) {
        html.push_str(&format!("<img src=\"{}\" alt=\"\">\n", escape(url)));
    }
    html.push_str("<dl>\n");
    for (key, value) in record {
        if key == "imageUrl" {
            continue;
        }
        html.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>\n",
            escape(key),
            escape(&display(value))
        ));
    }
    html.push_str("</dl>\n");
    html.push_str(&format!(
        "<p><a href=\"/{kind}/{id}/edit\">Edit</a> | <a href=\"/{kind}/{id}/delete\">Delete</a></p>\n"
    ));
    Ok(html)
}

fn form_body(context: &Value) -> Result<String, AppError> {
    let fields = array_key(context, "fields")?;
    let record = context.get("record").and_then(Value::as_object);
    let accepts_image = context
        .get("accepts_image")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut html = String::from("<form method=\"POST\" enctype=\"multipart/form-data\">\n");
    for field in fields {
        let name = field.as_str().unwrap_or_default();
        let value = record
            .and_then(|r| r.get(name))
            .map(display)
            .unwrap_or_default();
        html.push_str(&format!(
            "<label>{name}<input type=\"text\" name=\"{name}\" value=\"{value}\"></label><br>\n",
            name = escape(name),
            value = escape(&value),
        ));
    }
    if accepts_image {
        html.push_str("<label>image<input type=\"file\" name=\"image\"></label><br>\n");
    }
    html.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    Ok(html)
}

fn str_key<'a>(context: &'a Value, key: &str) -> Result<&'a str, AppError> {
    context
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Render(format!("context is missing `{key}`")))
}

fn array_key<'a>(context: &'a Value, key: &str) -> Result<&'a Vec<Value>, AppError> {
    context
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Render(format!("context is missing `{key}`")))
}

fn object_key<'a>(
    context: &'a Value,
    key: &str,
) -> Result<&'a serde_json::Map<String, Value>, AppError> {
    context
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::Render(format!("context is missing `{key}`")))
}

/// Text shown for a JSON scalar; `null` shows as nothing.
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Escapes text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, context: &Value) -> String {
        let Ok(html) = HtmlRenderer.render(template, context) else {
            panic!("render failed");
        };
        html
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn list_links_records_and_next_page() {
        let html = render(
            "list.html",
            &json!({
                "kind": "hotel",
                "columns": ["name", "city"],
                "records": [{"id": 3, "name": "Inn <1>", "city": null}],
                "next_page_token": "10",
            }),
        );
        assert!(html.contains("<a href=\"/hotel/3\">Inn &lt;1&gt;</a>"));
        assert!(html.contains("/hotel?page_token=10"));
    }

    #[test]
    fn list_without_next_page_has_no_more_link() {
        let html = render(
            "list.html",
            &json!({"kind": "customer", "columns": ["lname"], "records": [], "next_page_token": null}),
        );
        assert!(html.contains("No customers found."));
        assert!(!html.contains("page_token"));
    }

    #[test]
    fn form_prefills_values_and_offers_image() {
        let html = render(
            "form.html",
            &json!({
                "kind": "hotel",
                "action": "Edit",
                "fields": ["name"],
                "record": {"id": 1, "name": "Inn"},
                "accepts_image": true,
            }),
        );
        assert!(html.contains("<title>Edit hotel</title>"));
        assert!(html.contains("name=\"name\" value=\"Inn\""));
        assert!(html.contains("type=\"file\" name=\"image\""));
    }

    #[test]
    fn view_shows_image_and_actions() {
        let html = render(
            "view.html",
            &json!({"kind": "hotel", "record": {"id": 2, "name": "Inn", "imageUrl": "/media/a.png"}}),
        );
        assert!(html.contains("<img src=\"/media/a.png\""));
        assert!(html.contains("/hotel/2/edit"));
        assert!(html.contains("/hotel/2/delete"));
    }

    #[test]
    fn unknown_template_is_error() {
        let result = HtmlRenderer.render("missing.html", &json!({"kind": "hotel"}));
        assert!(matches!(result, Err(AppError::Render(_))));
    }
}
