//! Server-rendered pages for the browser interface.

use std::fmt::Write;

use crate::entity::item;
use crate::handlers::uploads::static_url;

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem auto; max-width: 48rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border-bottom: 1px solid #ddd; padding: .5rem; text-align: left; vertical-align: top; }}
img.thumb {{ max-width: 120px; max-height: 120px; }}
form.inline {{ display: inline; }}
label {{ display: block; margin-top: .75rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index_page(items: &[item::Model]) -> String {
    let mut body = String::from("<h1>Items</h1>\n<p><a href=\"/create\">Add item</a></p>\n");

    if items.is_empty() {
        body.push_str("<p>No items yet.</p>\n");
        return layout("Items", &body);
    }

    body.push_str(
        "<table>\n<tr><th>Name</th><th>Description</th><th>Image</th><th></th></tr>\n",
    );
    for item in items {
        let image = match item.image_path.as_deref() {
            Some(path) => format!(
                r#"<img class="thumb" src="{}" alt="{}">"#,
                escape(&static_url(path)),
                escape(&item.name)
            ),
            None => String::new(),
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            body,
            r#"<tr><td>{name}</td><td>{description}</td><td>{image}</td><td><a href="/update/{id}">Edit</a> <form class="inline" method="post" action="/delete/{id}"><button type="submit">Delete</button></form></td></tr>"#,
            name = escape(&item.name),
            description = escape(&item.description),
            id = item.id,
        );
    }
    body.push_str("</table>\n");

    layout("Items", &body)
}

fn item_form(action: &str, name: &str, description: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}" enctype="multipart/form-data">
<label>Name <input type="text" name="name" value="{name}" required></label>
<label>Description <textarea name="description" rows="4" required>{description}</textarea></label>
<label>Image <input type="file" name="image" accept=".png,.jpg,.jpeg,.gif"></label>
<p><button type="submit">{submit}</button> <a href="/">Cancel</a></p>
</form>
"#,
        action = escape(action),
        name = escape(name),
        description = escape(description),
        submit = escape(submit),
    )
}

pub fn create_page() -> String {
    let body = format!("<h1>Add item</h1>\n{}", item_form("/create", "", "", "Create"));
    layout("Add item", &body)
}

pub fn update_page(item: &item::Model) -> String {
    let mut body = format!("<h1>Edit {}</h1>\n", escape(&item.name));
    if let Some(path) = item.image_path.as_deref() {
        let _ = writeln!(
            body,
            r#"<p><img class="thumb" src="{}" alt="Current image"></p>"#,
            escape(&static_url(path))
        );
    }
    body.push_str(&item_form(
        &format!("/update/{}", item.id),
        &item.name,
        &item.description,
        "Save",
    ));
    layout("Edit item", &body)
}
