//! The docs UI page.
//!
//! A fixed page that loads the Scalar API reference viewer from the jsDelivr
//! CDN and points it at the primary spec through `data-url`.

/// CDN location of the Scalar API reference script.
pub const SCALAR_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/@scalar/api-reference";

/// Render the docs page for the spec served at `spec_url`.
pub fn render_docs_html(spec_url: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
    <title>Scalar API Reference</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <style>
        body {{ margin: 0; }}
    </style>
</head>
<body>
    <script
        id="api-reference"
        data-url="{url}"></script>
    <script src="{script}"></script>
</body>
</html>"#,
        url = escape_attribute(spec_url),
        script = SCALAR_SCRIPT_URL,
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
