//! Index page rendering

use std::fmt::Write;

use crate::stream::CameraRegistry;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Camera Viewer</title>
    <style>
        body { background: #1a1a1a; color: #fff; font-family: sans-serif; margin: 0; padding: 20px; }
        h1 { text-align: center; font-weight: 400; }
        .cameras { max-width: 900px; margin: 0 auto; display: grid; gap: 20px; }
        .camera-card { background: #252525; border-radius: 8px; overflow: hidden; }
        .camera-header { padding: 12px 16px; background: #333; display: flex; justify-content: space-between; }
        .camera-header .topic { color: #888; font-family: monospace; font-size: 11px; }
        .camera-feed { background: #000; }
        .camera-feed img { display: block; width: 100%; height: auto; }
        .camera-links { padding: 8px 16px; font-size: 12px; }
        .camera-links a { color: #8af; }
    </style>
</head>
<body>
    <h1>Camera Viewer</h1>
    <div class="cameras">
"#;

const PAGE_TAIL: &str = r#"    </div>
</body>
</html>
"#;

/// Escape text for use in HTML content and attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the page listing every camera with its live stream
pub fn render(registry: &CameraRegistry) -> String {
    let mut html = String::from(PAGE_HEAD);

    for camera in registry.iter() {
        let id = escape_html(camera.id());
        let label = escape_html(camera.label());
        let topic = escape_html(camera.source_topic());
        // Writing into a String cannot fail
        let _ = write!(
            html,
            r#"        <div class="camera-card">
            <div class="camera-header">
                <span>{label}</span>
                <span class="topic">{topic}</span>
            </div>
            <div class="camera-feed">
                <img src="/stream/{id}" alt="{label}">
            </div>
            <div class="camera-links"><a href="/snapshot/{id}">snapshot</a></div>
        </div>
"#
        );
    }

    html.push_str(PAGE_TAIL);
    html
}
