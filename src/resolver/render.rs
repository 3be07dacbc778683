use std::fmt::Write;

use super::listing::MergedListing;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a merged listing as one HTML page with a section per root.
pub fn render_listing(listing: &MergedListing) -> String {
    let title = escape_html(&listing.request_path);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Index of {title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>Index of {title}</h1>");

    for root in &listing.roots {
        let _ = writeln!(
            html,
            "<h2>{}</h2>",
            escape_html(&root.root.display().to_string())
        );
        html.push_str("<ul>\n");
        for entry in &root.entries {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&entry.link),
                escape_html(&entry.name)
            );
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
