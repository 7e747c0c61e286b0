//! HTML presentation of an assembled answer.
//!
//! Renders a self-contained fragment the front end drops into the
//! assistant panel. All user-supplied text is escaped.

use crate::pipeline::AskResponse;

/// Render the full answer fragment.
pub fn render_response(response: &AskResponse) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("<div class=\"tide-assistant\">");

    if !response.brief_text.is_empty() {
        out.push_str("<p class=\"tide-brief\">");
        out.push_str(&escape_html(&response.brief_text));
        out.push_str("</p>");
    }

    if !response.discussions.is_empty() {
        out.push_str("<section class=\"tide-discussions\"><h3>Discussions</h3><ul>");
        for d in &response.discussions {
            out.push_str(&format!(
                "<li class=\"tide-card\" data-id=\"{}\"><span class=\"tide-title\">{}</span>\
                 <span class=\"tide-meta\">by {} · {} comment{} · {} link{}</span></li>",
                d.id,
                escape_html(&d.title),
                escape_html(&d.author),
                d.comment_count,
                plural(d.comment_count),
                d.link_count,
                plural(d.link_count),
            ));
        }
        out.push_str("</ul>");
        if response.has_more_discussions {
            out.push_str(
                "<button class=\"tide-more\" data-kind=\"discussions\">Show more discussions</button>",
            );
        }
        out.push_str("</section>");
    }

    if !response.links.is_empty() {
        out.push_str("<section class=\"tide-links\"><h3>Shared links</h3><ul>");
        for l in &response.links {
            out.push_str(&format!(
                "<li class=\"tide-card\" data-id=\"{}\"><a href=\"{}\" rel=\"noopener noreferrer\" \
                 target=\"_blank\">{}</a><span class=\"tide-meta\">{} vote{}</span></li>",
                l.id,
                escape_html(&l.url),
                escape_html(&l.title),
                l.votes,
                plural(l.votes),
            ));
        }
        out.push_str("</ul>");
        if response.has_more_links {
            out.push_str("<button class=\"tide-more\" data-kind=\"links\">Show more links</button>");
        }
        out.push_str("</section>");
    }

    out.push_str("</div>");
    out
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Minimal HTML escaping for text and attribute positions.
pub fn escape_html(text: &str) -> String {
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
