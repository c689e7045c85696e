//! Server-rendered HTML for the three dashboard pages

pub mod components;
pub mod pages;

pub use pages::{feed_page, top_users_page, trending_page};

/// Navigation targets shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Feed,
    TopUsers,
    Trending,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Feed, Page::TopUsers, Page::Trending];

    pub fn path(self) -> &'static str {
        match self {
            Page::Feed => "/",
            Page::TopUsers => "/top-users",
            Page::Trending => "/trending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Feed => "Feed",
            Page::TopUsers => "Top Users",
            Page::Trending => "Trending Posts",
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

const STYLES: &str = r#"
        * { box-sizing: border-box; }
        body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f9fafb; color: #1f2937; display: flex; flex-direction: column; min-height: 100vh; }
        header { background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,0.05); position: sticky; top: 0; z-index: 10; }
        .container { max-width: 960px; margin: 0 auto; padding: 12px 16px; }
        .bar { display: flex; justify-content: space-between; align-items: center; }
        .brand { font-size: 1.25rem; font-weight: 700; color: #1f2937; margin: 0; }
        nav a { display: inline-block; padding: 8px 12px; margin-left: 12px; border-radius: 6px; color: #374151; text-decoration: none; }
        nav a:hover { color: #4f46e5; background: #f3f4f6; }
        nav a.active { color: #4f46e5; background: #eef2ff; font-weight: 600; }
        main { flex-grow: 1; }
        .page-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 24px; }
        .page-head h1 { font-size: 1.5rem; margin: 0; color: #111827; }
        .page-head p { margin: 4px 0 0; color: #4b5563; }
        .refresh { border: 0; border-radius: 9999px; padding: 8px 14px; background: #e0e7ff; color: #4f46e5; cursor: pointer; }
        .refresh[disabled] { color: #a5b4fc; cursor: default; }
        .banner { background: #eef2ff; color: #4338ca; padding: 8px 16px; border-radius: 6px; margin-bottom: 16px; font-size: 0.875rem; }
        .stack > * + * { margin-top: 24px; }
        .card { background: #fff; border-radius: 8px; box-shadow: 0 2px 6px rgba(0,0,0,0.08); overflow: hidden; }
        .card.trending { border: 2px solid #facc15; }
        .badge { background: #facc15; color: #854d0e; padding: 4px 16px; font-size: 0.875rem; font-weight: 600; }
        .card-body { padding: 16px; }
        .author { display: flex; align-items: center; margin-bottom: 12px; }
        .avatar { width: 40px; height: 40px; border-radius: 9999px; object-fit: cover; background: #e5e7eb; }
        .author h3 { margin: 0 0 0 12px; font-size: 1rem; }
        .author small { margin-left: 12px; color: #6b7280; font-size: 0.75rem; display: block; }
        .content { color: #374151; margin: 0 0 12px; }
        details summary { color: #4f46e5; cursor: pointer; font-size: 0.875rem; font-weight: 500; margin-bottom: 12px; }
        .post-image { width: 100%; height: 192px; object-fit: cover; border-radius: 8px; background: #f3f4f6; margin-bottom: 12px; }
        .stats { display: flex; justify-content: space-between; color: #6b7280; font-size: 0.875rem; }
        .user-card { display: flex; align-items: center; padding: 16px; }
        .user-avatar { position: relative; }
        .user-avatar img { width: 64px; height: 64px; border-radius: 9999px; object-fit: cover; background: #e5e7eb; }
        .rank { position: absolute; top: -4px; left: -4px; width: 28px; height: 28px; border-radius: 9999px; background: #4f46e5; color: #fff; font-weight: 700; font-size: 0.875rem; display: flex; align-items: center; justify-content: center; border: 2px solid #fff; }
        .user-info { margin-left: 16px; flex-grow: 1; }
        .user-info h3 { margin: 0; font-size: 1.125rem; }
        .user-info span { color: #6b7280; font-size: 0.875rem; }
        .score { display: flex; flex-direction: column; align-items: center; background: #eef2ff; padding: 12px; border-radius: 8px; }
        .score strong { font-size: 1.5rem; color: #4f46e5; }
        .score span { font-size: 0.75rem; color: #6366f1; }
        .stripe { height: 8px; background: linear-gradient(to right, #6366f1, #a855f7); }
        .state { display: flex; flex-direction: column; align-items: center; padding: 48px 0; text-align: center; }
        .state h3 { font-size: 1.125rem; color: #111827; margin: 0 0 8px; }
        .state p { color: #6b7280; margin: 0; }
        .dots span { display: inline-block; width: 16px; height: 16px; margin: 0 4px 16px; border-radius: 9999px; background: #6366f1; }
        footer { background: #fff; border-top: 1px solid #e5e7eb; text-align: center; color: #6b7280; font-size: 0.875rem; }
"#;

/// Wrap a page body in the shared header, navigation and footer
pub fn layout(active: Page, body: &str) -> String {
    let nav: String = Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, page.path(), class, page.label())
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | SocialAnalytics</title>
    <style>{styles}</style>
</head>
<body>
    <header>
        <div class="container bar">
            <h1 class="brand">SocialAnalytics</h1>
            <nav>{nav}</nav>
        </div>
    </header>
    <main>
        <div class="container">
{body}
        </div>
    </main>
    <footer>
        <div class="container"><p>&copy; 2025 SocialAnalytics Dashboard</p></div>
    </footer>
</body>
</html>"#,
        title = active.label(),
        styles = STYLES,
        nav = nav,
        body = body,
    )
}
