//! HTML page rendering from embedded templates.
//!
//! Every page is a content template dropped into `layout.html`. Placeholders
//! look like `{{KEY}}` and are substituted in a single pass, so text that was
//! inserted is never scanned again.

use rust_embed::Embed;

use crate::feedback::FeedbackForm;

#[derive(Embed)]
#[folder = "web/templates/"]
struct Templates;

/// Pages the site can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Services,
    Members,
    ContactUs,
    Education,
    Feedback,
    NotFound,
    ServerError,
}

/// Navigation bar entries, in display order.
const NAV: &[(Page, &str, &str)] = &[
    (Page::Home, "/", "Home"),
    (Page::About, "/about", "About"),
    (Page::Services, "/services", "Services"),
    (Page::Members, "/members", "Members"),
    (Page::Education, "/education", "Education"),
    (Page::ContactUs, "/contactus", "Contact Us"),
    (Page::Feedback, "/feedback", "Feedback"),
];

impl Page {
    fn template(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::About => "about.html",
            Page::Services => "services.html",
            Page::Members => "members.html",
            Page::ContactUs => "contactus.html",
            Page::Education => "education.html",
            Page::Feedback => "feedback.html",
            Page::NotFound => "404.html",
            Page::ServerError => "500.html",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About Us",
            Page::Services => "Services",
            Page::Members => "Our Team",
            Page::ContactUs => "Contact Us",
            Page::Education => "Education",
            Page::Feedback => "Feedback",
            Page::NotFound => "Page Not Found",
            Page::ServerError => "Something Went Wrong",
        }
    }
}

/// Kind of banner shown above the feedback form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

fn load(name: &str) -> String {
    match Templates::get(name) {
        Some(file) => String::from_utf8_lossy(&file.data).into_owned(),
        None => {
            tracing::error!("missing template {name}");
            String::new()
        }
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Substitute `{{KEY}}` placeholders. Unknown keys render as nothing.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
            out.push_str(value);
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn nav_html(current: Page) -> String {
    NAV.iter()
        .map(|(page, href, label)| {
            if *page == current {
                format!("<li><a href=\"{href}\" class=\"active\" aria-current=\"page\">{label}</a></li>")
            } else {
                format!("<li><a href=\"{href}\">{label}</a></li>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn wrap(page: Page, content: &str) -> String {
    let nav = nav_html(page);
    fill(
        &load("layout.html"),
        &[("TITLE", page.title()), ("NAV", nav.as_str()), ("CONTENT", content)],
    )
}

/// Render a page that takes no per-request data.
pub fn render(page: Page) -> String {
    if page == Page::Feedback {
        return feedback_page(None, &FeedbackForm::default());
    }
    wrap(page, &load(page.template()))
}

/// Render the feedback form, optionally with a banner and pre-filled fields.
pub fn feedback_page(flash: Option<(FlashKind, &str)>, values: &FeedbackForm) -> String {
    let flash_html = match flash {
        None => String::new(),
        Some((kind, text)) => {
            let class = match kind {
                FlashKind::Success => "flash flash-success",
                FlashKind::Error => "flash flash-error",
            };
            format!("<div class=\"{class}\" role=\"status\">{}</div>", escape_html(text))
        }
    };

    let first = escape_html(&values.first_name);
    let last = escape_html(&values.last_name);
    let email = escape_html(&values.email);
    let message = escape_html(&values.message);

    let content = fill(
        &load(Page::Feedback.template()),
        &[
            ("FLASH", flash_html.as_str()),
            ("FIRST_NAME", first.as_str()),
            ("LAST_NAME", last.as_str()),
            ("EMAIL", email.as_str()),
            ("MESSAGE", message.as_str()),
        ],
    );
    wrap(Page::Feedback, &content)
}
