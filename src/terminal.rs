use std::cell::{Cell, RefCell};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::view::{DropTargetView, FileListView, ListItem, Placeholder, ProgressView, StatusView, Tone};

const BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos:>3}%";

/// Terminal rendition of the share page. One instance backs every view so that
/// printed lines and the progress bar do not tear each other.
pub struct Terminal {
    base: Url,
    bar: RefCell<Option<ProgressBar>>,
    status: RefCell<String>,
    over: Cell<bool>,
}

impl Terminal {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            bar: RefCell::new(None),
            status: RefCell::new(String::new()),
            over: Cell::new(false),
        }
    }

    pub fn prompt(&self) -> &'static str {
        if self.over.get() {
            "release to upload ⇣ "
        } else {
            "drop a file › "
        }
    }

    fn line(&self, text: &str) {
        match &*self.bar.borrow() {
            Some(bar) => bar.println(text),
            None => println!("{}", text),
        }
    }
}

/// Formats list rows with absolute download links
pub fn render_list(items: &[ListItem], base: &Url) -> String {
    if let [ListItem::Placeholder(placeholder)] = items {
        return match placeholder {
            Placeholder::NoFiles => placeholder.message().to_string(),
            Placeholder::Error => format!("✗ {}", placeholder.message()),
        };
    }

    let mut out = format!("{:<40} {}\n", "NAME", "LINK");
    out.push_str(&"─".repeat(80));
    out.push('\n');
    let mut files = 0;
    for item in items {
        match item {
            ListItem::File { name, href } => {
                let link = base
                    .join(href.trim_start_matches('/'))
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| href.clone());
                let shown = if name.chars().count() > 38 {
                    let skip = name.chars().count() - 37;
                    format!("…{}", name.chars().skip(skip).collect::<String>())
                } else {
                    name.clone()
                };
                out.push_str(&format!("{:<40} {}\n", shown, link));
                files += 1;
            }
            ListItem::Placeholder(placeholder) => {
                out.push_str(placeholder.message());
                out.push('\n');
            }
        }
    }
    out.push_str(&"─".repeat(80));
    out.push('\n');
    out.push_str(&format!("{} file(s)", files));
    out
}

impl FileListView for Terminal {
    fn replace(&self, items: Vec<ListItem>) {
        self.line(&render_list(&items, &self.base));
    }
}

impl StatusView for Terminal {
    fn set_status(&self, text: &str, tone: Tone) {
        match tone {
            // Shown as the bar's message, once a bar exists
            Tone::Normal => {
                *self.status.borrow_mut() = text.to_string();
                if let Some(bar) = &*self.bar.borrow() {
                    bar.set_message(text.to_string());
                }
            }
            Tone::Success => self.line(&format!("✓ {}", text)),
            Tone::Error => self.line(&format!("✗ {}", text)),
        }
    }

    fn clear(&self) {
        self.status.borrow_mut().clear();
        if let Some(bar) = &*self.bar.borrow() {
            bar.set_message("");
        }
    }
}

impl ProgressView for Terminal {
    fn show(&self) {
        let mut bar = self.bar.borrow_mut();
        if bar.is_none() {
            let new_bar = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                new_bar.set_style(style.progress_chars("=> "));
            }
            new_bar.set_message(self.status.borrow().clone());
            *bar = Some(new_bar);
        }
    }

    fn hide(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }

    fn set_percent(&self, percent: f64) {
        if let Some(bar) = &*self.bar.borrow() {
            bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
        }
    }
}

impl DropTargetView for Terminal {
    fn set_over(&self, over: bool) {
        tracing::debug!(over, "drop target state");
        self.over.set(over);
    }
}
