//! Page layout.
//!
//! Every page shares one frame: a head with the title and the screen and
//! print stylesheets, and a one-row table holding the navigation cell and
//! the content cell.

use crate::config::GeneratorConfig;
use crate::html::Element;
use crate::partition::Page;

const DOCTYPE: &str = "<!DOCTYPE html>\n";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Stylesheet links and other per-site settings of the page frame.
#[derive(Debug, Clone)]
pub struct Theme {
    pub stylesheet: String,
    pub print_stylesheet: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            stylesheet: "style.css".to_string(),
            print_stylesheet: "print.css".to_string(),
        }
    }
}

impl Theme {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            stylesheet: config.stylesheet.clone(),
            print_stylesheet: config.print_stylesheet.clone(),
        }
    }

    fn head(&self, title: &str) -> Element {
        let mut head = Element::new("head");
        head.push(Element::new("title").with_text(title));
        head.push(
            Element::new("meta")
                .with_attr("http-equiv", "Content-Type")
                .with_attr("content", "text/html, charset=utf-8"),
        );
        head.push(
            Element::new("link")
                .with_attr("rel", "stylesheet")
                .with_attr("href", self.stylesheet.as_str()),
        );
        head.push(
            Element::new("link")
                .with_attr("rel", "stylesheet")
                .with_attr("media", "print")
                .with_attr("href", self.print_stylesheet.as_str()),
        );
        head
    }

    /// Wraps a page's navigation and content in the document frame.
    pub fn layout(&self, page: &Page) -> Element {
        let mut row = Element::new("tr").with_id("outer");
        row.push(
            Element::new("td")
                .with_id("nav-td")
                .with_child(page.sidebar.to_element()),
        );
        row.push(
            Element::new("td")
                .with_id("content-td")
                .with_child(page.content.clone()),
        );

        Element::new("html")
            .with_attr("xmlns", XHTML_NS)
            .with_child(self.head(&page.title))
            .with_child(Element::new("body").with_child(Element::new("table").with_child(row)))
    }

    /// Serialized document, doctype included.
    pub fn render_page(&self, page: &Page) -> String {
        let mut out = String::from(DOCTYPE);
        self.layout(page).write_html(&mut out);
        out.push('\n');
        out
    }
}
