//! HTML export.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::TreeDictError;
use crate::options::FlattenOptions;
use crate::table::{sort_by_name, Table};
use crate::tree::TreeMap;
use crate::Result;

use super::{target_path, write_file};

/// Separates the header and footer halves of a page template.
pub const SPLIT_MARKER: &str = "#SPLIT#";

const TABLES_TEMPLATE: &str = include_str!("../../templates/tables.html");
const ACCORDION_TEMPLATE: &str = include_str!("../../templates/accordion.html");

/// A page template split into the text before and after the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTemplate {
    pub header: String,
    pub footer: String,
}

impl HtmlTemplate {
    /// Split `content` at the first [`SPLIT_MARKER`].
    pub fn parse(content: &str) -> Result<Self> {
        let (header, footer) = content
            .split_once(SPLIT_MARKER)
            .ok_or(TreeDictError::MissingSplitMarker)?;
        Ok(Self {
            header: header.to_string(),
            footer: footer.to_string(),
        })
    }

    /// Read and parse a template file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Built-in page for [`write_tables_html`].
    pub fn tables() -> Self {
        Self::builtin(TABLES_TEMPLATE)
    }

    /// Built-in page with the accordion script for [`write_tree_html`].
    pub fn accordion() -> Self {
        Self::builtin(ACCORDION_TEMPLATE)
    }

    fn builtin(content: &str) -> Self {
        let (header, footer) = content.split_once(SPLIT_MARKER).unwrap_or((content, ""));
        Self {
            header: header.to_string(),
            footer: footer.to_string(),
        }
    }
}

/// Escape text for use in HTML element content and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Write `tables`, ordered by name, between the template halves.
pub fn write_tables_html<W: Write>(
    tables: &[Table],
    template: &HtmlTemplate,
    writer: &mut W,
) -> Result<()> {
    let mut tables = tables.to_vec();
    sort_by_name(&mut tables);

    writer.write_all(template.header.as_bytes())?;
    for table in &tables {
        writer.write_all(b"<table>\n")?;
        writeln!(writer, "<tr><td>{}</td></tr>", table.to_html())?;
        writer.write_all(b"</table>\n")?;
    }
    writer.write_all(template.footer.as_bytes())?;
    Ok(())
}

/// Render the tree as nested accordion panels.
///
/// Inner labels become a button followed by a panel holding their children;
/// each entry ends in a `panel-elem` showing the last label and the value.
pub fn render_tree_html(tree: &TreeMap) -> String {
    let mut html = String::new();
    let mut previous: Option<&crate::key::Key> = None;
    let mut open_panels = 0usize;

    for (key, value) in tree.iter() {
        let shared = previous.map_or(0, |prev| key.common_prefix_len(prev));
        while open_panels > shared {
            html.push_str("\n</div>");
            open_panels -= 1;
        }

        let labels = key.labels();
        let (last, inner) = match labels.split_last() {
            Some(split) => split,
            None => continue,
        };
        for label in &inner[open_panels..] {
            html.push_str(&format!(
                "\n<button class='accordion'>{}</button>",
                escape_html(label)
            ));
            html.push_str("\n<div class='panel'>");
        }
        open_panels = inner.len();

        html.push_str(&format!(
            "\n<div class='panel-elem'>{} : {}</div>",
            escape_html(last),
            escape_html(&value.to_string())
        ));
        previous = Some(key);
    }

    for _ in 0..open_panels {
        html.push_str("\n</div>");
    }
    html.push('\n');
    html
}

/// Write the accordion rendering of `tree` between the template halves.
pub fn write_tree_html<W: Write>(
    tree: &TreeMap,
    template: &HtmlTemplate,
    writer: &mut W,
) -> Result<()> {
    writer.write_all(template.header.as_bytes())?;
    writer.write_all(render_tree_html(tree).as_bytes())?;
    writer.write_all(template.footer.as_bytes())?;
    Ok(())
}

/// Flatten `tree` and write the tables page to `dir/filename`.
pub fn tables_to_html_file(
    tree: &TreeMap,
    dir: Option<&Path>,
    filename: &str,
    template: &HtmlTemplate,
    options: &FlattenOptions,
) -> Result<PathBuf> {
    let tables = tree.to_tables_with(options)?;
    let path = target_path(dir, filename)?;
    write_file(&path, |w| write_tables_html(&tables, template, w))?;
    Ok(path)
}

/// Write the accordion page for `tree` to `dir/filename`.
pub fn tree_to_html_file(
    tree: &TreeMap,
    dir: Option<&Path>,
    filename: &str,
    template: &HtmlTemplate,
) -> Result<PathBuf> {
    let path = target_path(dir, filename)?;
    write_file(&path, |w| write_tree_html(tree, template, w))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_tree() -> TreeMap {
        TreeMap::from_json_str(r#"{"x": {"a": 1, "b": 2}, "y": 9}"#).unwrap()
    }

    #[test]
    fn test_parse_template() {
        let template = HtmlTemplate::parse("<head>#SPLIT#</body>").unwrap();
        assert_eq!(template.header, "<head>");
        assert_eq!(template.footer, "</body>");
    }

    #[test]
    fn test_parse_template_without_marker() {
        assert!(matches!(
            HtmlTemplate::parse("<html></html>"),
            Err(TreeDictError::MissingSplitMarker)
        ));
    }

    #[test]
    fn test_builtin_templates_split() {
        for template in [HtmlTemplate::tables(), HtmlTemplate::accordion()] {
            assert!(template.header.contains("<body>"));
            assert!(template.footer.contains("</html>"));
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("a<b & 'c' \"d\">"),
            "a&lt;b &amp; &#39;c&#39; &quot;d&quot;&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_write_tables_html_sorted_by_name() {
        let mut b = Table::new("b");
        b.append("r", "c", 1);
        let mut a = Table::new("a");
        a.append("r", "c", 2);

        let template = HtmlTemplate::parse("HEAD#SPLIT#FOOT").unwrap();
        let mut out = Vec::new();
        write_tables_html(&[b, a], &template, &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.starts_with("HEAD<table>\n<tr><td><table class=\"treedict\">"));
        assert!(html.ends_with("</table></td></tr>\n</table>\nFOOT"));
        let pos_a = html.find("<caption>a</caption>").unwrap();
        let pos_b = html.find("<caption>b</caption>").unwrap();
        assert!(pos_a < pos_b);
    }

    #[test]
    fn test_render_tree_html() {
        let html = render_tree_html(&sample_tree());
        let expected = "
<button class='accordion'>x</button>
<div class='panel'>
<div class='panel-elem'>a : 1</div>
<div class='panel-elem'>b : 2</div>
</div>
<div class='panel-elem'>y : 9</div>
";
        assert_eq!(html, expected);
    }

    #[test]
    fn test_render_tree_html_closes_deep_panels() {
        let tree = TreeMap::from_json_str(r#"{"a": {"b": {"c": 1}}, "d": {"e": 2}}"#).unwrap();
        let html = render_tree_html(&tree);
        assert_eq!(html.matches("<div class='panel'>").count(), 3);
        assert_eq!(html.matches("\n</div>").count(), 3);
        assert!(html.ends_with("<div class='panel-elem'>e : 2</div>\n</div>\n"));
    }

    #[test]
    fn test_tables_to_html_file() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("reports");
        let path = tables_to_html_file(
            &sample_tree(),
            Some(&out_dir),
            "tables.html",
            &HtmlTemplate::tables(),
            &FlattenOptions::default(),
        )
        .unwrap();

        assert_eq!(path, out_dir.join("tables.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<caption>Properties</caption>"));
        assert!(html.contains("<caption>Table: </caption>"));
        assert!(html.contains("</html>"));
        assert!(!html.contains(SPLIT_MARKER));
    }

    #[test]
    fn test_tables_to_html_file_empty_tree() {
        let dir = tempdir().unwrap();
        let result = tables_to_html_file(
            &TreeMap::new(),
            Some(dir.path()),
            "t.html",
            &HtmlTemplate::tables(),
            &FlattenOptions::default(),
        );
        assert!(matches!(result, Err(TreeDictError::EmptyTree)));
        assert!(!dir.path().join("t.html").exists());
    }

    #[test]
    fn test_tree_to_html_file() {
        let dir = tempdir().unwrap();
        let path = tree_to_html_file(
            &sample_tree(),
            Some(dir.path()),
            "tree.html",
            &HtmlTemplate::accordion(),
        )
        .unwrap();
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("<button class='accordion'>x</button>"));
        assert!(html.contains("addEventListener"));
    }
}
