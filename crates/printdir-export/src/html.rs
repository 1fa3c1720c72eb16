//! HTML export.

use std::borrow::Cow;
use std::io::Write;

use printdir_core::{EntryRecord, MetadataField};

use crate::error::ExportError;

const STYLE: &str = "body {font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 20px;} \
table {border-collapse: collapse; width: 100%; margin-top: 20px;} \
th, td {border: 1px solid #ddd; padding: 8px; text-align: left;} \
th {background-color: #f2f2f2;} \
tr:nth-child(even) {background-color: #f9f9f9;} \
tr:hover {background-color: #e2e2e2;}";

/// Settings for the HTML exporter.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Page title and heading.
    pub title: String,
    /// Escape markup characters in cell text. Turning this off reproduces
    /// legacy output, where names containing `<` or `&` corrupt the page.
    pub escape: bool,
}

impl HtmlOptions {
    /// Options that write cell values verbatim.
    pub fn raw() -> Self {
        Self {
            escape: false,
            ..Self::default()
        }
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "Directory Listing".to_string(),
            escape: true,
        }
    }
}

/// Write a single-table HTML document, one row per record.
pub fn write_html<W: Write>(
    mut writer: W,
    fields: &[MetadataField],
    records: &[EntryRecord],
    options: &HtmlOptions,
) -> Result<(), ExportError> {
    let title = escape(&options.title);
    write!(
        writer,
        "<html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head>"
    )?;
    write!(writer, "<body><h1>{title}</h1><table><tr>")?;
    for field in fields {
        write!(writer, "<th>{}</th>", field.name())?;
    }
    writer.write_all(b"</tr>")?;

    for record in records {
        writer.write_all(b"<tr>")?;
        for field in fields {
            let cell = record.cell(*field);
            let cell = if options.escape {
                escape(&cell)
            } else {
                Cow::Borrowed(cell.as_str())
            };
            write!(writer, "<td>{cell}</td>")?;
        }
        writer.write_all(b"</tr>")?;
    }

    writer.write_all(b"</table></body></html>")?;
    writer.flush()?;
    Ok(())
}

/// Replace the characters that are significant in HTML text and attributes.
fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: &[EntryRecord], options: &HtmlOptions) -> String {
        let mut out = Vec::new();
        write_html(
            &mut out,
            &[MetadataField::FileName, MetadataField::Size],
            records,
            options,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#x27;");
    }

    #[test]
    fn test_document_structure() {
        let record = EntryRecord::new()
            .with(MetadataField::FileName, "a.txt")
            .with(MetadataField::Size, 7u64);
        let out = render(&[record], &HtmlOptions::default());

        assert!(out.starts_with("<html><head>"));
        assert!(out.contains("<title>Directory Listing</title>"));
        assert!(out.contains("<h1>Directory Listing</h1>"));
        assert!(out.contains("<tr><th>File Name</th><th>Size</th></tr>"));
        assert!(out.contains("<tr><td>a.txt</td><td>7</td></tr>"));
        assert!(out.ends_with("</table></body></html>"));
        assert_eq!(out.matches("<table>").count(), 1);
    }

    #[test]
    fn test_missing_field_renders_empty_cell() {
        let record = EntryRecord::new().with(MetadataField::FileName, "dir");
        let out = render(&[record], &HtmlOptions::default());
        assert!(out.contains("<tr><td>dir</td><td></td></tr>"));
    }

    #[test]
    fn test_cells_escaped_by_default() {
        let record = EntryRecord::new().with(MetadataField::FileName, "<b>&.txt");
        let out = render(&[record], &HtmlOptions::default());
        assert!(out.contains("<td>&lt;b&gt;&amp;.txt</td>"));
    }

    #[test]
    fn test_raw_mode_writes_verbatim() {
        let record = EntryRecord::new().with(MetadataField::FileName, "<b>&.txt");
        let out = render(&[record], &HtmlOptions::raw());
        assert!(out.contains("<td><b>&.txt</td>"));
    }
}
