use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Label -> value pairs pulled from the profile table.
pub type FieldMap = HashMap<String, String>;

#[derive(Debug, Error)]
#[error("page has no name heading")]
pub struct MissingName;

#[derive(Debug, Clone)]
pub struct ExtractedProfile {
    pub name: String,
    pub fields: FieldMap,
}

/// Scans the page for label/data table rows and the name heading. No
/// heading means `MissingName`; no rows just yields an empty map.
pub fn extract_profile(body: &str) -> Result<ExtractedProfile, MissingName> {
    let document = Html::parse_document(body);

    let fields = extract_fields(&document);
    let name = extract_name(&document).ok_or(MissingName)?;

    Ok(ExtractedProfile { name, fields })
}

fn extract_fields(document: &Html) -> FieldMap {
    let row_selector = Selector::parse("tr").unwrap();
    let label_selector = Selector::parse("td.element-label").unwrap();
    let data_selector = Selector::parse("td.element-data").unwrap();

    let mut fields = FieldMap::new();

    for row in document.select(&row_selector) {
        let label = row.select(&label_selector).next();
        let data = row.select(&data_selector).next();

        if let (Some(label), Some(data)) = (label, data) {
            fields.insert(flat_text(label), spaced_text(data));
        }
    }

    fields
}

/// First h2 wins, h1 is the fallback.
fn extract_name(document: &Html) -> Option<String> {
    for tag in ["h2", "h1"] {
        let selector = Selector::parse(tag).unwrap();
        if let Some(heading) = document.select(&selector).next() {
            return Some(flat_text(heading));
        }
    }

    None
}

/// Concatenated text content, outer whitespace trimmed. Internal spacing is
/// preserved because the name heuristics key off a double space.
fn flat_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text segments trimmed and joined by single spaces, so values split across
/// inline elements (e.g. addresses with <br>) come out readable.
fn spaced_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
        <html><body>
          <h2> Jane R Doe  MD </h2>
          <table>
            <tr><td class="element-label">Practice Name</td>
                <td class="element-data">Springfield Clinic</td></tr>
            <tr><td class="element-label">Practice Address</td>
                <td class="element-data">123 Main St<br>Springfield, IL 62704</td></tr>
            <tr><td class="element-label">Phone</td><td>no data cell class</td></tr>
            <tr><td class="element-data">orphan data cell</td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn pairs_label_and_data_cells_per_row() {
        let profile = extract_profile(PROFILE).unwrap();

        assert_eq!(profile.fields.len(), 2);
        assert_eq!(profile.fields["Practice Name"], "Springfield Clinic");
        assert_eq!(
            profile.fields["Practice Address"],
            "123 Main St Springfield, IL 62704"
        );
    }

    #[test]
    fn name_heading_is_trimmed_but_keeps_inner_spacing() {
        let profile = extract_profile(PROFILE).unwrap();
        assert_eq!(profile.name, "Jane R Doe  MD");
    }

    #[test]
    fn h2_takes_priority_over_h1() {
        let body = "<h1>Wrong One</h1><h2>Right One</h2>";
        let profile = extract_profile(body).unwrap();
        assert_eq!(profile.name, "Right One");
    }

    #[test]
    fn h1_is_used_when_no_h2_exists() {
        let profile = extract_profile("<h1>Only Heading</h1>").unwrap();
        assert_eq!(profile.name, "Only Heading");
    }

    #[test]
    fn missing_heading_is_an_error() {
        let result = extract_profile("<table><tr><td>x</td></tr></table>");
        assert!(result.is_err());
    }

    #[test]
    fn page_without_rows_yields_empty_map() {
        let profile = extract_profile("<h2>Name Only</h2>").unwrap();
        assert!(profile.fields.is_empty());
    }
}
