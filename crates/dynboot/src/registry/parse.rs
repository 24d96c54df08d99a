//! Registry markup parsing.
//!
//! The node table is located between two anchor ids on the page, flattened
//! into a list of cell values and then regrouped into rows of
//! [`TableLayout::columns`] cells.

use super::TableLayout;
use crate::error::ParseError;
use crate::node::ToxNode;
use tracing::debug;

/// Anchor id that precedes the active node table.
pub const TABLE_START_MARKER: &str = "id=\"active_nodes_list\"";

/// Anchor id of the section following the node table.
pub const TABLE_END_MARKER: &str = "id=\"running_a_node\"";

/// Flatten the node table on `page` into trimmed cell values, in page order.
pub fn split_cells(page: &str) -> Result<Vec<String>, ParseError> {
    let (_, rest) = page
        .split_once(TABLE_START_MARKER)
        .ok_or(ParseError::MissingTable)?;
    let table = rest.split(TABLE_END_MARKER).next().unwrap_or(rest);

    let cells: Vec<String> = table.split("<td").skip(1).map(cell_value).collect();
    if cells.is_empty() {
        return Err(ParseError::EmptyTable);
    }
    Ok(cells)
}

/// Parse every node row on `page` using `layout`.
pub fn parse_nodes(page: &str, layout: TableLayout) -> Result<Vec<ToxNode>, ParseError> {
    let cells = split_cells(page)?;
    let columns = layout.columns();

    if cells.len() % columns != 0 {
        return Err(ParseError::FieldCount {
            fields: cells.len(),
            columns,
        });
    }

    let nodes = cells
        .chunks_exact(columns)
        .map(|row| parse_row(row, layout))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Parsed {} nodes from {} cells ({} layout)",
        nodes.len(),
        cells.len(),
        layout
    );
    Ok(nodes)
}

fn parse_row(row: &[String], layout: TableLayout) -> Result<ToxNode, ParseError> {
    let port_cell = &row[TableLayout::PORT];
    let port = port_cell.parse::<u16>().map_err(|source| ParseError::Port {
        value: port_cell.clone(),
        source,
    })?;

    let key_cell = &row[TableLayout::KEY];
    let public_key = hex::decode(key_cell).map_err(|source| ParseError::Key {
        value: key_cell.clone(),
        source,
    })?;

    let status = if layout.has_status() {
        row[TableLayout::STATUS].contains("UP")
    } else {
        true
    };

    Ok(ToxNode {
        ipv4: row[TableLayout::IPV4].clone(),
        ipv6: row[TableLayout::IPV6].clone(),
        port,
        public_key,
        maintainer: row[TableLayout::MAINTAINER].clone(),
        location: row[TableLayout::LOCATION].clone(),
        status,
    })
}

/// Text between the end of the opening `<td ...>` and `</td`, with inline
/// tags removed.
fn cell_value(fragment: &str) -> String {
    let inner = fragment.split_once('>').map_or("", |(_, v)| v);
    let inner = inner.split("</td").next().unwrap_or(inner);
    strip_tags(inner).trim().to_string()
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn fixture_page(rows: &[[&str; 7]], layout: TableLayout) -> String {
    let mut page = String::from("<html><body><h2 id=\"intro\">Nodes</h2>");
    page.push_str("<div id=\"active_nodes_list\"><table>\n");
    page.push_str("<tr><th>IPv4</th><th>IPv6</th><th>Port</th></tr>\n");
    for row in rows {
        page.push_str("<tr>\n");
        for cell in row.iter().take(layout.columns()) {
            page.push_str(&format!("  <td class=\"col\"> {cell} </td>\n"));
        }
        page.push_str("</tr>\n");
    }
    page.push_str("</table></div>\n<h2 id=\"running_a_node\">Running a node</h2>");
    page.push_str("<table><tr><td>not a node</td></tr></table></body></html>");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "951C88B7E75C867418ACDB5D273821372BB5BD652740BCDF623A4FA293E75D2F";
    const KEY_B: &str = "8E7D0B859922EF569298B4D261A8CCB5FEA14FB91ED412A7603A585A25698832";

    fn rows() -> Vec<[&'static str; 7]> {
        vec![
            ["144.76.60.215", "2a01:4f8:191:64d6::1", "33445", KEY_A, "sonOfRa", "DE", "UP"],
            ["23.226.230.47", "", "33445", KEY_B, "stal", "US", "DOWN"],
            ["195.154.119.113", "-", "443", "", "Anonymous", "FR", "<b>UP</b>"],
        ]
    }

    #[test]
    fn test_parse_status_layout() {
        let page = fixture_page(&rows(), TableLayout::Status);
        let nodes = parse_nodes(&page, TableLayout::Status).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].ipv4, "144.76.60.215");
        assert_eq!(nodes[0].ipv6, "2a01:4f8:191:64d6::1");
        assert_eq!(nodes[0].port, 33445);
        assert_eq!(nodes[0].public_key.len(), 32);
        assert_eq!(nodes[0].public_key_hex(), KEY_A);
        assert_eq!(nodes[0].maintainer, "sonOfRa");
        assert_eq!(nodes[0].location, "DE");
        assert!(nodes[0].status);

        assert!(!nodes[1].status);
        assert_eq!(nodes[1].ipv6, "");

        assert_eq!(nodes[2].port, 443);
        assert!(nodes[2].public_key.is_empty());
        assert!(nodes[2].status);
    }

    #[test]
    fn test_parse_legacy_layout_marks_all_up() {
        let page = fixture_page(&rows(), TableLayout::Legacy);
        let nodes = parse_nodes(&page, TableLayout::Legacy).unwrap();

        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| n.status));
        assert_eq!(nodes[1].maintainer, "stal");
    }

    #[test]
    fn test_layout_mismatch_is_field_count_error() {
        let page = fixture_page(&rows(), TableLayout::Legacy);
        let err = parse_nodes(&page, TableLayout::Status).unwrap_err();

        match err {
            ParseError::FieldCount { fields, columns } => {
                assert_eq!(fields, 18);
                assert_eq!(columns, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_table() {
        let err = parse_nodes("<html>maintenance</html>", TableLayout::Status).unwrap_err();
        assert!(matches!(err, ParseError::MissingTable));
    }

    #[test]
    fn test_empty_table() {
        let page = format!("<div {TABLE_START_MARKER}><table></table></div>");
        let err = parse_nodes(&page, TableLayout::Status).unwrap_err();
        assert!(matches!(err, ParseError::EmptyTable));
    }

    #[test]
    fn test_bad_port() {
        let mut bad = rows();
        bad[1][2] = "70000";
        let page = fixture_page(&bad, TableLayout::Status);
        let err = parse_nodes(&page, TableLayout::Status).unwrap_err();
        assert!(matches!(err, ParseError::Port { ref value, .. } if value == "70000"));
    }

    #[test]
    fn test_bad_key() {
        let mut bad = rows();
        bad[0][3] = "951C88B7:E75C";
        let page = fixture_page(&bad, TableLayout::Status);
        let err = parse_nodes(&page, TableLayout::Status).unwrap_err();
        assert!(matches!(err, ParseError::Key { .. }));

        let mut odd = rows();
        odd[0][3] = "ABC";
        let page = fixture_page(&odd, TableLayout::Status);
        assert!(matches!(
            parse_nodes(&page, TableLayout::Status),
            Err(ParseError::Key { .. })
        ));
    }

    #[test]
    fn test_cells_after_end_marker_ignored() {
        let page = fixture_page(&rows()[..1], TableLayout::Status);
        let cells = split_cells(&page).unwrap();
        assert_eq!(cells.len(), 7);
        assert!(!cells.iter().any(|c| c == "not a node"));
    }
}
