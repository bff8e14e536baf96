//! Template text building blocks
//!
//! Every emitted line is built from these helpers so quoting and directive syntax live in one
//! place.

/// UTF-8 byte-order marker prefixed to split documents (`EF BB BF`).
pub const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Closes an `<#if>` block.
pub const IF_CLOSE: &str = "</#if>\n";

/// Closes a `<#list>` block.
pub const LIST_CLOSE: &str = "</#list>\n";

/// A quoted header cell. Embedded quotes are doubled.
pub fn header_cell(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "\"\""))
}

/// A quoted cell rendering `expr`, or the empty string when it has no value.
pub fn value_cell(expr: &str) -> String {
    format!("\"${{({})!\"\"}}\"", expr)
}

/// A quoted cell rendering `expr` verbatim.
pub fn interpolation_cell(expr: &str) -> String {
    format!("\"${{{}}}\"", expr)
}

/// Comma-join cells into one newline-terminated line.
pub fn row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (index, cell) in cells.into_iter().enumerate() {
        if index > 0 {
            line.push(',');
        }
        line.push_str(cell.as_ref());
    }
    line.push('\n');
    line
}

pub fn if_open(expression: &str) -> String {
    format!("<#if {}>\n", expression)
}

/// Opens an iteration over `collection`, binding each element to `row`.
pub fn list_open(collection: &str) -> String {
    format!("<#list {} as row>\n", collection)
}
