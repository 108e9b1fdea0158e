//! Placeholder substitution over WordprocessingML blocks
//!
//! A block is a body-level paragraph or a table cell. Substitution runs on a
//! block's merged text, so a `{{key}}` token split across formatting runs is
//! still found; a changed block is rewritten as a single run carrying the
//! first run's formatting.

use crate::xml::{Element, Node};
use csa_domain::{placeholder_token, FieldMapping};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::BTreeSet;

const BODY: &str = "w:body";
const PARAGRAPH: &str = "w:p";
const RUN: &str = "w:r";
const RUN_PROPS: &str = "w:rPr";
const TEXT: &str = "w:t";
const TAB: &str = "w:tab";
const BREAK: &str = "w:br";
const CARRIAGE_RETURN: &str = "w:cr";
const TABLE: &str = "w:tbl";
const ROW: &str = "w:tr";
const CELL: &str = "w:tc";

/// Ordered (token, replacement) pairs
#[derive(Debug, Clone)]
pub(crate) struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    /// Longest token first; equal lengths fall back to key order
    pub(crate) fn new(mapping: &FieldMapping, null_text: &str) -> Self {
        let mut pairs: Vec<(String, String)> = mapping
            .iter()
            .map(|(name, value)| (placeholder_token(name), value.render(null_text).to_string()))
            .collect();
        pairs.sort_by(|(a, _), (b, _)| {
            Reverse(a.len())
                .cmp(&Reverse(b.len()))
                .then_with(|| a.cmp(b))
        });
        Self { pairs }
    }

    /// The substituted text, or `None` if nothing changed
    pub(crate) fn apply(&self, text: &str) -> Option<String> {
        let mut current = Cow::Borrowed(text);
        for (token, value) in &self.pairs {
            if current.contains(token.as_str()) {
                current = Cow::Owned(current.replace(token.as_str(), value));
            }
        }
        match current {
            Cow::Owned(changed) if changed != text => Some(changed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Paragraph,
    Cell,
}

/// Rewrite every block whose merged text contains a token; returns the
/// number of blocks changed
pub(crate) fn fill_blocks(roots: &mut [Node], substitutions: &Substitutions) -> usize {
    let mut changed = 0;
    for_each_block(roots, &mut |kind: BlockKind, block: &mut Element| {
        let text = block_text(kind, block);
        if let Some(filled) = substitutions.apply(&text) {
            set_block_text(kind, block, &filled);
            changed += 1;
        }
    });
    changed
}

/// Distinct placeholder keys across all blocks
pub(crate) fn scan_placeholders(roots: &mut [Node]) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for_each_block(roots, &mut |kind: BlockKind, block: &mut Element| {
        keys.extend(placeholder_keys(&block_text(kind, block)));
    });
    keys
}

/// Keys of every well-formed `{{key}}` token in a piece of text
pub(crate) fn placeholder_keys(text: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        let key = &after_open[..close];
        if key.contains("{{") {
            // an unterminated "{{" precedes a real token; restart from the inner one
            rest = &rest[open + 2..];
            continue;
        }
        if !key.is_empty() && !key.contains('\n') {
            keys.push(key.to_string());
        }
        rest = &after_open[close + 2..];
    }
    keys
}

fn for_each_block(roots: &mut [Node], visit: &mut dyn FnMut(BlockKind, &mut Element)) {
    let Some(body) = roots
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find_map(|document| document.first_child_mut(BODY))
    else {
        return;
    };

    for child in body.children.iter_mut().filter_map(Node::as_element_mut) {
        if child.is(PARAGRAPH) {
            visit(BlockKind::Paragraph, child);
        } else if child.is(TABLE) {
            visit_table(child, visit);
        }
    }
}

fn visit_table(table: &mut Element, visit: &mut dyn FnMut(BlockKind, &mut Element)) {
    for row in table.child_elements_mut(ROW) {
        for cell in row.child_elements_mut(CELL) {
            visit(BlockKind::Cell, cell);
            for nested in cell.child_elements_mut(TABLE) {
                visit_table(nested, visit);
            }
        }
    }
}

fn block_text(kind: BlockKind, block: &Element) -> String {
    match kind {
        BlockKind::Paragraph => paragraph_text(block),
        BlockKind::Cell => cell_text(block),
    }
}

fn set_block_text(kind: BlockKind, block: &mut Element, text: &str) {
    match kind {
        BlockKind::Paragraph => set_paragraph_text(block, text),
        BlockKind::Cell => set_cell_text(block, text),
    }
}

fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.children.iter().filter_map(Node::as_element) {
        if child.is(TEXT) {
            text.push_str(&child.text());
        } else if child.is(TAB) {
            text.push('\t');
        } else if child.is(BREAK) || child.is(CARRIAGE_RETURN) {
            text.push('\n');
        }
    }
    text
}

pub(crate) fn paragraph_text(paragraph: &Element) -> String {
    paragraph.child_elements(RUN).map(run_text).collect()
}

pub(crate) fn cell_text(cell: &Element) -> String {
    cell.child_elements(PARAGRAPH)
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the paragraph's runs with one run holding `text`
fn set_paragraph_text(paragraph: &mut Element, text: &str) {
    let run_props = paragraph
        .first_child(RUN)
        .and_then(|run| run.first_child(RUN_PROPS))
        .cloned();
    let first_run = paragraph.position_of(RUN);

    paragraph.remove_children(RUN);
    let at = first_run.unwrap_or(paragraph.children.len());
    paragraph
        .children
        .insert(at, Node::Element(build_run(text, run_props)));
}

/// Collapse the cell to its first paragraph holding `text`
fn set_cell_text(cell: &mut Element, text: &str) {
    let Some(first) = cell.position_of(PARAGRAPH) else {
        return;
    };

    let mut index = 0;
    cell.children.retain(|node| {
        let keep = index <= first || !node.as_element().is_some_and(|e| e.is(PARAGRAPH));
        index += 1;
        keep
    });

    if let Some(paragraph) = cell.children[first].as_element_mut() {
        set_paragraph_text(paragraph, text);
    }
}

fn build_run(text: &str, run_props: Option<Element>) -> Element {
    let mut run = Element::new(RUN);
    if let Some(props) = run_props {
        run.children.push(Node::Element(props));
    }

    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                push_text(&mut run, &mut segment);
                let name = if ch == '\t' { TAB } else { BREAK };
                run.children.push(Node::Element(Element::empty(name)));
            }
            _ => segment.push(ch),
        }
    }
    push_text(&mut run, &mut segment);
    run
}

fn push_text(run: &mut Element, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let text = Element::new(TEXT)
        .with_attribute("xml:space", "preserve")
        .with_child(Node::Text(std::mem::take(segment)));
    run.children.push(Node::Element(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;
    use csa_domain::FieldValue;

    fn document(body: &str) -> Vec<Node> {
        xml::parse(&format!(
            r#"<w:document xmlns:w="urn:w"><w:body>{}</w:body></w:document>"#,
            body
        ))
        .unwrap()
    }

    fn body_xml(roots: &[Node]) -> String {
        let xml = xml::write(roots).unwrap();
        let start = xml.find("<w:body>").unwrap() + "<w:body>".len();
        let end = xml.find("</w:body>").unwrap();
        xml[start..end].to_string()
    }

    fn mapping(pairs: &[(&str, Option<&str>)]) -> FieldMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(v.map(str::to_string))))
            .collect()
    }

    #[test]
    fn test_substitution_order_longest_first() {
        let subs = Substitutions::new(
            &mapping(&[("Name", Some("N")), ("Supplier Name", Some("Acme"))]),
            "",
        );
        assert_eq!(subs.pairs[0].0, "{{Supplier Name}}");
        assert_eq!(subs.apply("{{Supplier Name}} / {{Name}}").unwrap(), "Acme / N");
    }

    #[test]
    fn test_ties_broken_by_key_order() {
        let subs = Substitutions::new(&mapping(&[("b", Some("2")), ("a", Some("1"))]), "");
        assert_eq!(subs.pairs[0].0, "{{a}}");
        assert_eq!(subs.pairs[1].0, "{{b}}");
    }

    #[test]
    fn test_apply_reports_unchanged() {
        let subs = Substitutions::new(&mapping(&[("a", Some("1"))]), "");
        assert_eq!(subs.apply("no tokens here"), None);
        assert_eq!(subs.apply("{{b}}"), None);
    }

    #[test]
    fn test_null_renders_configured_text() {
        let subs = Substitutions::new(&mapping(&[("Penalties", None)]), "N/A");
        assert_eq!(subs.apply("Penalties: {{Penalties}}").unwrap(), "Penalties: N/A");
    }

    #[test]
    fn test_paragraph_split_across_runs() {
        let mut roots = document(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Supplier: {{Supp</w:t></w:r><w:r><w:t>lier Name}}</w:t></w:r></w:p>"#,
        );
        let subs = Substitutions::new(&mapping(&[("Supplier Name", Some("Acme Corp"))]), "");

        assert_eq!(fill_blocks(&mut roots, &subs), 1);
        assert_eq!(
            body_xml(&roots),
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Supplier: Acme Corp</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_paragraph_properties_kept_in_place() {
        let mut roots = document(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>{{a}}</w:t></w:r><w:proofErr/></w:p>"#,
        );
        let subs = Substitutions::new(&mapping(&[("a", Some("x\ty"))]), "");
        fill_blocks(&mut roots, &subs);

        assert_eq!(
            body_xml(&roots),
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">x</w:t><w:tab/><w:t xml:space="preserve">y</w:t></w:r><w:proofErr/></w:p>"#
        );
    }

    #[test]
    fn test_untouched_paragraph_is_byte_identical() {
        let body = r#"<w:p><w:r><w:t>Nothing</w:t></w:r><w:r><w:t> to {{see}}</w:t></w:r></w:p>"#;
        let mut roots = document(body);
        let subs = Substitutions::new(&mapping(&[("other", Some("x"))]), "");

        assert_eq!(fill_blocks(&mut roots, &subs), 0);
        assert_eq!(body_xml(&roots), body);
    }

    #[test]
    fn test_cell_collapses_to_first_paragraph() {
        let mut roots = document(
            r#"<w:tbl><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>Value:</w:t></w:r></w:p><w:p><w:r><w:t>{{Contract Value}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let subs = Substitutions::new(&mapping(&[("Contract Value", Some("50000"))]), "");

        assert_eq!(fill_blocks(&mut roots, &subs), 1);
        assert_eq!(
            body_xml(&roots),
            r#"<w:tbl><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t xml:space="preserve">Value:</w:t><w:br/><w:t xml:space="preserve">50000</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#
        );
    }

    #[test]
    fn test_nested_table_cells_filled() {
        let mut roots = document(
            r#"<w:tbl><w:tr><w:tc><w:p/><w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{a}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:tc></w:tr></w:tbl>"#,
        );
        let subs = Substitutions::new(&mapping(&[("a", Some("inner"))]), "");

        assert_eq!(fill_blocks(&mut roots, &subs), 1);
        assert!(body_xml(&roots).contains("inner"));
        assert!(!body_xml(&roots).contains("{{a}}"));
    }

    #[test]
    fn test_merged_text_reads_tabs_and_breaks() {
        let roots = document(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:cr/></w:r></w:p>"#,
        );
        let body = roots[0].as_element().unwrap().first_child(BODY).unwrap();
        let paragraph = body.first_child(PARAGRAPH).unwrap();
        assert_eq!(paragraph_text(paragraph), "a\tb\n\n");
    }

    #[test]
    fn test_scan_placeholders() {
        let mut roots = document(
            r#"<w:p><w:r><w:t>{{Supplier Name}} and {{Contract</w:t></w:r><w:r><w:t> Value}}</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{Supplier Name}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let keys: Vec<_> = scan_placeholders(&mut roots).into_iter().collect();
        assert_eq!(keys, vec!["Contract Value", "Supplier Name"]);
    }

    #[test]
    fn test_placeholder_keys_edge_cases() {
        assert_eq!(placeholder_keys("{{a}}{{b}}"), vec!["a", "b"]);
        assert_eq!(placeholder_keys("{{ {{a}}"), vec!["a"]);
        assert!(placeholder_keys("{{}} {{open").is_empty());
        assert!(placeholder_keys("plain").is_empty());
    }
}
