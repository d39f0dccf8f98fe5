use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use smol_str::SmolStr;

/// Owned element tree produced from a markup string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkupNode {
    pub tag: SmolStr,
    pub attributes: Vec<(SmolStr, String)>,
    pub text: String,
    pub children: Vec<MarkupNode>,
}

/// Parses `markup` as body content and returns its top-level elements.
/// Stray top-level text is dropped.
pub fn parse_fragment(markup: &str) -> Vec<MarkupNode> {
    let document = kuchiki::parse_html().one(markup);
    let Ok(body) = document.select_first("body") else {
        return Vec::new();
    };
    body.as_node().children().filter_map(|child| to_markup_node(&child)).collect()
}

fn to_markup_node(node: &NodeRef) -> Option<MarkupNode> {
    let element = node.as_element()?;
    let attributes = element
        .attributes
        .borrow()
        .map
        .iter()
        .map(|(name, attribute)| (SmolStr::new(&*name.local), attribute.value.clone()))
        .collect();

    let mut text = String::new();
    let mut children = Vec::new();
    for child in node.children() {
        if let Some(content) = child.as_text() {
            text.push_str(&content.borrow());
        } else if let Some(child) = to_markup_node(&child) {
            children.push(child);
        }
    }

    Some(MarkupNode {
        tag: SmolStr::new(&*element.name.local),
        attributes,
        text,
        children,
    })
}
