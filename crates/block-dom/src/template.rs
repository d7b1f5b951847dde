//! Host markup built from a `HostMarkup` contract.

use block_core::HostMarkup;

use crate::dom::{Dom, DomError};
use crate::memory::{MemoryDom, NodeId};
use crate::selector::Selector;

/// Shape of a host page fragment: which parts of the contract it provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTemplate {
    /// Value of the id attribute; `None` leaves the attribute off.
    pub block_id: Option<String>,
    pub with_container: bool,
    pub with_title: bool,
    pub with_description: bool,
    pub with_button: bool,
}

/// Nodes created by `HostTemplate::build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostNodes {
    pub container: Option<NodeId>,
    pub title: Option<NodeId>,
    pub description: Option<NodeId>,
    pub button: Option<NodeId>,
}

impl HostTemplate {
    /// Complete markup for `block_id`.
    pub fn complete(block_id: Option<&str>) -> Self {
        Self {
            block_id: block_id.map(str::to_string),
            with_container: true,
            with_title: true,
            with_description: true,
            with_button: true,
        }
    }

    pub fn without_container(mut self) -> Self {
        self.with_container = false;
        self
    }

    pub fn without_title(mut self) -> Self {
        self.with_title = false;
        self
    }

    pub fn without_description(mut self) -> Self {
        self.with_description = false;
        self
    }

    pub fn without_button(mut self) -> Self {
        self.with_button = false;
        self
    }

    /// Build the fragment into `dom`'s body.
    ///
    /// Each selector in `markup` gets one element per compound, nested
    /// outermost first, so descendant selectors match what was built. The
    /// returned nodes are the innermost elements.
    pub fn build(&self, dom: &MemoryDom, markup: &HostMarkup) -> Result<HostNodes, DomError> {
        let mut nodes = HostNodes::default();
        if !self.with_container {
            return Ok(nodes);
        }

        let (outer, container) = elements_for(dom, &markup.container, "section")?;
        if let Some(id) = &self.block_id {
            dom.set_attribute(container, &markup.id_attribute, id);
        }
        dom.append_to_body(&outer)?;
        nodes.container = Some(container);

        let parts = [
            (self.with_title, &markup.title, "h2", &mut nodes.title),
            (
                self.with_description,
                &markup.description,
                "p",
                &mut nodes.description,
            ),
            (self.with_button, &markup.button, "button", &mut nodes.button),
        ];
        for (wanted, selector, tag, slot) in parts {
            if wanted {
                let (outer, node) = elements_for(dom, selector, tag)?;
                dom.append_child(container, outer);
                *slot = Some(node);
            }
        }

        Ok(nodes)
    }
}

/// Create the element chain for `selector` and return its outermost and
/// innermost elements. Ancestor compounds without a tag become `div`s.
fn elements_for(
    dom: &MemoryDom,
    selector: &str,
    default_tag: &str,
) -> Result<(NodeId, NodeId), DomError> {
    let selector = Selector::parse(selector)?;
    let compounds = selector.compounds();
    let last = compounds.len() - 1;

    let mut chain: Vec<NodeId> = Vec::with_capacity(compounds.len());
    for (i, compound) in compounds.iter().enumerate() {
        let fallback = if i == last { default_tag } else { "div" };
        let node = dom.create_element(compound.tag.as_deref().unwrap_or(fallback))?;
        for (name, value) in compound.required_attributes() {
            dom.set_attribute(node, &name, &value);
        }
        if let Some(parent) = chain.last() {
            dom.append_child(*parent, node);
        }
        chain.push(node);
    }

    Ok((chain[0], chain[last]))
}
