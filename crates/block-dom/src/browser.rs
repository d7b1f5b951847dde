//! `web-sys` backed document.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node, Window};

use crate::dom::{Callback, Dom, DomError, Listener};

fn js_error(value: JsValue) -> DomError {
    DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// A listener attached to an element, kept alive until the element is
/// removed or replaced.
struct Registered {
    node: Element,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

/// The live page document.
#[derive(Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
    listeners: Rc<RefCell<Vec<Registered>>>,
}

impl fmt::Debug for BrowserDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserDom")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl BrowserDom {
    /// Attach to the current window's document.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let document = window.document().ok_or(DomError::NoWindow)?;
        Ok(Self {
            window,
            document,
            listeners: Rc::default(),
        })
    }

    /// Run `callback` once the document has been parsed.
    pub fn on_ready(&self, callback: Callback) -> Result<(), DomError> {
        if self.document.ready_state() != "loading" {
            callback();
            return Ok(());
        }

        // Registered at most once per page.
        let closure = Closure::once(callback);
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        closure.forget();
        Ok(())
    }

    fn listen(&self, node: &Element, event: &'static str, listener: Listener) -> Result<(), DomError> {
        let closure = Closure::wrap(listener);
        node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.borrow_mut().push(Registered {
            node: node.clone(),
            event,
            closure,
        });
        Ok(())
    }

    /// Detach and drop every listener on `node` or its descendants.
    ///
    /// A listener may release itself while it runs; wasm-bindgen defers
    /// freeing the closure until the call returns.
    fn release(&self, node: &Element) {
        let released: Vec<Registered> = {
            let mut listeners = self.listeners.borrow_mut();
            let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *listeners)
                .into_iter()
                .partition(|l| {
                    let target: &Node = &l.node;
                    node.contains(Some(target))
                });
            *listeners = kept;
            released
        };
        for listener in released {
            let _ = listener.node.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Dom for BrowserDom {
    type Node = Element;

    fn query(&self, selector: &str) -> Result<Option<Element>, DomError> {
        self.document
            .query_selector(selector)
            .map_err(|_| DomError::InvalidSelector(selector.to_string()))
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Result<Option<Element>, DomError> {
        scope
            .query_selector(selector)
            .map_err(|_| DomError::InvalidSelector(selector.to_string()))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_hidden(&self, node: &Element, hidden: bool) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.set_hidden(hidden);
        } else if hidden {
            let _ = node.set_attribute("hidden", "");
        } else {
            let _ = node.remove_attribute("hidden");
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Js("element has no inline style".to_string()))?;
        element
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn set_class(&self, node: &Element, class: &str) {
        node.set_class_name(class);
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn append_to_body(&self, node: &Element) -> Result<(), DomError> {
        let body = self.document.body().ok_or(DomError::NoBody)?;
        body.append_child(node).map_err(js_error)?;
        Ok(())
    }

    fn remove(&self, node: &Element) {
        self.release(node);
        node.remove();
    }

    fn replace_with_clone(&self, node: &Element) -> Result<Element, DomError> {
        let parent = node.parent_node().ok_or(DomError::Detached)?;
        let clone: Element = node
            .clone_node_with_deep(true)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| DomError::Js("clone is not an element".to_string()))?;
        parent.replace_child(&clone, node).map_err(js_error)?;
        self.release(node);
        Ok(clone)
    }

    fn on_click(&self, node: &Element, listener: Listener) -> Result<(), DomError> {
        self.listen(node, "click", listener)
    }

    fn on_transition_end(&self, node: &Element, listener: Listener) -> Result<(), DomError> {
        self.listen(node, "transitionend", listener)
    }

    fn set_timeout(&self, delay: Duration, callback: Callback) -> Result<(), DomError> {
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let function = Closure::once_into_js(callback);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                function.unchecked_ref(),
                millis,
            )
            .map_err(js_error)?;
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), DomError> {
        self.window.location().set_href(url).map_err(js_error)
    }
}
