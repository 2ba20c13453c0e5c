//! Shared DOM plumbing for the game bindings.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, Window, window};

use crate::error::{Error, Result};

pub(crate) fn browser() -> Result<(Window, Document)> {
    let win = window().ok_or(Error::NoWindow)?;
    let doc = win.document().ok_or(Error::NoDocument)?;
    Ok((win, doc))
}

/// Looks up the mount point and clears whatever it held before.
pub(crate) fn mount_root(doc: &Document, root_id: &str) -> Result<Element> {
    let root = doc
        .get_element_by_id(root_id)
        .ok_or_else(|| Error::MissingRoot(root_id.to_string()))?;
    root.set_inner_html("");
    Ok(root)
}

pub(crate) fn element(doc: &Document, tag: &str, class: &str) -> Result<HtmlElement> {
    let el: HtmlElement = doc
        .create_element(tag)?
        .dyn_into()
        .map_err(|_| Error::Dom(format!("<{tag}> is not an HtmlElement")))?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

pub(crate) fn button(doc: &Document, class: &str, label: &str) -> Result<HtmlButtonElement> {
    let btn: HtmlButtonElement = doc
        .create_element("button")?
        .dyn_into()
        .map_err(|_| Error::Dom("<button> is not an HtmlButtonElement".into()))?;
    btn.set_type("button");
    btn.set_class_name(class);
    btn.set_text_content(Some(label));
    Ok(btn)
}

/// `<span class="label">Label</span><span>value</span>` pair; returns the value span.
pub(crate) fn stat(
    doc: &Document,
    parent: &Element,
    label: &str,
    class: &str,
) -> Result<HtmlElement> {
    let wrap = element(doc, "div", "stat")?;
    let name = element(doc, "span", "label")?;
    name.set_text_content(Some(label));
    let value = element(doc, "span", class)?;
    wrap.append_child(&name)?;
    wrap.append_child(&value)?;
    parent.append_child(&wrap)?;
    Ok(value)
}

/// Attaches a click listener for the lifetime of the page.
pub(crate) fn on_click(target: &Element, handler: impl FnMut() + 'static) -> Result<()> {
    let mut handler = handler;
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| handler())
        as Box<dyn FnMut(web_sys::MouseEvent)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub(crate) fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}
