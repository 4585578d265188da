#[cfg(target_arch = "wasm32")]
mod imp {
    use catalog::LocationSet;
    use foundation::rect::PixelRect;
    use overlay::{FallbackLink, PinView};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    /// A pin's DOM anchor element. Styling beyond per-frame placement lives
    /// in the page stylesheet under the `globe-pin` class.
    #[derive(Debug)]
    pub struct DomPinView {
        element: web_sys::HtmlElement,
        href: String,
    }

    impl PinView for DomPinView {
        fn set_position_px(&mut self, left: f64, top: f64) {
            let style = self.element.style();
            let _ = style.set_property("left", &format!("{left:.1}px"));
            let _ = style.set_property("top", &format!("{top:.1}px"));
        }

        fn set_visible(&mut self, visible: bool) {
            let style = self.element.style();
            if visible {
                let _ = style.set_property("opacity", "1");
                let _ = style.set_property("pointer-events", "auto");
            } else {
                let _ = style.set_property("opacity", "0");
                let _ = style.set_property("pointer-events", "none");
            }
        }

        fn set_scale(&mut self, scale: f64) {
            let _ = self.element.style().set_property(
                "transform",
                &format!("translate(-50%, -50%) scale({scale:.3})"),
            );
        }

        fn activation_target(&self) -> &str {
            &self.href
        }
    }

    fn document() -> Result<web_sys::Document, JsValue> {
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("window missing"))?
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))
    }

    /// Builds one anchor element per location inside the overlay container,
    /// in catalog order. Pins start hidden until the first projection pass.
    pub fn build_pin_views(
        overlay_id: &str,
        locations: &LocationSet,
    ) -> Result<Vec<DomPinView>, JsValue> {
        let document = document()?;
        let overlay = document
            .get_element_by_id(overlay_id)
            .ok_or_else(|| JsValue::from_str("pin overlay container missing"))?;
        overlay.set_inner_html("");

        let mut views = Vec::with_capacity(locations.len());
        for location in locations.iter() {
            let anchor: web_sys::HtmlAnchorElement =
                document.create_element("a")?.dyn_into()?;
            anchor.set_href(&location.branch_url);
            anchor.set_target("_blank");
            anchor.set_rel("noopener");
            anchor.set_class_name("globe-pin");
            anchor.set_title(&location.location_name);
            anchor.set_text_content(Some(&location.location_name));

            let element: web_sys::HtmlElement = anchor.clone().into();
            let style = element.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("opacity", "0");
            let _ = style.set_property("pointer-events", "none");

            overlay.append_child(&anchor)?;
            views.push(DomPinView {
                element,
                href: location.branch_url.clone(),
            });
        }
        Ok(views)
    }

    /// Current layout rect of an element, page pixels. `None` when the
    /// element is not in the document.
    pub fn query_rect(element_id: &str) -> Option<PixelRect> {
        let document = document().ok()?;
        let element = document.get_element_by_id(element_id)?;
        let rect = element.get_bounding_client_rect();
        Some(PixelRect::new(
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
        ))
    }

    /// Swaps the canvas for a plain link list built from the same location
    /// data. The one designed failure path: no 3D backend, same destinations.
    pub fn show_fallback_list(
        fallback_id: &str,
        canvas_id: &str,
        links: &[FallbackLink],
    ) -> Result<(), JsValue> {
        let document = document()?;

        if let Some(canvas) = document.get_element_by_id(canvas_id)
            && let Ok(canvas) = canvas.dyn_into::<web_sys::HtmlElement>()
        {
            let _ = canvas.style().set_property("display", "none");
        }

        let container = document
            .get_element_by_id(fallback_id)
            .ok_or_else(|| JsValue::from_str("fallback container missing"))?;
        container.set_inner_html("");

        let list = document.create_element("ul")?;
        for link in links {
            let item = document.create_element("li")?;
            let anchor: web_sys::HtmlAnchorElement =
                document.create_element("a")?.dyn_into()?;
            anchor.set_href(&link.href);
            anchor.set_target("_blank");
            anchor.set_rel("noopener");
            anchor.set_text_content(Some(&link.text));
            item.append_child(&anchor)?;
            list.append_child(&item)?;
        }
        container.append_child(&list)?;

        if let Ok(container) = container.dyn_into::<web_sys::HtmlElement>() {
            let _ = container.style().set_property("display", "block");
        }
        Ok(())
    }

    pub fn warn(message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use catalog::LocationSet;
    use foundation::rect::PixelRect;
    use overlay::{FallbackLink, PinView};
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug)]
    pub struct DomPinView {
        href: String,
    }

    impl PinView for DomPinView {
        fn set_position_px(&mut self, _left: f64, _top: f64) {}

        fn set_visible(&mut self, _visible: bool) {}

        fn set_scale(&mut self, _scale: f64) {}

        fn activation_target(&self) -> &str {
            &self.href
        }
    }

    pub fn build_pin_views(
        _overlay_id: &str,
        locations: &LocationSet,
    ) -> Result<Vec<DomPinView>, JsValue> {
        Ok(locations
            .iter()
            .map(|location| DomPinView {
                href: location.branch_url.clone(),
            })
            .collect())
    }

    pub fn query_rect(_element_id: &str) -> Option<PixelRect> {
        None
    }

    pub fn show_fallback_list(
        _fallback_id: &str,
        _canvas_id: &str,
        _links: &[FallbackLink],
    ) -> Result<(), JsValue> {
        Ok(())
    }

    pub fn warn(message: &str) {
        eprintln!("warn: {message}");
    }
}

pub use imp::{DomPinView, build_pin_views, query_rect, show_fallback_list, warn};
