use std::rc::Rc;

use studio_core::inspire::{Picker, TemplateInspiration};

/// Uniform pick backed by `Math.random`.
pub fn random_picker() -> Picker {
    Rc::new(|len: usize| (js_sys::Math::random() * len as f64).floor() as usize)
}

pub fn template_inspiration() -> TemplateInspiration {
    TemplateInspiration::new(random_picker())
}
