//! Prompt inspiration: a locally composed template prompt, and a wrapper
//! that prefers a remote source and falls back to the template.

use std::rc::Rc;

use async_trait::async_trait;
use studio_types::Result;

use crate::ports::InspirationPort;

/// Returns an index in `0..len`.
pub type Picker = Rc<dyn Fn(usize) -> usize>;

const SUBJECTS: &[&str] = &[
    "a lone astronaut discovering a cosmic ocean",
    "a majestic city built into a giant waterfall",
    "a bio-luminescent forest inhabited by crystal creatures",
    "an ancient library at the edge of the universe",
    "a mechanical dragon guarding a floating castle",
    "a serene zen garden on Mars",
];

const STYLES: &[&str] = &[
    "ultra-photorealistic, detailed",
    "a vibrant digital painting",
    "a delicate watercolor illustration",
    "a dramatic 3D render",
    "a minimalist ink wash painting",
];

const LIGHTING: &[&str] = &[
    "bathed in the soft, warm glow of the golden hour",
    "dramatically lit with volumetric rays of light",
    "glowing with the electric colors of neon lights",
    "shrouded in a thick fog with diffused light",
];

const PALETTES: &[&str] = &[
    "a contrasting palette of deep blues and fiery oranges",
    "a dreamy pastel palette",
    "a dark, moody palette with pops of electric color",
];

const MOODS: &[&str] = &[
    "evoking a sense of wonder and epic adventure",
    "creating a serene, contemplative atmosphere",
    "filled with a mysterious and slightly ominous energy",
];

pub struct TemplateInspiration {
    pick: Picker,
}

impl TemplateInspiration {
    pub fn new(pick: Picker) -> Self {
        Self { pick }
    }

    fn choose(&self, options: &[&'static str]) -> &'static str {
        let index = (self.pick)(options.len()).min(options.len() - 1);
        options[index]
    }

    pub fn compose(&self) -> String {
        format!(
            "Create an original digital artwork of {}. Render it as {}, {}, using {}, {}.",
            self.choose(SUBJECTS),
            self.choose(STYLES),
            self.choose(LIGHTING),
            self.choose(PALETTES),
            self.choose(MOODS),
        )
    }
}

#[async_trait(?Send)]
impl InspirationPort for TemplateInspiration {
    async fn inspire(&self) -> Result<String> {
        Ok(self.compose())
    }
}

/// Tries `primary`; on error or an empty answer uses `fallback`.
pub struct FallbackInspiration {
    primary: Rc<dyn InspirationPort>,
    fallback: Rc<dyn InspirationPort>,
}

impl FallbackInspiration {
    pub fn new(primary: Rc<dyn InspirationPort>, fallback: Rc<dyn InspirationPort>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait(?Send)]
impl InspirationPort for FallbackInspiration {
    async fn inspire(&self) -> Result<String> {
        match self.primary.inspire().await {
            Ok(prompt) if !prompt.trim().is_empty() => Ok(prompt.trim().to_string()),
            Ok(_) => {
                log::warn!("Inspiration returned an empty prompt, using template");
                self.fallback.inspire().await
            }
            Err(e) => {
                log::warn!("Inspiration unavailable ({}), using template", e);
                self.fallback.inspire().await
            }
        }
    }
}
