//! Carousel assembly.
//!
//! Wraps each surviving product card in a slide and lays the slides out three
//! per view, adding navigation arrows only when there is something to scroll
//! to.

use askama::Template;
use cart_upsells_core::RecommendedProduct;

/// Slides visible at once; shared by the layout and the arrow threshold.
pub const SLIDES_PER_VIEW: usize = 3;

/// One slide wrapping a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Element id, unique within the section.
    pub id: String,
    /// 1-based position in the carousel.
    pub position: usize,
    /// Whether the slide is in the first view; later slides are hidden from
    /// assistive technology until scrolled to.
    pub primary: bool,
    /// The product card's original markup.
    pub markup: String,
}

/// A carousel ready to be swapped into the widget's content region.
#[derive(Debug, Clone, Template)]
#[template(path = "upsells/carousel.html")]
pub struct Carousel {
    /// Section the cards were rendered for.
    pub section_key: String,
    /// Slides in recommendation order.
    pub slides: Vec<Slide>,
    /// Whether previous/next arrows are shown.
    pub needs_arrows: bool,
    /// Layout parameter: slides per view.
    pub slides_per_view: usize,
}

impl Carousel {
    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the carousel has no slides; never true for an assembled one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Build a carousel from filtered products.
///
/// Returns `None` when there is nothing to show.
#[must_use]
pub fn assemble(products: &[RecommendedProduct], section_key: &str) -> Option<Carousel> {
    if products.is_empty() {
        return None;
    }

    let slides = products
        .iter()
        .enumerate()
        .map(|(index, product)| Slide {
            id: format!("Slide-{section_key}-{}", index + 1),
            position: index + 1,
            primary: index < SLIDES_PER_VIEW,
            markup: product.markup.clone(),
        })
        .collect::<Vec<_>>();

    Some(Carousel {
        section_key: section_key.to_string(),
        needs_arrows: slides.len() > SLIDES_PER_VIEW,
        slides,
        slides_per_view: SLIDES_PER_VIEW,
    })
}
