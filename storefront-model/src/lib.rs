//! Homepage section model for the storefront.
//!
//! Defines the types every other crate in the workspace speaks:
//! - [`Section`]: one homepage content block (id, order, title, content, active flag)
//! - [`SectionContent`]: the canonical, type-checked payload; the variant is the section type
//! - [`RawSection`], [`RawSectionInput`], [`RawSectionPatch`]: wire shapes as they arrive
//!   from the store, the cache, or an editor, before normalization
//! - [`normalize`]: the single entry point that turns raw content into canonical content
//!
//! Content may arrive JSON-encoded in a string or already structured. Only the
//! normalizer looks at that distinction; everything downstream of it holds a
//! [`SectionContent`].

pub mod content;
mod error;
mod section;
mod section_type;

pub use content::{
    normalize, BannerContent, CategoriesContent, CategoryRef, CustomContent, IconCategoriesContent,
    IconCategory, ProductId, ProductsContent, SectionContent, Slide, PLACEHOLDER_IMAGE,
};
pub use error::{NormalizationError, NormalizationErrorKind, NormalizeResult, PAYLOAD_EXCERPT_LEN};
pub use section::{
    reorder_sections, sort_by_order, RawSection, RawSectionInput, RawSectionPatch, Section,
    SectionInput, SectionPatch,
};
pub use section_type::SectionType;
pub use storefront_types::{SectionId, SectionKey};
