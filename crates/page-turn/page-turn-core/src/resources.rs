//! Resource cache: shared page geometry and per-page material bindings.
//!
//! One cache lives inside each book engine and is dropped with it. Texture
//! references stay opaque; the cache never looks at pixel data. A reference
//! the host cannot resolve is replaced by the configured fallback so the bone
//! math never depends on texture state.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{PageDimensions, TextureFallbacks};
use crate::geometry::PageGeometry;
use crate::inputs::PageSpec;

/// Opaque texture reference (URL, asset key or handle id).
pub type TextureRef = String;

/// Trait for resolving page texture keys to host texture references.
/// Adapters (Bevy/WASM) implement this and pass it into BookEngine::bind_textures().
pub trait TextureResolver {
    fn resolve(&mut self, key: &str) -> Option<TextureRef>;
}

/// Resolves every non-empty key to itself.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassthroughResolver;

impl TextureResolver for PassthroughResolver {
    fn resolve(&mut self, key: &str) -> Option<TextureRef> {
        if key.trim().is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

/// A texture bound into one material slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBinding {
    pub texture: TextureRef,
    /// True when the page's own texture could not be resolved.
    pub fallback: bool,
}

/// Materials for the front and back faces of one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMaterials {
    pub front: MaterialBinding,
    pub back: MaterialBinding,
    pub front_roughness: Option<TextureRef>,
    pub back_roughness: Option<TextureRef>,
    /// Page spec the bindings were resolved from.
    pub source: PageSpec,
}

#[derive(Debug)]
pub struct ResourceCache {
    fallbacks: TextureFallbacks,
    geometry: Option<PageGeometry>,
    materials: HashMap<usize, PageMaterials>,
}

impl ResourceCache {
    pub fn new(fallbacks: TextureFallbacks) -> Self {
        Self {
            fallbacks,
            geometry: None,
            materials: HashMap::new(),
        }
    }

    /// Shared page geometry, built on first use.
    pub fn geometry(&mut self, dims: &PageDimensions) -> &PageGeometry {
        self.geometry.get_or_insert_with(|| PageGeometry::build(dims))
    }

    pub fn cached_geometry(&self) -> Option<&PageGeometry> {
        self.geometry.as_ref()
    }

    pub fn materials(&self, page: usize) -> Option<&PageMaterials> {
        self.materials.get(&page)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn resolve_slot(
        resolver: &mut dyn TextureResolver,
        key: &str,
        fallback: &str,
        page: usize,
        slot: &str,
    ) -> MaterialBinding {
        match resolver.resolve(key) {
            Some(texture) => MaterialBinding {
                texture,
                fallback: false,
            },
            None => {
                warn!(page, slot, key, fallback, "texture missing; using fallback");
                MaterialBinding {
                    texture: fallback.to_string(),
                    fallback: true,
                }
            }
        }
    }

    /// Bind materials for `page`. Returns `true` when the bindings were
    /// (re)resolved, `false` when the texture identity was unchanged.
    ///
    /// The outer faces of the book (front of the first page, back of the last)
    /// fall back to the cover texture and carry the cover roughness map.
    pub fn bind(
        &mut self,
        page: usize,
        page_count: usize,
        spec: &PageSpec,
        resolver: &mut dyn TextureResolver,
    ) -> bool {
        if self
            .materials
            .get(&page)
            .is_some_and(|m| m.source == *spec)
        {
            return false;
        }
        let is_first = page == 0;
        let is_last = page + 1 == page_count;
        let front_fallback = if is_first {
            &self.fallbacks.cover
        } else {
            &self.fallbacks.page
        };
        let back_fallback = if is_last {
            &self.fallbacks.cover
        } else {
            &self.fallbacks.page
        };
        let front = Self::resolve_slot(resolver, &spec.front, front_fallback, page, "front");
        let back = Self::resolve_slot(resolver, &spec.back, back_fallback, page, "back");
        let roughness = self.fallbacks.cover_roughness.clone();
        let materials = PageMaterials {
            front,
            back,
            front_roughness: if is_first { roughness.clone() } else { None },
            back_roughness: if is_last { roughness } else { None },
            source: spec.clone(),
        };
        self.materials.insert(page, materials);
        true
    }

    /// Drop cached bindings for `page` so the next bind re-resolves it.
    pub fn invalidate(&mut self, page: usize) {
        self.materials.remove(&page);
    }

    /// Forget every material binding; the shared geometry is kept.
    pub fn clear(&mut self) {
        self.materials.clear();
    }
}
