use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Installed families tried, in order, for the CSS generic names.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "Open Sans",
    "Cantarell",
];
const SERIF_FAMILIES: &[&str] = &[
    "Times New Roman",
    "Times",
    "Liberation Serif",
    "DejaVu Serif",
    "Noto Serif",
    "Georgia",
];
const MONOSPACE_FAMILIES: &[&str] = &[
    "Courier New",
    "Liberation Mono",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "Menlo",
    "Consolas",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// One font face picked from a [`FontLibrary`], with its data loaded.
#[derive(Clone)]
pub struct FontFace {
    /// Identity of the face inside its library.
    pub id: fontdb::ID,
    /// Family name reported by the font itself.
    pub family: String,
    /// Face index within the font file (non-zero for collections).
    pub index: u32,
    /// OpenType weight class.
    pub weight: u16,
    /// Italic or oblique face.
    pub italic: bool,
    /// Raw font file bytes, shared between render workers.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("index", &self.index)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Fonts available to a job, backed by a `fontdb` database.
#[derive(Clone)]
pub struct FontLibrary {
    db: fontdb::Database,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// True when no face has been registered.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Distinct family names, sorted.
    pub fn family_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .filter_map(|f| f.families.first().map(|(n, _)| n.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Register in-memory font data, returning the first new face's family.
    pub fn add_font_bytes(&mut self, bytes: Vec<u8>) -> CaptionResult<String> {
        let ids = self
            .db
            .load_font_source(fontdb::Source::Binary(Arc::new(bytes)));
        let id = ids
            .first()
            .copied()
            .ok_or_else(|| CaptionError::render("no font faces found in font bytes"))?;
        self.refresh_generic_families();
        self.family_of(id)
    }

    /// Register one font file (`.ttf`, `.otf` or `.ttc`).
    pub fn add_font_file(&mut self, path: &Path) -> CaptionResult<String> {
        let before = self.db.len();
        self.db
            .load_font_file(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        let id = self
            .db
            .faces()
            .nth(before)
            .map(|f| f.id)
            .ok_or_else(|| {
                CaptionError::render(format!("no font faces found in '{}'", path.display()))
            })?;
        self.refresh_generic_families();
        self.family_of(id)
    }

    /// Register every font below `dir`, returning how many faces were added.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let before = self.db.len();
        self.db.load_fonts_dir(dir);
        self.refresh_generic_families();
        self.db.len() - before
    }

    /// Register the platform's installed fonts.
    pub fn load_system_fonts(&mut self) -> usize {
        let before = self.db.len();
        self.db.load_system_fonts();
        self.refresh_generic_families();
        self.db.len() - before
    }

    /// Pick the face for a CSS-like family list such as `"Noto Sans, sans-serif"`.
    ///
    /// Families are tried in list order at normal weight, stretch and style;
    /// `sans-serif` is always appended as the last resort. If even that has no
    /// match, the first registered face is used.
    pub fn resolve(&self, family_list: &str) -> CaptionResult<FontFace> {
        let first = self.db.faces().next().ok_or_else(|| {
            CaptionError::render("no fonts registered; add a font file or font directory")
        })?;

        let names: Vec<String> = parse_family_list(family_list)
            .into_iter()
            .map(|n| self.canonical_family(&n))
            .collect();
        let mut families: Vec<fontdb::Family<'_>> =
            names.iter().map(|n| css_family(n)).collect();
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = match self.db.query(&query) {
            Some(id) => id,
            None => {
                tracing::warn!(
                    requested = family_list,
                    fallback = ?first.families.first().map(|(n, _)| n.as_str()),
                    "font family not found, falling back"
                );
                first.id
            }
        };
        self.load_face(id)
    }

    /// Identities of all registered faces, in registration order.
    pub(crate) fn face_ids(&self) -> Vec<fontdb::ID> {
        self.db.faces().map(|f| f.id).collect()
    }

    /// Load the data of one registered face.
    pub(crate) fn load_face(&self, id: fontdb::ID) -> CaptionResult<FontFace> {
        let info = self
            .db
            .face(id)
            .ok_or_else(|| CaptionError::render("font face is not registered"))?;
        let bytes = self
            .db
            .with_face_data(id, |data, _| data.to_vec())
            .ok_or_else(|| {
                CaptionError::render(format!("font data for '{}' is unavailable", info.post_script_name))
            })?;

        Ok(FontFace {
            id,
            family: self.family_of(id)?,
            index: info.index,
            weight: info.weight.0,
            italic: info.style != fontdb::Style::Normal,
            bytes: Arc::new(bytes),
        })
    }

    fn family_of(&self, id: fontdb::ID) -> CaptionResult<String> {
        let info = self
            .db
            .face(id)
            .ok_or_else(|| CaptionError::render("font face is not registered"))?;
        Ok(info
            .families
            .first()
            .map(|(n, _)| n.clone())
            .unwrap_or_else(|| info.post_script_name.clone()))
    }

    /// Installed spelling of `name`, matched case-insensitively.
    fn canonical_family(&self, name: &str) -> String {
        self.db
            .faces()
            .flat_map(|f| f.families.iter())
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(n, _)| n.clone())
            .unwrap_or_else(|| name.to_owned())
    }

    fn has_family(&self, name: &str) -> bool {
        self.db
            .faces()
            .any(|f| f.families.iter().any(|(n, _)| n == name))
    }

    fn refresh_generic_families(&mut self) {
        if let Some(name) = self.first_installed(SANS_SERIF_FAMILIES) {
            self.db.set_sans_serif_family(name);
        }
        if let Some(name) = self.first_installed(SERIF_FAMILIES) {
            self.db.set_serif_family(name);
        }
        if let Some(name) = self.first_installed(MONOSPACE_FAMILIES) {
            self.db.set_monospace_family(name);
        }
    }

    fn first_installed(&self, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .find(|c| self.has_family(c))
            .map(|c| (*c).to_owned())
    }
}

fn css_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        "monospace" => fontdb::Family::Monospace,
        _ => fontdb::Family::Name(name),
    }
}

fn parse_family_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Stateful helper for building single-line Parley layouts.
///
/// Each render worker owns one; faces are registered into its font context
/// lazily, the first time they are used.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<fontdb::ID, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Shape `text` as one unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CaptionResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptionError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = match self.registered.get(&face.id) {
            Some(name) => name.clone(),
            None => {
                let name = self.register(face)?;
                self.registered.insert(face.id, name.clone());
                name
            }
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(if face.italic {
            parley::style::FontStyle::Italic
        } else {
            parley::style::FontStyle::Normal
        }));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Register the face's file and return the family name Parley knows it by.
    fn register(&mut self, face: &FontFace) -> CaptionResult<String> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let names: Vec<String> = families
            .iter()
            .filter_map(|(id, _)| self.font_ctx.collection.family_name(*id).map(str::to_owned))
            .collect();
        names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&face.family))
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| {
                CaptionError::render(format!("font '{}' could not be registered", face.family))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
