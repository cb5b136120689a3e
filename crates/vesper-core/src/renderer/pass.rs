// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Render passes, their per-frame render targets, and the pass registry.
//!
//! A [`RenderPass`] is created from a [`RenderPassConfig`] when the view that
//! lists it is registered. It owns one [`RenderTarget`] per frame in flight.
//! Targets only reference attachments: the textures themselves belong to the
//! resource system and are never freed here.
//!
//! Passes live in a [`RenderPassRegistry`] and are referred to by
//! [`RenderPassId`] everywhere else.

use super::backend::RendererBackend;
use super::error::ConfigError;
use crate::math::{Extent2D, Rect, Vec4};
use crate::resource::TextureHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which buffers a pass clears when it begins.
///
/// Bits combine with `|`. `NONE` is the zero value and has no effect once any
/// other bit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClearFlags {
    bits: u8,
}

impl ClearFlags {
    /// Clear nothing.
    pub const NONE: Self = Self { bits: 0 };
    /// Clear the colour attachment.
    pub const COLOUR: Self = Self { bits: 1 << 0 };
    /// Clear the depth attachment.
    pub const DEPTH: Self = Self { bits: 1 << 1 };
    /// Clear the stencil attachment.
    pub const STENCIL: Self = Self { bits: 1 << 2 };
    /// Every valid bit.
    pub const ALL: Self = Self {
        bits: Self::COLOUR.bits | Self::DEPTH.bits | Self::STENCIL.bits,
    };

    /// Creates flags from raw bits, or `None` if any bit is unknown.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.bits == 0 {
            Some(Self { bits })
        } else {
            None
        }
    }

    /// Creates flags from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self {
            bits: bits & Self::ALL.bits,
        }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if every bit of `other` is set in these flags.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if no bit is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for ClearFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ClearFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Returns `true` for the names that mean "no linked pass".
pub fn is_sentinel_link(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("none")
}

/// The role of an attachment inside a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// A colour output.
    Colour,
    /// A depth buffer.
    Depth,
    /// A stencil buffer.
    Stencil,
}

/// Where an attachment's texture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSource {
    /// The backend's own attachment for the frame in flight (swapchain image or
    /// shared depth buffer).
    #[default]
    Default,
    /// A texture supplied by the resource system.
    Texture(TextureHandle),
}

/// One attachment of a [`RenderTargetConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTargetAttachmentConfig {
    /// The role of the attachment.
    pub kind: AttachmentKind,
    /// Where its texture comes from.
    #[serde(default)]
    pub source: AttachmentSource,
}

/// Describes the render targets of a pass.
///
/// The same layout is instantiated once per frame in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTargetConfig {
    /// The attachments, in binding order.
    pub attachments: Vec<RenderTargetAttachmentConfig>,
    /// Rebuild the targets whenever the surface is resized.
    #[serde(default = "default_sync_to_window_size")]
    pub sync_to_window_size: bool,
}

fn default_sync_to_window_size() -> bool {
    true
}

impl Default for RenderTargetConfig {
    /// One window-synced target with the backend's colour and depth attachments.
    fn default() -> Self {
        Self {
            attachments: vec![
                RenderTargetAttachmentConfig {
                    kind: AttachmentKind::Colour,
                    source: AttachmentSource::Default,
                },
                RenderTargetAttachmentConfig {
                    kind: AttachmentKind::Depth,
                    source: AttachmentSource::Default,
                },
            ],
            sync_to_window_size: true,
        }
    }
}

impl RenderTargetConfig {
    /// Instantiates one [`RenderTarget`] per frame in flight.
    ///
    /// Default-sourced attachments are looked up on the backend for each
    /// frame-in-flight index. Window-synced targets take the surface extent,
    /// fixed targets take the extent of `render_area`.
    pub fn build_targets(
        &self,
        pass: &str,
        backend: &dyn RendererBackend,
        surface: Extent2D,
        render_area: Rect,
    ) -> Result<Vec<RenderTarget>, ConfigError> {
        let count = backend.frames_in_flight().max(1);
        let extent = if self.sync_to_window_size {
            surface
        } else {
            Extent2D::new(render_area.width as u32, render_area.height as u32)
        };

        (0..count)
            .map(|index| {
                Ok(RenderTarget::new(
                    self.resolve_attachments(pass, backend, index)?,
                    self.sync_to_window_size,
                    extent.width,
                    extent.height,
                ))
            })
            .collect()
    }

    /// Resolves the attachments of the target for one frame-in-flight index.
    ///
    /// Explicit textures are returned as is. Default-sourced attachments are
    /// looked up on `backend`, so calling this again after the backend rebuilt
    /// its swapchain yields the new images.
    pub fn resolve_attachments(
        &self,
        pass: &str,
        backend: &dyn RendererBackend,
        index: usize,
    ) -> Result<Vec<TextureHandle>, ConfigError> {
        self.attachments
            .iter()
            .map(|attachment| {
                let handle = match attachment.source {
                    AttachmentSource::Texture(handle) => Some(handle),
                    AttachmentSource::Default => match attachment.kind {
                        AttachmentKind::Colour => backend.window_attachment(index),
                        AttachmentKind::Depth | AttachmentKind::Stencil => {
                            backend.depth_attachment(index)
                        }
                    },
                };
                handle.ok_or_else(|| ConfigError::UnresolvedAttachment {
                    pass: pass.to_owned(),
                    target_index: index,
                    kind: attachment.kind,
                })
            })
            .collect()
    }
}

/// The attachments one pass renders into for one frame in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    attachments: Vec<TextureHandle>,
    sync_to_window_size: bool,
    width: u32,
    height: u32,
    generation: u32,
}

impl RenderTarget {
    /// Creates a target over borrowed attachments.
    pub fn new(
        attachments: Vec<TextureHandle>,
        sync_to_window_size: bool,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            attachments,
            sync_to_window_size,
            width,
            height,
            generation: 0,
        }
    }

    /// The attachments, in binding order.
    pub fn attachments(&self) -> &[TextureHandle] {
        &self.attachments
    }

    /// Number of attachments. Always equals `attachments().len()`.
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Whether this target follows the surface size.
    pub fn sync_to_window_size(&self) -> bool {
        self.sync_to_window_size
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Incremented every time the target is rebuilt.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn rebuild(&mut self, attachments: Vec<TextureHandle>, width: u32, height: u32) {
        self.attachments = attachments;
        self.width = width;
        self.height = height;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Configuration of a single render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPassConfig {
    /// Unique name of the pass.
    pub name: String,
    /// The pass that runs before this one, or a sentinel.
    #[serde(default)]
    pub prev_name: String,
    /// The pass that runs after this one, or a sentinel.
    #[serde(default)]
    pub next_name: String,
    /// `(x, y, width, height)` in pixels.
    pub render_area: Vec4,
    /// RGBA clear colour.
    #[serde(default)]
    pub clear_colour: Vec4,
    /// Raw [`ClearFlags`] bits.
    #[serde(default)]
    pub clear_flags: u8,
    /// Layout of the pass's render targets.
    #[serde(default)]
    pub target: RenderTargetConfig,
}

impl RenderPassConfig {
    /// A standalone pass clearing colour and depth, with the default target.
    pub fn new(name: impl Into<String>, render_area: Vec4) -> Self {
        Self {
            name: name.into(),
            prev_name: String::new(),
            next_name: String::new(),
            render_area,
            clear_colour: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clear_flags: (ClearFlags::COLOUR | ClearFlags::DEPTH).bits(),
            target: RenderTargetConfig::default(),
        }
    }

    /// Sets the previous and next pass names.
    pub fn with_links(mut self, prev: impl Into<String>, next: impl Into<String>) -> Self {
        self.prev_name = prev.into();
        self.next_name = next.into();
        self
    }

    /// Sets the clear colour and raw clear flags.
    pub fn with_clear(mut self, colour: Vec4, flags: u8) -> Self {
        self.clear_colour = colour;
        self.clear_flags = flags;
        self
    }

    /// Sets the render target layout.
    pub fn with_target(mut self, target: RenderTargetConfig) -> Self {
        self.target = target;
        self
    }
}

/// Checks that every `prev_name`/`next_name` names one of `configs` or is a sentinel.
pub fn validate_pass_links<'a>(
    configs: impl IntoIterator<Item = &'a RenderPassConfig> + Clone,
) -> Result<(), ConfigError> {
    let names: HashSet<&str> = configs.clone().into_iter().map(|c| c.name.as_str()).collect();
    for config in configs {
        for link in [&config.prev_name, &config.next_name] {
            if !is_sentinel_link(link) && !names.contains(link.as_str()) {
                return Err(ConfigError::UnresolvedPassLink {
                    pass: config.name.clone(),
                    link: link.clone(),
                });
            }
        }
    }
    Ok(())
}

/// A stable identifier of a pass inside a [`RenderPassRegistry`].
///
/// The slot index is recycled once its pass is released; the generation is
/// not, so a stale id never resolves to a newer pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderPassId {
    index: u16,
    generation: u32,
}

impl RenderPassId {
    /// Creates an id from its raw parts.
    pub const fn new(index: u16, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The registry slot.
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// How many passes occupied the slot before this one.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// A live render pass.
#[derive(Debug, Clone)]
pub struct RenderPass {
    id: RenderPassId,
    name: String,
    prev_name: Option<String>,
    next_name: Option<String>,
    render_area: Rect,
    clear_colour: Vec4,
    clear_flags: ClearFlags,
    // Kept to resolve default attachments again on resize.
    target_config: RenderTargetConfig,
    targets: Vec<RenderTarget>,
}

impl RenderPass {
    /// Validates `config` and builds the pass over `targets`.
    ///
    /// Fails when the render area is degenerate or the clear flags contain
    /// unknown bits.
    pub fn create(
        id: RenderPassId,
        config: &RenderPassConfig,
        targets: Vec<RenderTarget>,
    ) -> Result<Self, ConfigError> {
        let render_area = Rect::from_vec4(config.render_area);
        if render_area.is_degenerate() {
            return Err(ConfigError::DegenerateRenderArea {
                pass: config.name.clone(),
                area: render_area,
            });
        }
        let clear_flags =
            ClearFlags::from_bits(config.clear_flags).ok_or_else(|| ConfigError::InvalidClearFlags {
                pass: config.name.clone(),
                bits: config.clear_flags,
            })?;

        let link = |name: &str| (!is_sentinel_link(name)).then(|| name.to_owned());

        Ok(Self {
            id,
            name: config.name.clone(),
            prev_name: link(&config.prev_name),
            next_name: link(&config.next_name),
            render_area,
            clear_colour: config.clear_colour,
            clear_flags,
            target_config: config.target.clone(),
            targets,
        })
    }

    /// Rebuilds every window-synced target at the new size.
    ///
    /// The backend must already have been resized: default-sourced attachments
    /// of synced targets are looked up on it again. Fixed targets are
    /// untouched. The render area follows the surface only when the pass has at
    /// least one synced target.
    ///
    /// Every attachment is resolved before anything changes, so on failure the
    /// pass is left exactly as it was.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        backend: &dyn RendererBackend,
    ) -> Result<(), ConfigError> {
        let rebuilt = self
            .targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.sync_to_window_size)
            .map(|(index, _)| {
                self.target_config
                    .resolve_attachments(&self.name, backend, index)
                    .map(|attachments| (index, attachments))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if rebuilt.is_empty() {
            return Ok(());
        }
        for (index, attachments) in rebuilt {
            self.targets[index].rebuild(attachments, width, height);
        }
        self.render_area.width = width as f32;
        self.render_area.height = height as f32;
        Ok(())
    }

    /// Drops every attachment reference held by the pass.
    pub fn destroy(&mut self) {
        self.targets.clear();
    }

    /// The pass identifier.
    pub fn id(&self) -> RenderPassId {
        self.id
    }

    /// The pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The previous pass, if linked.
    pub fn prev_name(&self) -> Option<&str> {
        self.prev_name.as_deref()
    }

    /// The next pass, if linked.
    pub fn next_name(&self) -> Option<&str> {
        self.next_name.as_deref()
    }

    /// The render area.
    pub fn render_area(&self) -> Rect {
        self.render_area
    }

    /// The clear colour.
    pub fn clear_colour(&self) -> Vec4 {
        self.clear_colour
    }

    /// The clear flags.
    pub fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    /// The target layout the pass was created with.
    pub fn target_config(&self) -> &RenderTargetConfig {
        &self.target_config
    }

    /// One target per frame in flight.
    pub fn targets(&self) -> &[RenderTarget] {
        &self.targets
    }

    /// The target for a frame-in-flight index.
    pub fn target(&self, index: usize) -> Option<&RenderTarget> {
        self.targets.get(index)
    }
}

#[derive(Debug, Default)]
struct PassSlot {
    generation: u32,
    pass: Option<RenderPass>,
}

/// Arena of live render passes.
///
/// Released slots are reused, each time under a new generation, so a stale
/// [`RenderPassId`] can never alias a newer pass. A slot whose generation
/// counter is spent is retired instead of reused.
#[derive(Debug, Default)]
pub struct RenderPassRegistry {
    slots: Vec<PassSlot>,
    free: Vec<u16>,
}

impl RenderPassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pass from `config` and stores it.
    ///
    /// Fails if a live pass already has the same name, if every slot is held
    /// by a live pass, or if [`RenderPass::create`] rejects the configuration.
    pub fn register(
        &mut self,
        config: &RenderPassConfig,
        targets: Vec<RenderTarget>,
    ) -> Result<RenderPassId, ConfigError> {
        if self.find(&config.name).is_some() {
            return Err(ConfigError::DuplicatePass {
                pass: config.name.clone(),
            });
        }
        let id = match self.free.last() {
            Some(&index) => RenderPassId::new(index, self.slots[index as usize].generation),
            None => RenderPassId::new(
                u16::try_from(self.slots.len()).map_err(|_| ConfigError::PassIdsExhausted)?,
                0,
            ),
        };
        let pass = RenderPass::create(id, config, targets)?;

        if self.free.last() == Some(&id.index) {
            self.free.pop();
            self.slots[id.index as usize].pass = Some(pass);
        } else {
            self.slots.push(PassSlot {
                generation: 0,
                pass: Some(pass),
            });
        }
        Ok(id)
    }

    /// Destroys and removes a pass. Returns `None` if the id is not live.
    pub fn release(&mut self, id: RenderPassId) -> Option<RenderPass> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let mut pass = slot.pass.take()?;
        pass.destroy();
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(id.index);
        }
        Some(pass)
    }

    /// Returns the live pass with this id.
    pub fn get(&self, id: RenderPassId) -> Option<&RenderPass> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?
            .pass
            .as_ref()
    }

    /// Returns the live pass with this id, mutably.
    pub fn get_mut(&mut self, id: RenderPassId) -> Option<&mut RenderPass> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?
            .pass
            .as_mut()
    }

    /// Finds a live pass by name.
    pub fn find(&self, name: &str) -> Option<RenderPassId> {
        self.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// Iterates the live passes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderPass> {
        self.slots.iter().filter_map(|slot| slot.pass.as_ref())
    }

    /// Number of live passes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` when no pass is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_flags_bits() {
        assert_eq!(ClearFlags::COLOUR.bits(), 1);
        assert_eq!(ClearFlags::DEPTH.bits(), 2);
        assert_eq!(ClearFlags::STENCIL.bits(), 4);
        let flags = ClearFlags::NONE | ClearFlags::COLOUR | ClearFlags::STENCIL;
        assert!(flags.contains(ClearFlags::COLOUR));
        assert!(!flags.contains(ClearFlags::DEPTH));
        assert!(ClearFlags::NONE.is_empty());
        assert_eq!(ClearFlags::from_bits(8), None);
        assert_eq!(ClearFlags::from_bits_truncate(0xff), ClearFlags::ALL);
    }

    #[test]
    fn test_sentinel_links() {
        assert!(is_sentinel_link(""));
        assert!(is_sentinel_link("none"));
        assert!(is_sentinel_link("NONE"));
        assert!(!is_sentinel_link("shadow"));
    }

    #[test]
    fn test_create_rejects_degenerate_area() {
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 0.0, 600.0));
        let err = RenderPass::create(RenderPassId::new(0, 0), &config, vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateRenderArea { .. }));
    }

    #[test]
    fn test_create_rejects_unknown_clear_bits() {
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 800.0, 600.0))
            .with_clear(Vec4::ZERO, 0b1000);
        let err = RenderPass::create(RenderPassId::new(0, 0), &config, vec![]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidClearFlags {
                pass: "main".into(),
                bits: 0b1000
            }
        );
    }

    #[test]
    fn test_sentinel_links_are_stored_as_none() {
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 800.0, 600.0))
            .with_links("None", "");
        let pass = RenderPass::create(RenderPassId::new(3, 0), &config, vec![]).unwrap();
        assert_eq!(pass.prev_name(), None);
        assert_eq!(pass.next_name(), None);
        assert_eq!(pass.id(), RenderPassId::new(3, 0));
    }

    #[test]
    fn test_validate_links() {
        let shadow = RenderPassConfig::new("shadow", Vec4::new(0.0, 0.0, 1.0, 1.0))
            .with_links("none", "main");
        let main = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1.0, 1.0))
            .with_links("shadow", "none");
        assert!(validate_pass_links([&shadow, &main]).is_ok());

        let dangling = RenderPassConfig::new("ui", Vec4::new(0.0, 0.0, 1.0, 1.0))
            .with_links("world", "");
        let err = validate_pass_links([&dangling]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnresolvedPassLink {
                pass: "ui".into(),
                link: "world".into()
            }
        );
    }

    #[test]
    fn test_registry_ids_are_never_reused() {
        let mut registry = RenderPassRegistry::new();
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1.0, 1.0));

        let first = registry.register(&config, vec![]).unwrap();
        assert!(matches!(
            registry.register(&config, vec![]),
            Err(ConfigError::DuplicatePass { .. })
        ));

        let released = registry.release(first).unwrap();
        assert!(released.targets().is_empty());
        assert!(registry.get(first).is_none());
        assert!(registry.is_empty());

        let second = registry.register(&config, vec![]).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.index(), first.index());
        assert_eq!(registry.find("main"), Some(second));
        assert!(registry.get(first).is_none());
        assert!(registry.release(first).is_none());
        assert!(registry.get(second).is_some());
    }

    #[test]
    fn test_register_release_cycles_reuse_one_slot() {
        let mut registry = RenderPassRegistry::new();
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1.0, 1.0));
        let keep = registry
            .register(&RenderPassConfig::new("ui", Vec4::new(0.0, 0.0, 1.0, 1.0)), vec![])
            .unwrap();

        let mut previous = None;
        for cycle in 0..70_000u32 {
            let id = registry.register(&config, vec![]).unwrap();
            assert_eq!(id.index(), 1);
            assert_eq!(id.generation(), cycle);
            if let Some(old) = previous {
                assert!(registry.get(old).is_none());
            }
            assert!(registry.release(id).is_some());
            previous = Some(id);
        }

        assert_eq!(registry.capacity(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(keep).is_some());
    }

    #[test]
    fn test_spent_slot_is_retired() {
        let mut registry = RenderPassRegistry::new();
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1.0, 1.0));
        let first = registry.register(&config, vec![]).unwrap();
        registry.release(first).unwrap();
        registry.slots[0].generation = u32::MAX;

        let last = registry.register(&config, vec![]).unwrap();
        assert_eq!(last, RenderPassId::new(0, u32::MAX));
        registry.release(last).unwrap();

        let next = registry.register(&config, vec![]).unwrap();
        assert_eq!(next, RenderPassId::new(1, 0));
        assert!(registry.get(last).is_none());
    }

    #[test]
    fn test_full_registry_reports_exhaustion() {
        let mut registry = RenderPassRegistry::new();
        registry
            .slots
            .resize_with(usize::from(u16::MAX) + 1, PassSlot::default);
        let config = RenderPassConfig::new("main", Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(
            registry.register(&config, vec![]).unwrap_err(),
            ConfigError::PassIdsExhausted
        );
    }
}
