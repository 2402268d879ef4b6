//! A single sub-view of the scene with its own regions, labels and camera.

use super::camera::Camera;
use super::region::{Label, LabelId, Region, RegionId};
use crate::core_types::Rgb;
use rustc_hash::FxHashMap;

/// Identifier of a view inside a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub usize);

/// One sub-renderer: a region table, a label table and a camera
///
/// Regions are long-lived and mutated in place. Labels are cheap and are
/// replaced wholesale through [`View::replace_label`].
#[derive(Debug, Clone)]
pub struct View {
    id: ViewId,
    background: Rgb,
    camera: Camera,
    default_camera: Camera,
    regions: FxHashMap<RegionId, Region>,
    labels: FxHashMap<LabelId, Label>,
    next_handle: u64,
}

impl View {
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            background: Rgb::WHITE,
            camera: Camera::default(),
            default_camera: Camera::default(),
            regions: FxHashMap::default(),
            labels: FxHashMap::default(),
            next_handle: 0,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    // ------------------------------------------------------------------
    // Regions
    // ------------------------------------------------------------------

    pub fn add_region(&mut self, region: Region) -> RegionId {
        let id = RegionId(self.next_handle());
        self.regions.insert(id, region);
        id
    }

    pub fn remove_region(&mut self, id: RegionId) -> Option<Region> {
        self.regions.remove(&id)
    }

    /// Remove every listed region, returning how many existed
    pub fn remove_regions<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = RegionId>,
    {
        ids.into_iter()
            .filter(|id| self.regions.remove(id).is_some())
            .count()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Regions in creation order
    pub fn regions(&self) -> Vec<(RegionId, &Region)> {
        let mut out: Vec<_> = self.regions.iter().map(|(&id, r)| (id, r)).collect();
        out.sort_unstable_by_key(|(id, _)| *id);
        out
    }

    // ------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------

    pub fn add_label(&mut self, label: Label) -> LabelId {
        let id = LabelId(self.next_handle());
        self.labels.insert(id, label);
        id
    }

    pub fn remove_label(&mut self, id: LabelId) -> Option<Label> {
        self.labels.remove(&id)
    }

    /// Create `label`, release whatever `slot` held, and store the new handle in `slot`
    pub fn replace_label(&mut self, slot: &mut Option<LabelId>, label: Label) -> LabelId {
        let new_id = self.add_label(label);
        if let Some(old) = slot.replace(new_id) {
            self.remove_label(old);
        }
        new_id
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels in creation order
    pub fn labels(&self) -> Vec<&Label> {
        let mut out: Vec<_> = self.labels.iter().collect();
        out.sort_unstable_by_key(|(id, _)| **id);
        out.into_iter().map(|(_, label)| label).collect()
    }

    // ------------------------------------------------------------------
    // Camera and background
    // ------------------------------------------------------------------

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Install `camera` as both the current and the reset camera
    pub fn set_default_camera(&mut self, camera: Camera) {
        self.default_camera = camera;
        self.camera = camera;
    }

    pub fn reset_camera(&mut self) {
        self.camera = self.default_camera;
    }
}
