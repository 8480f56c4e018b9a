//! Ordered registry of drawable objects.
//!
//! The registry owns the render-order sequence: entries draw in exactly the
//! order they sit in the internal list, and the reorder operations permute
//! that list. Lookup is by alias; duplicate aliases are allowed (multi-part
//! loads reuse one alias) and resolve to the first match.

use std::fs;
use std::path::Path;

use log::{debug, error, warn};
use thiserror::Error;
use wgpu::Device;

use crate::gfx::rendering::ObjectBindingLayouts;

use super::object::{ModelData, ObjectOverrides, SceneObject};

/// Failure to bring a model file into the registry.
///
/// A load failure never aborts anything: it is logged and the registry is
/// left unchanged, so rendering continues with whatever already loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scene registry: an ordered collection of [`SceneObject`]s.
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Finds the first entry with the given alias.
    pub fn get(&self, alias: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.alias == alias)
    }

    /// Finds the first entry with the given alias, mutably.
    pub fn get_mut(&mut self, alias: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.alias == alias)
    }

    /// Normalizes a model record and appends it to the end of the render
    /// order. GPU upload is deferred to [`Scene::ensure_gpu_resources`].
    pub fn add(&mut self, model: ModelData, overrides: Option<ObjectOverrides>) {
        let object = SceneObject::from_model(model, overrides);
        self.objects.push(object);
    }

    /// Reads a model JSON file and appends it to the registry.
    ///
    /// `alias` replaces the alias stored in the file when given. On failure
    /// the error is logged and the registry is left unchanged.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        alias: Option<&str>,
        overrides: Option<ObjectOverrides>,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        let result = fs::read_to_string(path)
            .map_err(LoadError::from)
            .and_then(|text| serde_json::from_str::<ModelData>(&text).map_err(LoadError::from));

        match result {
            Ok(mut model) => {
                if let Some(alias) = alias {
                    model.alias = Some(alias.to_string());
                }
                self.add(model, overrides);
                Ok(())
            }
            Err(err) => {
                error!("failed to load model {}: {err}", path.display());
                Err(err)
            }
        }
    }

    /// Loads `{prefix}1.json` through `{prefix}{count}.json` under a shared
    /// alias, skipping parts that fail to load.
    pub fn load_by_parts(&mut self, prefix: &str, count: usize, alias: &str) {
        for part in 1..=count {
            let path = format!("{prefix}{part}.json");
            let _ = self.load(&path, Some(alias), None);
        }
    }

    /// Removes the first entry with the given alias, releasing its GPU
    /// buffers. Returns whether an entry was removed.
    pub fn remove(&mut self, alias: &str) -> bool {
        match self.index_of(alias) {
            Some(index) => {
                let object = self.objects.remove(index);
                if let Some(gpu) = object.gpu_resources() {
                    gpu.release();
                }
                true
            }
            None => {
                warn!("remove: no object with alias '{alias}'");
                false
            }
        }
    }

    /// Moves an entry to the front of the render order, keeping every other
    /// entry in its prior relative order. No-op if already first.
    pub fn render_first(&mut self, alias: &str) {
        let Some(index) = self.index_of(alias) else {
            warn!("render_first: no object with alias '{alias}'");
            return;
        };
        if index == 0 {
            return;
        }

        let object = self.objects.remove(index);
        self.objects.insert(0, object);
        self.log_render_order();
    }

    /// Moves an entry to the back of the render order. No-op if already
    /// last.
    pub fn render_last(&mut self, alias: &str) {
        let Some(index) = self.index_of(alias) else {
            warn!("render_last: no object with alias '{alias}'");
            return;
        };
        if index == self.objects.len() - 1 {
            return;
        }

        let object = self.objects.remove(index);
        self.objects.push(object);
        self.log_render_order();
    }

    /// Swaps an entry one position earlier in the render order. No-op at
    /// the front boundary.
    pub fn render_sooner(&mut self, alias: &str) {
        let Some(index) = self.index_of(alias) else {
            warn!("render_sooner: no object with alias '{alias}'");
            return;
        };
        if index == 0 {
            return;
        }

        self.objects.swap(index, index - 1);
        self.log_render_order();
    }

    /// Swaps an entry one position later in the render order. No-op at the
    /// back boundary.
    pub fn render_later(&mut self, alias: &str) {
        let Some(index) = self.index_of(alias) else {
            warn!("render_later: no object with alias '{alias}'");
            return;
        };
        if index == self.objects.len() - 1 {
            return;
        }

        self.objects.swap(index, index + 1);
        self.log_render_order();
    }

    /// Visits every entry in current render order.
    ///
    /// Returning `Some` from the visitor aborts the walk and hands the
    /// value back to the caller; returning `None` continues with the next
    /// entry. The registry is borrowed shared for the whole traversal, so
    /// visitors cannot mutate it mid-walk.
    pub fn traverse<T>(
        &self,
        mut visit: impl FnMut(&SceneObject, usize) -> Option<T>,
    ) -> Option<T> {
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(value) = visit(object, index) {
                return Some(value);
            }
        }
        None
    }

    /// Entries in render order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Mutable access to entries in render order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    /// Entry at a render-order index, for panel-style index-based UIs.
    pub fn object_at(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn object_at_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    /// Current render order, as aliases.
    pub fn aliases(&self) -> Vec<&str> {
        self.objects
            .iter()
            .map(|object| object.alias.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Uploads any entries that do not yet have GPU resources. Invoked by
    /// the render engine each frame, so entries added between frames become
    /// drawable at the next frame boundary, never mid-traversal.
    pub(crate) fn ensure_gpu_resources(&mut self, device: &Device, layouts: &ObjectBindingLayouts) {
        for object in &mut self.objects {
            if !object.has_gpu_resources() {
                object.init_gpu_resources(device, layouts);
            }
        }
    }

    fn index_of(&self, alias: &str) -> Option<usize> {
        self.objects.iter().position(|object| object.alias == alias)
    }

    fn log_render_order(&self) {
        debug!("render order: {}", self.aliases().join(" > "));
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(alias: &str) -> ModelData {
        ModelData {
            alias: Some(alias.to_string()),
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        }
    }

    fn scene_with(aliases: &[&str]) -> Scene {
        let mut scene = Scene::new();
        for alias in aliases {
            scene.add(model(alias), None);
        }
        scene
    }

    #[test]
    fn get_finds_first_match() {
        let mut scene = scene_with(&["floor", "cone"]);
        scene.add(
            ModelData {
                diffuse: Some([1.0, 0.0, 0.0, 1.0]),
                ..model("cone")
            },
            None,
        );

        let found = scene.get("cone").unwrap();
        assert_eq!(found.diffuse, [1.0, 1.0, 1.0, 1.0]);
        assert!(scene.get("missing").is_none());
    }

    #[test]
    fn add_appends_to_end_of_render_order() {
        let scene = scene_with(&["floor", "axis", "cone"]);
        assert_eq!(scene.aliases(), vec!["floor", "axis", "cone"]);
    }

    #[test]
    fn remove_drops_the_entry() {
        let mut scene = scene_with(&["floor", "axis", "cone"]);

        assert!(scene.remove("axis"));
        assert_eq!(scene.aliases(), vec!["floor", "cone"]);

        assert!(!scene.remove("axis"));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn render_first_moves_entry_to_front_preserving_relative_order() {
        let mut scene = scene_with(&["a", "b", "c", "d"]);

        scene.render_first("c");
        assert_eq!(scene.aliases(), vec!["c", "a", "b", "d"]);

        // Already first: no-op.
        scene.render_first("c");
        assert_eq!(scene.aliases(), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn render_last_moves_entry_to_back() {
        let mut scene = scene_with(&["a", "b", "c"]);

        scene.render_last("a");
        assert_eq!(scene.aliases(), vec!["b", "c", "a"]);

        // Already last: no-op.
        scene.render_last("a");
        assert_eq!(scene.aliases(), vec!["b", "c", "a"]);
    }

    #[test]
    fn render_sooner_and_later_are_single_swaps_with_boundary_no_ops() {
        let mut scene = scene_with(&["a", "b", "c"]);

        scene.render_sooner("b");
        assert_eq!(scene.aliases(), vec!["b", "a", "c"]);

        scene.render_sooner("b");
        assert_eq!(scene.aliases(), vec!["b", "a", "c"]);
        assert_eq!(scene.len(), 3);

        scene.render_later("c");
        assert_eq!(scene.aliases(), vec!["b", "a", "c"]);

        scene.render_later("a");
        assert_eq!(scene.aliases(), vec!["b", "c", "a"]);
    }

    #[test]
    fn reorder_with_unknown_alias_is_a_no_op() {
        let mut scene = scene_with(&["a", "b"]);

        scene.render_first("ghost");
        scene.render_last("ghost");
        scene.render_sooner("ghost");
        scene.render_later("ghost");

        assert_eq!(scene.aliases(), vec!["a", "b"]);
    }

    #[test]
    fn traverse_short_circuits_on_some() {
        let scene = scene_with(&["a", "b", "c", "d", "e"]);
        let mut visited = 0;

        let result = scene.traverse(|object, _| {
            visited += 1;
            (object.alias == "c").then_some(object.alias.clone())
        });

        assert_eq!(result.as_deref(), Some("c"));
        assert_eq!(visited, 3);
    }

    #[test]
    fn traverse_visits_all_when_no_sentinel_returned() {
        let scene = scene_with(&["a", "b", "c"]);
        let mut order = Vec::new();

        let result = scene.traverse(|object, index| {
            order.push((index, object.alias.clone()));
            None::<()>
        });

        assert!(result.is_none());
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], (2, "c".to_string()));
    }

    #[test]
    fn reorder_scenario_floor_axis_cone() {
        let mut scene = scene_with(&["floor", "axis", "cone"]);

        scene.render_sooner("cone");
        assert_eq!(scene.aliases(), vec!["floor", "cone", "axis"]);

        scene.render_first("axis");
        assert_eq!(scene.aliases(), vec!["axis", "floor", "cone"]);
    }

    #[test]
    fn load_failure_leaves_registry_unchanged() {
        let mut scene = scene_with(&["floor"]);

        assert!(scene.load("no/such/model.json", Some("ghost"), None).is_err());
        assert_eq!(scene.aliases(), vec!["floor"]);
    }

    #[test]
    fn load_parses_model_json() {
        use std::io::Write;

        let dir = std::env::temp_dir().join("neep-scene-load-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cone.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "alias": "ignored",
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "indices": [0, 1, 2],
                "diffuse": [0.8, 0.1, 0.1, 1.0],
                "Ns": 32.0
            }}"#
        )
        .unwrap();

        let mut scene = Scene::new();
        scene.load(&path, Some("cone"), None).unwrap();

        let cone = scene.get("cone").unwrap();
        assert_eq!(cone.diffuse, [0.8, 0.1, 0.1, 1.0]);
        assert_eq!(cone.shininess, 32.0);

        std::fs::remove_file(&path).ok();
    }
}
