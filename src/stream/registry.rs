//! Camera registry
//!
//! Built once at startup from configuration and shared read-only afterwards.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::clients::{ClientStats, ClientTracker};
use super::slot::{FrameSlot, SlotStats};
use crate::config::CameraConfig;
use crate::error::{AppError, Result};

/// A logical camera: static metadata plus its latest-frame slot
pub struct Camera {
    id: String,
    source_topic: String,
    label: String,
    slot: FrameSlot,
    clients: Arc<ClientTracker>,
}

impl Camera {
    fn new(id: String, source_topic: String, label: String) -> Self {
        let clients = Arc::new(ClientTracker::new(id.clone()));
        Self {
            id,
            source_topic,
            label,
            slot: FrameSlot::new(),
            clients,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_topic(&self) -> &str {
        &self.source_topic
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slot(&self) -> &FrameSlot {
        &self.slot
    }

    pub fn clients(&self) -> &Arc<ClientTracker> {
        &self.clients
    }

    /// Status snapshot for the status API
    pub fn status(&self) -> CameraStatus {
        CameraStatus {
            id: self.id.clone(),
            label: self.label.clone(),
            topic: self.source_topic.clone(),
            slot: self.slot.stats(),
            clients: self.clients.stats(),
        }
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("id", &self.id)
            .field("source_topic", &self.source_topic)
            .field("label", &self.label)
            .finish()
    }
}

/// Camera status reported by `/api/cameras`
#[derive(Debug, Clone, Serialize)]
pub struct CameraStatus {
    pub id: String,
    pub label: String,
    pub topic: String,
    #[serde(flatten)]
    pub slot: SlotStats,
    pub clients: Vec<ClientStats>,
}

/// Mapping from camera id to camera, in registration order
#[derive(Default)]
pub struct CameraRegistry {
    cameras: Vec<Arc<Camera>>,
    index: HashMap<String, usize>,
    default_camera: Option<String>,
}

impl CameraRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured cameras
    pub fn from_config(cameras: &[CameraConfig]) -> Result<Self> {
        let mut registry = Self::new();
        for camera in cameras {
            registry.register(&camera.id, &camera.topic, &camera.label)?;
        }
        Ok(registry)
    }

    /// Add a camera; fails if the id is already taken
    pub fn register(
        &mut self,
        id: impl Into<String>,
        source_topic: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Arc<Camera>> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(AppError::DuplicateCamera(id));
        }

        let camera = Arc::new(Camera::new(id.clone(), source_topic.into(), label.into()));
        self.index.insert(id, self.cameras.len());
        self.cameras.push(camera.clone());
        Ok(camera)
    }

    /// Find a camera by id
    pub fn lookup(&self, id: &str) -> Result<Arc<Camera>> {
        self.index
            .get(id)
            .map(|&i| self.cameras[i].clone())
            .ok_or_else(|| AppError::CameraNotFound(id.to_string()))
    }

    /// Iterate over all cameras in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Camera>> + '_ {
        self.cameras.iter()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Name the camera served by the id-less `/stream` and `/snapshot` routes
    pub fn set_default_camera(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if !self.index.contains_key(&id) {
            return Err(AppError::CameraNotFound(id));
        }
        self.default_camera = Some(id);
        Ok(())
    }

    /// Camera behind the id-less routes: the configured default, or the only
    /// camera of a single-camera deployment
    pub fn default_camera(&self) -> Result<Arc<Camera>> {
        match (&self.default_camera, self.cameras.as_slice()) {
            (Some(id), _) => self.lookup(id),
            (None, [only]) => Ok(only.clone()),
            (None, _) => Err(AppError::CameraNotFound("default".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CameraRegistry::new();
        registry
            .register("inspection", "/inspection_camera", "Inspection Camera (RGB)")
            .unwrap();

        let camera = registry.lookup("inspection").unwrap();
        assert_eq!(camera.id(), "inspection");
        assert_eq!(camera.source_topic(), "/inspection_camera");
        assert_eq!(camera.label(), "Inspection Camera (RGB)");
        assert!(!camera.slot().has_frame());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = CameraRegistry::new();
        registry.register("cam", "/a", "A").unwrap();
        let err = registry.register("cam", "/b", "B").unwrap_err();
        assert!(matches!(err, AppError::DuplicateCamera(id) if id == "cam"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("cam").unwrap().source_topic(), "/a");
    }

    #[test]
    fn test_unknown_camera() {
        let registry = CameraRegistry::new();
        let err = registry.lookup("front").unwrap_err();
        assert!(matches!(err, AppError::CameraNotFound(id) if id == "front"));
    }

    #[test]
    fn test_iter_is_ordered_and_restartable() {
        let mut registry = CameraRegistry::new();
        for id in ["c", "a", "b"] {
            registry.register(id, format!("/{}", id), id.to_uppercase()).unwrap();
        }

        let first: Vec<_> = registry.iter().map(|c| c.id().to_string()).collect();
        let second: Vec<_> = registry.iter().map(|c| c.id().to_string()).collect();
        assert_eq!(first, vec!["c", "a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_camera() {
        let mut registry = CameraRegistry::new();
        assert!(registry.default_camera().is_err());

        registry.register("only", "/only", "Only").unwrap();
        assert_eq!(registry.default_camera().unwrap().id(), "only");

        registry.register("second", "/second", "Second").unwrap();
        assert!(registry.default_camera().is_err());

        registry.set_default_camera("second").unwrap();
        assert_eq!(registry.default_camera().unwrap().id(), "second");
        assert!(registry.set_default_camera("missing").is_err());
    }

    #[test]
    fn test_from_config() {
        let cameras = vec![
            CameraConfig {
                id: "left".into(),
                topic: "/left".into(),
                label: "Left".into(),
            },
            CameraConfig {
                id: "left".into(),
                topic: "/right".into(),
                label: "Right".into(),
            },
        ];
        assert!(matches!(
            CameraRegistry::from_config(&cameras),
            Err(AppError::DuplicateCamera(_))
        ));
        assert_eq!(CameraRegistry::from_config(&cameras[..1]).unwrap().len(), 1);
    }
}
