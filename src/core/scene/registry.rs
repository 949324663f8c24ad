//=========================================================================
// Scene Registry
//=========================================================================
//
// Maps scene keys to factories.
//
// Scenes are never stored here, only the means to build them. Each
// activation asks the registry for a brand-new instance, which is what
// guarantees a clean `init` on every visit.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneError, SceneKey};

//=== SceneFactory ========================================================

/// Boxed zero-argument constructor for a scene.
pub type SceneFactory<K, D> = Box<dyn Fn() -> Box<dyn Scene<K, D>> + Send>;

//=== SceneRegistry =======================================================

/// Key → factory table with registration order and an initial scene.
pub struct SceneRegistry<K: SceneKey, D> {
    factories: HashMap<K, SceneFactory<K, D>>,
    order: Vec<K>,
    initial: Option<K>,
}

impl<K: SceneKey, D> SceneRegistry<K, D> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            order: Vec::new(),
            initial: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `factory` under `key`.
    ///
    /// # Errors
    ///
    /// [`SceneError::DuplicateKey`] if `key` already has a factory; the
    /// existing one is kept.
    pub fn register<F, S>(&mut self, key: K, factory: F) -> Result<(), SceneError<K>>
    where
        F: Fn() -> S + Send + 'static,
        S: Scene<K, D> + 'static,
    {
        if self.factories.contains_key(&key) {
            return Err(SceneError::DuplicateKey(key));
        }

        let boxed: SceneFactory<K, D> =
            Box::new(move || -> Box<dyn Scene<K, D>> { Box::new(factory()) });
        self.factories.insert(key, boxed);
        self.order.push(key);

        debug!(target: "stage", "Registered scene {:?} ({} total)", key, self.order.len());
        Ok(())
    }

    /// Marks `key` as the scene to start with.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownScene`] if `key` is not registered.
    pub fn set_initial(&mut self, key: K) -> Result<(), SceneError<K>> {
        if !self.contains(&key) {
            return Err(SceneError::UnknownScene(key));
        }
        self.initial = Some(key);
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// The explicitly marked initial scene, else the first registered one.
    pub fn initial(&self) -> Option<K> {
        self.initial.or_else(|| self.order.first().copied())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    //--- Instantiation ----------------------------------------------------

    /// Builds a fresh scene for `key`.
    pub fn instantiate(&self, key: &K) -> Result<Box<dyn Scene<K, D>>, SceneError<K>> {
        self.factories
            .get(key)
            .map(|factory| factory())
            .ok_or(SceneError::UnknownScene(*key))
    }
}

impl<K: SceneKey, D> Default for SceneRegistry<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
