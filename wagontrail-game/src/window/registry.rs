//! Explicit factory tables mapping state identifiers to constructors.
use std::collections::HashMap;
use std::fmt;

use crate::error::GameError;
use crate::screens::{GameOver, MainMenu, RandomEventInfo, Store, Travel};
use crate::simulation::Simulation;
use crate::window::{Form, FormKind, FormView, GameWindow, Window, WindowKind, WindowState};

/// Builds a form from a view of its parent window.
pub type FormFactory<D> = fn(FormView<'_, D>) -> Box<dyn Form<D>>;

/// Builds a window for the manager.
pub type WindowFactory = fn(&Simulation) -> Box<dyn GameWindow>;

/// Factory for forms that need nothing from their parent to start.
#[must_use]
pub fn default_form<F, D>(_view: FormView<'_, D>) -> Box<dyn Form<D>>
where
    F: Form<D> + Default + 'static,
{
    Box::<F>::default()
}

/// The forms one window type may host.
pub struct FormRegistry<D> {
    factories: HashMap<FormKind, FormFactory<D>>,
}

impl<D> Default for FormRegistry<D> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<D> fmt::Debug for FormRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_set().entries(kinds).finish()
    }
}

impl<D: WindowState> FormRegistry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: FormKind, factory: FormFactory<D>) -> Self {
        self.register(kind, factory);
        self
    }

    pub fn register(&mut self, kind: FormKind, factory: FormFactory<D>) {
        self.factories.insert(kind, factory);
    }

    #[must_use]
    pub fn contains(&self, kind: FormKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// # Errors
    ///
    /// Returns `UnregisteredForm` when the window cannot host `kind`.
    pub fn factory(&self, kind: FormKind) -> Result<FormFactory<D>, GameError> {
        self.factories
            .get(&kind)
            .copied()
            .ok_or(GameError::UnregisteredForm {
                window: D::KIND,
                form: kind,
            })
    }
}

/// Window kinds the manager can materialize.
#[derive(Clone, Default)]
pub struct WindowRegistry {
    factories: HashMap<WindowKind, WindowFactory>,
}

impl fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_set().entries(kinds).finish()
    }
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every window the core ships.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register::<MainMenu>();
        registry.register::<Travel>();
        registry.register::<Store>();
        registry.register::<RandomEventInfo>();
        registry.register::<GameOver>();
        registry
    }

    pub fn register<D: WindowState>(&mut self) {
        self.factories.insert(D::KIND, Window::<D>::boxed);
    }

    #[must_use]
    pub fn contains(&self, kind: WindowKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// # Errors
    ///
    /// Returns `UnregisteredWindow` when no factory exists for `kind`.
    pub fn create(
        &self,
        kind: WindowKind,
        sim: &Simulation,
    ) -> Result<Box<dyn GameWindow>, GameError> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or(GameError::UnregisteredWindow(kind))?;
        Ok(factory(sim))
    }
}
