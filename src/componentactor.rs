//! Actor composed of an ordered set of [`Component`]s.

use smallvec::SmallVec;

use crate::actor::{Actor, ActorCore};
use crate::component::Component;
use crate::context::{DrawContext, UpdateContext};

pub struct ComponentActor {
    core: ActorCore,
    components: SmallVec<[Box<dyn Component>; 4]>,
}

impl Default for ComponentActor {
    fn default() -> Self {
        Self::new(ActorCore::new())
    }
}

impl ComponentActor {
    pub fn new(core: ActorCore) -> Self {
        Self {
            core,
            components: SmallVec::new(),
        }
    }

    /// Attach a component. Returns its index; components run in attach order.
    pub fn add<C: Component>(&mut self, mut component: C) -> usize {
        component.on_attached(&self.core);
        self.components.push(Box::new(component));
        self.components.len() - 1
    }

    /// Builder form of [`add`](Self::add).
    pub fn with<C: Component>(mut self, component: C) -> Self {
        self.add(component);
        self
    }

    pub fn components_len(&self) -> usize {
        self.components.len()
    }

    /// First component of type `C`.
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<C>())
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<C>())
    }
}

impl Actor for ComponentActor {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        for component in self.components.iter_mut() {
            if component.state().active {
                component.update(&mut self.core, ctx);
            }
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        for component in self.components.iter_mut() {
            if component.state().visible {
                component.draw(&self.core, ctx);
            }
        }
    }
}
