//! Actor list scheduling: deferred inserts/removals, depth ordering, gating.

use std::cell::RefCell;
use std::rc::Rc;

use stagehand::actor::{Actor, ActorCore, BasicActor};
use stagehand::actorlist::{ActorId, ActorList};
use stagehand::context::{DrawContext, UpdateContext};
use stagehand::director::SceneDirector;
use stagehand::render::RecordingRenderer;
use stagehand::scene::Scene;

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    core: ActorCore,
    name: String,
    log: Log,
}

impl Recorder {
    fn new(name: &str, depth: i32, log: &Log) -> Self {
        Self {
            core: ActorCore::new().with_depth(depth),
            name: name.to_string(),
            log: Rc::clone(log),
        }
    }

    fn push(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
    }
}

impl Actor for Recorder {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.push("update");
    }

    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {
        self.push("draw");
    }
}

/// Spawns its children during its first update.
struct Spawner {
    core: ActorCore,
    children: Vec<Recorder>,
    spawned: Rc<RefCell<Vec<ActorId>>>,
}

impl Actor for Spawner {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        for child in self.children.drain(..) {
            if let Some(id) = ctx.spawn(child) {
                self.spawned.borrow_mut().push(id);
            }
        }
    }
}

/// Despawns `target` during its first update.
struct Killer {
    core: ActorCore,
    target: Option<ActorId>,
}

impl Actor for Killer {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if let Some(target) = self.target.take() {
            assert!(ctx.despawn(target));
        }
    }
}

fn names(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn started(scene: Scene) -> SceneDirector {
    let mut director = SceneDirector::new();
    director.set_scene(scene);
    director.update(0.0);
    director
}

#[test]
fn test_adds_during_update_are_appended_in_call_order() {
    let log: Log = Rc::default();
    let spawned = Rc::new(RefCell::new(Vec::new()));
    let scene = Scene::new("spawn");
    let spawner_id = scene.add(Spawner {
        core: ActorCore::new(),
        children: vec![
            Recorder::new("c1", 0, &log),
            Recorder::new("c2", 0, &log),
            Recorder::new("c3", 0, &log),
        ],
        spawned: Rc::clone(&spawned),
    });
    let mut director = started(scene);

    director.update(0.016);

    let list = director.scene().expect("scene").actors();
    assert_eq!(list.pending_len(), 0);
    let mut expected = vec![spawner_id];
    expected.extend(spawned.borrow().iter().copied());
    assert_eq!(list.ids(), expected);
    // Children joined after the update pass, so none of them ran yet.
    assert!(names(&log).is_empty());

    director.update(0.016);
    assert_eq!(names(&log), ["c1:update", "c2:update", "c3:update"]);
}

#[test]
fn test_equal_depths_keep_insertion_order_across_sorts() {
    let mut list = ActorList::new();
    let a = list.add(BasicActor::new(ActorCore::new().with_depth(1)));
    let b = list.add(BasicActor::new(ActorCore::new().with_depth(0)));
    let c = list.add(BasicActor::new(ActorCore::new().with_depth(1)));
    let d = list.add(BasicActor::new(ActorCore::new().with_depth(0)));
    list.flush();
    assert_eq!(list.ids(), [b, d, a, c]);

    for _ in 0..5 {
        list.handle().request_sort();
        list.flush();
        assert_eq!(list.ids(), [b, d, a, c]);
    }

    // Moving `a` to depth 0 puts it after the existing depth-0 actors.
    list.get_mut(a).expect("a is live").core_mut().set_depth(0);
    list.flush();
    assert_eq!(list.ids(), [b, d, a, c]);
}

#[test]
fn test_lower_depth_updates_and_draws_first() {
    let log: Log = Rc::default();
    let scene = Scene::new("order");
    scene.add(Recorder::new("top", 10, &log));
    scene.add(Recorder::new("bottom", -10, &log));
    scene.add(Recorder::new("middle", 0, &log));
    let mut director = started(scene);
    let mut renderer = RecordingRenderer::new();

    director.tick(0.016, &mut renderer);

    assert_eq!(
        names(&log),
        [
            "bottom:update",
            "middle:update",
            "top:update",
            "bottom:draw",
            "middle:draw",
            "top:draw",
        ]
    );
}

#[test]
fn test_despawn_during_update_applies_at_flush() {
    let log: Log = Rc::default();
    let scene = Scene::new("despawn");
    let victim = scene.add(Recorder::new("victim", 1, &log));
    scene.add(Killer {
        core: ActorCore::new(),
        target: Some(victim),
    });
    let mut director = started(scene);

    director.update(0.016);
    // Removal is deferred: the victim still ran this frame.
    assert_eq!(names(&log), ["victim:update"]);
    let list = director.scene().expect("scene").actors();
    assert_eq!(list.len(), 1);
    assert!(list.get(victim).is_none());

    director.update(0.016);
    assert_eq!(names(&log), ["victim:update"]);
}

#[test]
fn test_inactive_and_invisible_actors_are_skipped() {
    let log: Log = Rc::default();
    let scene = Scene::new("flags");
    let mut asleep = Recorder::new("asleep", 0, &log);
    asleep.core.active = false;
    let mut hidden = Recorder::new("hidden", 0, &log);
    hidden.core.visible = false;
    scene.add(asleep);
    scene.add(hidden);
    let mut director = started(scene);

    director.tick(0.016, &mut RecordingRenderer::new());

    assert_eq!(names(&log), ["hidden:update", "asleep:draw"]);
}

#[test]
fn test_handle_to_dropped_list_is_inert() {
    let list = ActorList::new();
    let handle = list.handle();
    assert!(handle.is_alive());
    drop(list);
    assert!(!handle.is_alive());
    assert!(handle.add(Box::new(BasicActor::default())).is_none());
}
