//! Stagehand demo entry point.
//!
//! Builds one scene holding an animated sprite actor and, with the `lua`
//! feature, a script-driven actor, then runs it:
//!
//! - headless (default): a fixed number of frames at `target_fps`, drawing
//!   into a [`RecordingRenderer`];
//! - windowed (feature `raylib`, without `--headless`): a raylib window
//!   until it is closed.
//!
//! # Running
//!
//! ```sh
//! cargo run -- --frames 240 --sheet assets/penguin.json
//! cargo run --features raylib -- --sheet assets/penguin.json
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use log::{error, info, warn};

use stagehand::actor::ActorCore;
use stagehand::collider::Collider;
use stagehand::componentactor::ComponentActor;
use stagehand::components::aseprite::AnimationPlayer;
use stagehand::context::UpdateContext;
use stagehand::director::SceneDirector;
use stagehand::render::{Rect, RecordingRenderer};
use stagehand::resources::animationdocument::{
    AnimationDocument, Direction, FrameData, SheetMeta, Size, Tag,
};
use stagehand::resources::engineconfig::EngineConfig;
use stagehand::resources::texturestore::image_key;
use stagehand::scene::{Scene, SceneHooks};

#[cfg(feature = "lua")]
const DEMO_SCRIPT: &str = r#"
speed = 40

function SceneBegin()
    engine.log("scripted actor ready at " .. actor.x .. "," .. actor.y)
end

function Update(dt)
    actor.x = actor.x + speed * dt
    if actor.x > 200 or actor.x < 0 then
        speed = -speed
    end
end
"#;

/// Stagehand 2D runtime demo
#[derive(Parser)]
#[command(version, about = "Frame-driven actor/scene runtime demo")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Frames to run in headless mode.
    #[arg(long, value_name = "N", default_value_t = 120)]
    frames: u64,

    /// Lua source for the scripted actor.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Aseprite JSON export to animate. A built-in sheet is used otherwise.
    #[arg(long, value_name = "PATH")]
    sheet: Option<PathBuf>,

    /// Do not open a window even when built with raylib.
    #[arg(long)]
    headless: bool,
}

/// Logs scene time once per second.
struct Heartbeat;

impl SceneHooks for Heartbeat {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if ctx.clock.on_interval(1.0) {
            info!(
                "t={:.2}s frame={}",
                ctx.clock.time_active, ctx.time.frame_count
            );
        }
    }
}

fn demo_document() -> AnimationDocument {
    let frames = (0..4)
        .map(|i| FrameData {
            filename: format!("demo {i}.aseprite"),
            frame: Rect::new(i * 16, 0, 16, 16),
            rotated: false,
            trimmed: false,
            sprite_source_size: Rect::new(0, 0, 16, 16),
            source_size: Size { w: 16, h: 16 },
            duration: 120,
        })
        .collect();
    let meta = SheetMeta {
        image: "demo.png".to_string(),
        size: Size { w: 64, h: 16 },
        frame_tags: vec![Tag {
            name: "idle".to_string(),
            from: 0,
            to: 3,
            direction: Direction::Pingpong,
        }],
        ..Default::default()
    };
    AnimationDocument::new(frames, meta)
}

fn load_document(path: &Path) -> Result<AnimationDocument, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid sheet {}: {}", path.display(), e))
}

#[cfg(feature = "lua")]
fn add_scripted_actor(scene: &Scene, script: Option<&Path>) {
    use stagehand::scriptedactor::ScriptedActor;

    let (name, source) = match script {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => (path.display().to_string(), source),
            Err(e) => {
                error!("Failed to read script {}: {}", path.display(), e);
                return;
            }
        },
        None => ("demo".to_string(), DEMO_SCRIPT.to_string()),
    };
    let core = ActorCore::at(0.0, 64.0)
        .with_depth(1)
        .with_collider(Collider::new(16.0, 16.0));
    match ScriptedActor::from_lua_source(name, core, &source) {
        Ok(actor) => {
            scene.add(actor);
        }
        Err(e) => error!("{}", e),
    }
}

#[cfg(not(feature = "lua"))]
fn add_scripted_actor(_scene: &Scene, script: Option<&Path>) {
    if let Some(path) = script {
        warn!(
            "Ignoring {}: built without the `lua` feature",
            path.display()
        );
    }
}

fn build_scene(director: &mut SceneDirector, document: AnimationDocument, script: Option<&Path>) {
    let document = Rc::new(document);
    director.textures_mut().register(image_key(document.image()));

    let scene = Scene::new("demo").with_hooks(Heartbeat);
    match AnimationPlayer::from_store(Rc::clone(&document), director.textures()) {
        Some(mut player) => {
            if let Some(tag) = document.tags().first() {
                player.play(&tag.name);
            }
            let core = ActorCore::at(32.0, 32.0).with_collider(Collider::new(16.0, 16.0));
            scene.add(ComponentActor::new(core).with(player));
        }
        None => warn!("Sprite actor skipped"),
    }
    add_scripted_actor(&scene, script);
    director.set_scene(scene);
}

fn run_headless(director: &mut SceneDirector, frames: u64, target_fps: u32) {
    let delta = 1.0 / target_fps.max(1) as f32;
    let mut renderer = RecordingRenderer::new();
    for _ in 0..frames {
        director.tick(delta, &mut renderer);
    }
    info!(
        "Ran {} frame(s); last frame issued {} draw call(s)",
        renderer.frames(),
        renderer.calls().len()
    );
}

/// Run in a raylib window until it is closed. Textures are read from the
/// sheet's directory.
#[cfg(feature = "raylib")]
fn run_window(
    director: &mut SceneDirector,
    config: &EngineConfig,
    sheet: Option<&Path>,
) -> bool {
    use raylib::prelude::{Color, RaylibDraw};
    use stagehand::render::raylib_backend::{RaylibRenderer, load_textures};

    let asset_dir = sheet.and_then(Path::parent).unwrap_or(Path::new("."));

    let (width, height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(width as i32, height as i32)
        .title(&config.title)
        .build();
    rl.set_target_fps(config.target_fps);

    let textures = load_textures(&mut rl, &thread, director.textures(), asset_dir);
    while !rl.window_should_close() {
        let delta = rl.get_frame_time();
        director.update(delta);
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        let mut renderer = RaylibRenderer::new(&mut d, &textures, config.scale as f32);
        director.draw(&mut renderer);
    }
    true
}

#[cfg(not(feature = "raylib"))]
fn run_window(
    _director: &mut SceneDirector,
    _config: &EngineConfig,
    _sheet: Option<&Path>,
) -> bool {
    info!("Built without the `raylib` feature; running headless");
    false
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("Using default config ({})", e);
    }

    let document = match cli.sheet.as_deref() {
        Some(path) => match load_document(path) {
            Ok(document) => document,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => demo_document(),
    };

    let mut director = SceneDirector::from_config(&config);
    build_scene(&mut director, document, cli.script.as_deref());

    if !cli.headless && run_window(&mut director, &config, cli.sheet.as_deref()) {
        return;
    }

    run_headless(&mut director, cli.frames, config.target_fps);
}
