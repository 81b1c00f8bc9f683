//! Gridspire - Entry Point
//!
//! Interactive shell around a small demo room: a repeating timer feeds a
//! counter, the counter disables a door when it saturates, and a spawner
//! clones bats on demand. Useful for poking at the dispatch machinery
//! without a host application.

use glam::Vec2;
use std::io::{self, Write};

use gridspire::actions::links::EventActionLink;
use gridspire::actions::value::{ParamMap, ParamValue};
use gridspire::core::config::EngineConfig;
use gridspire::entity::behaviors::{Behavior, BoundsMode, Counter, InputSnapshot, Spawner, Timer, TimerClock};
use gridspire::entity::Entity;
use gridspire::world::room::Room;
use gridspire::world::tile::TileMap;
use gridspire::world::{save_to_json, World};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gridspire=info")),
        )
        .init();

    tracing::info!("Gridspire starting...");

    let mut world = World::new();
    world.load_room(build_demo_room());

    println!("\n=== GRIDSPIRE ===");
    println!("Tile-room behavior engine demo");
    println!();
    println!("Commands:");
    println!("  tick / t            - Advance simulation by one frame");
    println!("  run <n>             - Run n frames");
    println!("  spawn <spawner>     - Invoke SpawnEntity on a spawner");
    println!("  status / s          - Show entity status");
    println!("  reports             - Drain and print the report log");
    println!("  save                - Print the room snapshot as JSON");
    println!("  quit / q            - Exit");
    println!();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            break;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        match command {
            "tick" | "t" => {
                world.tick(1.0 / 60.0, InputSnapshot::new());
                print_frame(&world);
            }
            "run" => {
                let frames: u64 = parts.next().and_then(|n| n.parse().ok()).unwrap_or(1);
                for _ in 0..frames {
                    world.tick(1.0 / 60.0, InputSnapshot::new());
                }
                print_frame(&world);
            }
            "spawn" => match parts.next() {
                Some(name) => {
                    let result = world.current_room_mut().map(|room| {
                        room.invoke_action(name, "SpawnEntity", "shell", &ParamMap::new())
                    });
                    match result {
                        Some(Ok(())) => println!("SpawnEntity invoked on '{name}'"),
                        Some(Err(err)) => println!("spawn failed: {err}"),
                        None => println!("no room loaded"),
                    }
                }
                None => println!("usage: spawn <spawner>"),
            },
            "status" | "s" => print_status(&world),
            "reports" => {
                if let Some(room) = world.current_room_mut() {
                    let entries = room.sink_mut().drain();
                    if entries.is_empty() {
                        println!("no reports");
                    }
                    for report in entries {
                        let entity = report.entity.as_deref().unwrap_or("-");
                        println!(
                            "[frame {:>5}] {:?} {entity}: {}",
                            report.frame, report.level, report.message
                        );
                    }
                }
            }
            "save" => {
                if let Some(room) = world.current_room() {
                    match save_to_json(room) {
                        Ok(json) => println!("{json}"),
                        Err(err) => println!("save failed: {err}"),
                    }
                }
            }
            "quit" | "q" => break,
            "" => {}
            other => println!("unknown command: {other}"),
        }
    }

    tracing::info!("Gridspire shutting down");
}

fn print_frame(world: &World) {
    if let Some(room) = world.current_room() {
        println!(
            "frame {} | {} entities | {} buffered reports",
            room.frame(),
            room.len(),
            room.sink().len()
        );
    }
}

fn print_status(world: &World) {
    let Some(room) = world.current_room() else {
        println!("no room loaded");
        return;
    };
    println!("room frame {} ({} entities):", room.frame(), room.len());
    for entity in room.entities() {
        let pos = entity.position();
        let state = if entity.is_enabled() { "enabled" } else { "disabled" };
        println!(
            "  {:<12} {:<13} ({:>6.1}, {:>6.1}) {}",
            entity.name(),
            entity.behavior.kind().name(),
            pos.x,
            pos.y,
            state
        );
    }
}

fn build_demo_room() -> Room {
    let mut room = Room::new(TileMap::new(20, 12, 16.0), EngineConfig::default());

    let mut params = ParamMap::new();
    params.insert("Amount".to_owned(), ParamValue::Number(1.0));
    let pulse = Entity::new(
        "pulse",
        Behavior::Timer(Timer::new(30.0, TimerClock::Frames, true)),
    )
    .with_position(Vec2::new(16.0, 16.0))
    .with_size(Vec2::new(2.0, 2.0))
    .with_link(
        "TimerElapsed",
        EventActionLink {
            target: "score".to_owned(),
            action: "IncrementValue".to_owned(),
            params,
        },
    );

    let score = Entity::new(
        "score",
        Behavior::Counter(Counter::new(0, 5, 0, BoundsMode::Clamp)),
    )
    .with_position(Vec2::new(48.0, 16.0))
    .with_size(Vec2::new(2.0, 2.0))
    .with_link(
        "OnMaximumReached",
        EventActionLink {
            target: "door".to_owned(),
            action: "Disable".to_owned(),
            params: ParamMap::new(),
        },
    );

    let door = Entity::new("door", Behavior::Static)
        .with_position(Vec2::new(160.0, 96.0))
        .with_size(Vec2::new(16.0, 32.0))
        .with_texture("door_closed");

    let bat = Entity::new("bat", Behavior::Static)
        .with_position(Vec2::new(100.0, 50.0))
        .with_size(Vec2::new(8.0, 8.0))
        .with_texture("bat");

    let north = Entity::new("north_perch", Behavior::Static)
        .with_position(Vec2::new(80.0, 24.0))
        .with_size(Vec2::new(4.0, 4.0));
    let south = Entity::new("south_perch", Behavior::Static)
        .with_position(Vec2::new(80.0, 168.0))
        .with_size(Vec2::new(4.0, 4.0));

    let nest = Entity::new(
        "nest",
        Behavior::Spawner(Spawner::new(
            "bat",
            vec!["north_perch".to_owned(), "south_perch".to_owned()],
            "bat_",
        )),
    )
    .with_position(Vec2::new(240.0, 96.0))
    .with_size(Vec2::new(4.0, 4.0));

    for entity in [pulse, score, door, bat, north, south, nest] {
        if let Err(err) = room.add_entity(entity) {
            tracing::error!("demo room setup failed: {err}");
        }
    }
    room
}
