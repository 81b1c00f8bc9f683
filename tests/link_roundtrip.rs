//! Round-trip tests for links, parameter values, and room snapshots

use gridspire::actions::links::{EventActionLink, LinkTable};
use gridspire::actions::value::{ParamMap, ParamValue};
use gridspire::core::config::EngineConfig;
use gridspire::entity::behaviors::Behavior;
use gridspire::world::{load_from_json, save_room, save_to_json};

fn sample_links() -> LinkTable {
    let mut table = LinkTable::new();
    let mut push_params = ParamMap::new();
    push_params.insert("Offset".to_owned(), ParamValue::Vector([3.0, -1.5]));
    table.add_link(
        "OnTrigger",
        EventActionLink {
            target: "platform".to_owned(),
            action: "Move".to_owned(),
            params: push_params,
        },
    );
    let mut texture_params = ParamMap::new();
    texture_params.insert("Texture".to_owned(), ParamValue::Text("lava".to_owned()));
    texture_params.insert("Mode".to_owned(), ParamValue::EnumName("Wrap".to_owned()));
    table.add_link(
        "OnTrigger",
        EventActionLink {
            target: "floor".to_owned(),
            action: "ChangeTexture".to_owned(),
            params: texture_params,
        },
    );
    table
}

#[test]
fn test_link_table_roundtrip_preserves_order_and_types() {
    let table = sample_links();
    let json = serde_json::to_string(&table).unwrap();
    let back: LinkTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);

    let restored: Vec<&str> = back
        .links_for("OnTrigger")
        .iter()
        .map(|l| l.target.as_str())
        .collect();
    assert_eq!(restored, vec!["platform", "floor"]);
    assert_eq!(
        back.links_for("OnTrigger")[0].params["Offset"],
        ParamValue::Vector([3.0, -1.5])
    );
}

#[test]
fn test_room_snapshot_roundtrip_preserves_links() {
    let source = r#"{
        "width": 16,
        "height": 16,
        "tile_size": 16.0,
        "background": [0.1, 0.1, 0.2],
        "tiles": [
            { "x": 0, "y": 15, "texture": "stone", "is_collision": true }
        ],
        "entities": [
            {
                "name": "pad",
                "kind": "Trigger",
                "target": "runner",
                "position": [100.0, 100.0],
                "size": [20.0, 20.0],
                "links": {
                    "OnTrigger": [
                        {
                            "target": "runner",
                            "action": "Move",
                            "params": {
                                "Offset": { "type": "vector", "value": [4.0, 0.0] }
                            }
                        }
                    ]
                }
            },
            {
                "name": "runner",
                "kind": "Static",
                "position": [40.0, 40.0],
                "size": [8.0, 8.0]
            }
        ]
    }"#;
    let room = load_from_json(source, EngineConfig::default()).unwrap();
    let saved = save_to_json(&room).unwrap();
    let reloaded = load_from_json(&saved, EngineConfig::default()).unwrap();

    let pad = reloaded.get_entity("pad").unwrap();
    let links = pad.links.links_for("OnTrigger");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "runner");
    assert_eq!(links[0].action, "Move");
    assert_eq!(links[0].params["Offset"], ParamValue::Vector([4.0, 0.0]));
    assert_eq!(
        room.get_entity("pad").unwrap().links,
        pad.links,
        "links identical across a full save/load cycle"
    );
}

#[test]
fn test_string_encoded_parameters_recover_native_types() {
    let source = r#"{
        "width": 8,
        "height": 8,
        "entities": [
            {
                "name": "pad",
                "kind": "Static",
                "position": [40.0, 40.0],
                "size": [4.0, 4.0],
                "links": {
                    "OnMove": [
                        {
                            "target": "pad",
                            "action": "Resize",
                            "params": {
                                "Amount": { "type": "vector", "value": "2, 3" },
                                "Speed": { "type": "number", "value": "1.5" }
                            }
                        }
                    ]
                }
            }
        ]
    }"#;
    let room = load_from_json(source, EngineConfig::default()).unwrap();
    let links = room.get_entity("pad").unwrap().links.links_for("OnMove");
    assert_eq!(links[0].params["Amount"], ParamValue::Vector([2.0, 3.0]));
    assert_eq!(links[0].params["Speed"], ParamValue::Number(1.5));
}

#[test]
fn test_tiles_and_background_survive_roundtrip() {
    let source = r#"{
        "width": 4,
        "height": 4,
        "tile_size": 10.0,
        "background": [0.5, 0.25, 0.0],
        "tiles": [
            { "x": 1, "y": 2, "texture": "brick", "is_collision": true },
            { "x": 3, "y": 0, "texture": "vine" }
        ]
    }"#;
    let room = load_from_json(source, EngineConfig::default()).unwrap();
    let snapshot = save_room(&room);
    assert_eq!(snapshot.background, [0.5, 0.25, 0.0]);
    assert_eq!(snapshot.tiles.len(), 2);
    let brick = snapshot
        .tiles
        .iter()
        .find(|t| t.texture == "brick")
        .unwrap();
    assert!(brick.is_collision);
    assert_eq!((brick.x, brick.y), (1, 2));
}

#[test]
fn test_param_holder_value_roundtrip() {
    let source = r#"{
        "width": 8,
        "height": 8,
        "entities": [
            {
                "name": "speed_holder",
                "kind": "ParamHolder",
                "key": "Factor",
                "value": { "type": "number", "value": 2.0 },
                "position": [40.0, 40.0],
                "size": [1.0, 1.0]
            }
        ]
    }"#;
    let room = load_from_json(source, EngineConfig::default()).unwrap();
    let saved = save_to_json(&room).unwrap();
    let reloaded = load_from_json(&saved, EngineConfig::default()).unwrap();
    match &reloaded.get_entity("speed_holder").unwrap().behavior {
        Behavior::ParamHolder(p) => {
            assert_eq!(p.key, "Factor");
            assert_eq!(p.value, ParamValue::Number(2.0));
        }
        other => panic!("unexpected behavior {other:?}"),
    }
}
