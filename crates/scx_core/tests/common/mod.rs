#![allow(dead_code)]

use scx_core::deflate::{deflate, inflate};
use scx_core::sections::{
    Condition, Effect, IncludedFile, Map, PlayerSlot, Tile, Trigger, UnitEntry,
};
use scx_core::{BodyLayout, Bitmap, Compression, Scenario, SectionId};

/// Scenario A: nothing optional present.
pub fn minimal_scenario() -> Scenario {
    Scenario {
        last_save_timestamp: 1_000_000,
        instructions: "Minimal".to_string(),
        player_count: 2,
        ..Scenario::new()
    }
}

/// Scenario B: one trigger, a 42 second timer activating trigger 0.
pub fn timer_scenario() -> Scenario {
    let mut trigger = Trigger::new("Timer", "Fires once");
    trigger.push_condition(Condition::timer(42));
    trigger.push_effect(Effect::activate_trigger(0));

    let mut scenario = minimal_scenario();
    scenario.triggers.push(trigger);
    scenario
}

pub fn stripes_bitmap() -> Bitmap {
    let palette = vec![[0, 0, 0, 0], [255, 255, 255, 0], [0, 0, 255, 0]];
    // 5 × 3, rows unpadded
    let rows = [0, 1, 2, 1, 0, 1, 2, 1, 0, 1, 2, 1, 0, 1, 2];
    Bitmap::indexed8(5, 3, palette, &rows).expect("bitmap")
}

/// Scenario C: an embedded background bitmap.
pub fn bitmap_scenario() -> Scenario {
    let mut scenario = minimal_scenario();
    scenario.messages.background_file_name = "castle".to_string();
    scenario.messages.bitmap = Some(stripes_bitmap());
    scenario
}

/// Touches every section with non-default content.
pub fn rich_scenario() -> Scenario {
    let mut scenario = bitmap_scenario();
    scenario.header.player_names[0] = "Joan".to_string();
    scenario.header.player_names[1] = "Bedford".to_string();
    scenario.header.players[0] = PlayerSlot {
        active: 1,
        human: 1,
        civ: 2,
        unknown: 4,
    };
    scenario.header.original_file_name = "joan2.scx".to_string();
    scenario.messages.instructions = "Lift the siege of Orléans.".to_string();
    scenario.player_ai.ai_names[1] = "Promi".to_string();
    scenario.player_ai.resources[0].gold = 200;
    scenario.victory.conquest_required = 1;
    scenario.diplomacy.stances[0][1] = 3;
    scenario.disables.techs[1] = vec![101, 102];
    scenario.disables.starting_ages[0] = 2;

    scenario.map = Map::filled(8, 8, 0);
    scenario.map.tiles[9] = Tile {
        terrain: 1,
        elevation: 2,
        unused: 0,
    };
    scenario.units.sections[1] = vec![UnitEntry {
        x: 3.5,
        y: 4.5,
        id: 7,
        unit_id: 74,
        state: 2,
        garrisoned_in: -1,
        ..UnitEntry::default()
    }];
    scenario.player_diplomacy.entries[0].player_name = "Joan".to_string();

    let mut trigger = Trigger::new("Rename", "");
    trigger.push_condition(Condition::destroy_object(7, 2));
    trigger.push_effect(Effect::rename(7, "La Pucelle"));
    trigger.push_effect(Effect::task_object(7, 12, 1));
    trigger.push_effect(Effect::research_technology(22, 1));
    scenario.triggers = timer_scenario().triggers;
    scenario.triggers.push(trigger);

    scenario.included_files.files = Some(vec![IncludedFile {
        title: "notes.txt".to_string(),
        content: "Orléans".to_string(),
    }]);
    scenario
}

/// Full-size map and a few thousand units: the body inflates to hundreds of KiB.
pub fn large_scenario() -> Scenario {
    let mut scenario = rich_scenario();
    scenario.map = Map::filled(220, 220, 0);
    for (i, tile) in scenario.map.tiles.iter_mut().enumerate() {
        if i % 220 < 40 {
            tile.terrain = 1;
            tile.elevation = (i / 220 % 4) as u8;
        }
    }
    for (player, section) in scenario.units.sections.iter_mut().enumerate() {
        *section = (0..400u32)
            .map(|n| UnitEntry {
                x: (n % 220) as f32 + 0.5,
                y: (n / 220) as f32 + 0.5,
                id: 1000 + player as u32 * 400 + n,
                unit_id: 4 + (n % 3) as u16,
                state: 2,
                garrisoned_in: -1,
                ..UnitEntry::default()
            })
            .collect();
    }
    scenario
}

pub fn encode(scenario: &Scenario) -> Vec<u8> {
    scenario.encode().expect("encode scenario")
}

pub fn decode_with_layout(bytes: &[u8]) -> (Scenario, BodyLayout) {
    Scenario::decode_with_layout(bytes).expect("decode scenario")
}

/// Prologue and inflated body of an encoded container.
pub fn split(bytes: &[u8]) -> (Vec<u8>, Vec<u8>, BodyLayout) {
    let (_, layout) = decode_with_layout(bytes);
    let prologue = bytes[..layout.prologue_len].to_vec();
    let body = inflate(&bytes[layout.prologue_len..]).expect("inflate body");
    (prologue, body, layout)
}

/// Reassemble a container around a (possibly patched) body.
pub fn repack(prologue: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = prologue.to_vec();
    out.extend(deflate(body, Compression::default()).expect("deflate body"));
    out
}

pub fn section_start(layout: &BodyLayout, id: SectionId) -> usize {
    layout.section(id).expect("section in layout").range.start
}
