mod common;

use scx_core::deflate::{deflate, inflate};
use scx_core::sections::{
    Condition, ConditionKind, ConditionRecord, Effect, EffectKind, EffectRecord, Trigger,
};
use scx_core::{Compression, ImageCodec, Scenario, SectionId};

use common::*;

#[test]
fn minimal_scenario_round_trips() {
    let scenario = minimal_scenario();
    let bytes = encode(&scenario);
    let (decoded, layout) = decode_with_layout(&bytes);

    assert_eq!(decoded, scenario);
    assert!(decoded.triggers.is_empty());
    assert!(decoded.messages.bitmap.is_none());
    assert_eq!(decoded.included_files.file_count(), 0);
    assert_eq!(layout.sections.len(), 11);
    layout.validate().expect("layout covers the body");

    let ids: Vec<SectionId> = layout.sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, SectionId::ALL.to_vec());
}

#[test]
fn timer_trigger_fields_survive() {
    let bytes = encode(&timer_scenario());
    let decoded = Scenario::decode(&bytes).expect("decode");

    let trigger = &decoded.triggers.triggers[0];
    assert_eq!(trigger.display_name(), "Timer");
    assert_eq!(trigger.conditions, vec![Condition::Timer { seconds: 42 }]);
    assert_eq!(
        trigger.effects,
        vec![Effect::ActivateTrigger { trigger_index: 0 }]
    );

    let record = trigger.conditions[0].to_record();
    assert_eq!(record.timer, 42);
    assert_eq!(record.player, -1);
    assert_eq!(record.ai_signal, -1);
    let record = trigger.effects[0].to_record();
    assert_eq!(record.trigger_index, 0);
    assert!(record.selected_unit_ids.is_empty());
}

#[test]
fn embedded_bitmap_round_trips() {
    let scenario = bitmap_scenario();
    let bytes = encode(&scenario);
    let (prologue, body, layout) = split(&bytes);

    let decoded = Scenario::decode(&repack(&prologue, &body)).expect("decode");
    let bitmap = decoded.bitmap().expect("bitmap present");
    assert_eq!((bitmap.width(), bitmap.height()), (5, 3));
    assert_eq!(decoded, scenario);

    // Flag, width, height and marker directly precede the DIB.
    let start = section_start(&layout, SectionId::MessagesCinematics);
    let flag_at = start + 6 * 4 + 9 * 2 + 2 + "castle".len();
    assert_eq!(&body[flag_at..flag_at + 4], &1u32.to_le_bytes());
    assert_eq!(&body[flag_at + 4..flag_at + 8], &5i32.to_le_bytes());
    assert_eq!(&body[flag_at + 8..flag_at + 12], &3i32.to_le_bytes());
    assert_eq!(&body[flag_at + 12..flag_at + 14], &(-1i16).to_le_bytes());
    assert_eq!(&body[flag_at + 14..flag_at + 18], &40u32.to_le_bytes());
}

#[test]
fn rich_scenario_round_trips() {
    let scenario = rich_scenario();
    let decoded = Scenario::decode(&encode(&scenario)).expect("decode");
    assert_eq!(decoded, scenario);
    assert_eq!(decoded.units.find(7).map(|u| u.unit_id), Some(74));
    assert_eq!(decoded.triggers.len(), 2);
    assert_eq!(decoded.triggers.triggers[1].effects[0].kind(), EffectKind::ChangeObjectName);
}

#[test]
fn re_encoding_is_byte_exact() {
    let bytes = encode(&rich_scenario());
    let decoded = Scenario::decode(&bytes).expect("decode");
    assert_eq!(encode(&decoded), bytes);

    let level = Compression::best();
    let bytes = rich_scenario().encode_with(level).expect("encode");
    let decoded = Scenario::decode(&bytes).expect("decode");
    assert_eq!(decoded.encode_with(level).expect("re-encode"), bytes);
}

#[test]
fn full_size_scenario_round_trips() {
    let scenario = large_scenario();
    let bytes = encode(&scenario);
    let (decoded, layout) = decode_with_layout(&bytes);

    assert!(layout.body_len > 200 * 1024, "body {}", layout.body_len);
    assert!(layout.body_len > 4 * layout.compressed_len);
    assert_eq!(decoded.map.tiles.len(), 220 * 220);
    assert_eq!(decoded.units.unit_count(), 9 * 400);
    assert_eq!(decoded, scenario);
    assert_eq!(encode(&decoded), bytes);

    let level = Compression::best();
    let bytes = scenario.encode_with(level).expect("encode");
    let decoded = Scenario::decode(&bytes).expect("decode");
    assert_eq!(decoded.encode_with(level).expect("re-encode"), bytes);
}

#[test]
fn foreign_records_are_preserved() {
    let mut odd_effect = EffectRecord::blank(EffectKind::Unknown);
    odd_effect.amount = 9;
    odd_effect.text = "legacy\0".to_string();
    odd_effect.sound_file = "\0".to_string();
    // Text fields come back with their terminator.
    let mut odd_tag = EffectRecord::blank(EffectKind::Unrecognized(77));
    odd_tag.text = "\0".to_string();
    odd_tag.sound_file = "\0".to_string();
    odd_tag.selected_unit_ids = vec![1, 2, 3];
    let mut stray = ConditionRecord::blank(ConditionKind::Timer);
    stray.timer = 5;
    stray.amount = 1;

    let mut trigger = Trigger::new("Legacy", "kept verbatim");
    trigger.push_effect(Effect::Other(odd_effect.clone()));
    trigger.push_effect(Effect::Other(odd_tag.clone()));
    trigger.push_condition(Condition::Other(stray));
    trigger.effect_display_indices = vec![1, 0];

    let mut scenario = minimal_scenario();
    scenario.triggers.push(trigger);

    let bytes = encode(&scenario);
    let decoded = Scenario::decode(&bytes).expect("decode");
    assert_eq!(decoded, scenario);
    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn body_sections_are_inflated_in_order() {
    let scenario = rich_scenario();
    let bytes = encode(&scenario);
    let (_, body, layout) = split(&bytes);

    assert_eq!(body, scenario.encode_body().expect("body"));
    assert_eq!(layout.body_len, body.len());
    assert_eq!(layout.prologue_len + layout.compressed_len, bytes.len());
    let header = layout.section(SectionId::Header).expect("header");
    assert_eq!(header.range.start, 0);
    assert_eq!(&body[4..8], &1.22f32.to_le_bytes());
}

#[test]
fn json_dump_round_trips() {
    let scenario = rich_scenario();
    let value = serde_json::to_value(&scenario).expect("to json");
    assert_eq!(value["instructions"], "Minimal");
    assert_eq!(value["map"]["width"], 8);
    let back: Scenario = serde_json::from_value(value).expect("from json");
    assert_eq!(back, scenario);
}

#[test]
fn deflate_helpers_match_container() {
    let scenario = minimal_scenario();
    let body = scenario.encode_body().expect("body");
    let packed = deflate(&body, Compression::default()).expect("deflate");
    assert_eq!(inflate(&packed).expect("inflate"), body);
}
