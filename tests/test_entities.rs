use effect_arcade::entities::*;
use effect_arcade::ArcadeError;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq
    assert_eq!(EffectKind::Storm, EffectKind::Storm);
    assert_ne!(EffectKind::Storm, EffectKind::Trash);
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);

    let heading = Heading::new(1, 0);
    let copy = heading;
    assert_eq!(copy, heading);
    assert!(Heading::STILL.is_still());
}

#[test]
fn effect_names_round_trip_through_from_str() {
    for kind in EffectKind::ALL {
        assert_eq!(kind.name().parse::<EffectKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
    assert!(matches!(
        "fireworks".parse::<EffectKind>(),
        Err(ArcadeError::UnknownEffect(name)) if name == "fireworks"
    ));
}

#[test]
fn catalog_has_one_entry_per_effect() {
    assert_eq!(CATALOG.len(), 4);
    for kind in EffectKind::ALL {
        assert_eq!(entity_for(kind).effect, kind);
    }
    let lightning = entity_for(EffectKind::Lightning);
    assert_eq!(lightning.glyph, "佺");
    assert_eq!(lightning.message, "掌门作法");
    assert_eq!(lightning.reveal_word, "涨");
    assert_eq!(lightning.color, ColorTag::Red);
    assert_eq!(entity_for(EffectKind::Storm).color, ColorTag::Green);
}

#[test]
fn draw_entity_covers_the_catalog() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(draw_entity(&mut rng).effect);
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn color_tags_map_to_style_classes() {
    assert_eq!(ColorTag::Red.class_name(), "red-text");
    assert_eq!(ColorTag::Green.class_name(), "green-text");
}
