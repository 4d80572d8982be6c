//! Option and channel-state serialization (requires the `serde` feature)

#![cfg(feature = "serde")]

use ripple_core::Heartbeat;
use ripple_motion::{
    ChannelKey, ChannelPatch, EasingDirection, EasingStyle, Motion, MotionOptions, Repeat,
    SpringOptions, SpringPreset, TweenOptions,
};

#[test]
fn test_spring_options_from_partial_json() {
    let options: SpringOptions =
        serde_json::from_str(r#"{ "tension": 300.0, "friction": 10.0 }"#).unwrap();

    assert_eq!(options.tension, Some(300.0));
    assert_eq!(options.friction, Some(10.0));
    assert_eq!(options.mass, None);

    let merged = options.merged_over(&SpringPreset::Gentle.options());
    assert_eq!(merged.tension, Some(300.0));
}

#[test]
fn test_tween_options_from_json() {
    let options: TweenOptions = serde_json::from_str(
        r#"{
            "time": 0.5,
            "style": "Bounce",
            "direction": "InOut",
            "repeat_count": { "Count": 2 },
            "reverses": true
        }"#,
    )
    .unwrap();

    assert_eq!(options.time, Some(0.5));
    assert_eq!(options.style, Some(EasingStyle::Bounce));
    assert_eq!(options.direction, Some(EasingDirection::InOut));
    assert_eq!(options.repeat_count, Some(Repeat::Count(2)));
    assert_eq!(options.delay_time, None);

    let forever: Repeat = serde_json::from_str(r#""Forever""#).unwrap();
    assert_eq!(forever, Repeat::Forever);
}

#[test]
fn test_channel_state_replays_through_json() {
    let source = Motion::with_options(vec![0.0f32, 0.0], MotionOptions::new().clock(Heartbeat::new()));
    source
        .spring(vec![Some(10.0), Some(-10.0)], &SpringOptions::new())
        .unwrap();
    for _ in 0..5 {
        source.step(1.0 / 60.0).unwrap();
    }

    let saved: Vec<String> = source
        .channels()
        .iter()
        .map(|key| serde_json::to_string(&source.channel(key).unwrap()).unwrap())
        .collect();

    let restored = Motion::with_options(vec![0.0f32, 0.0], MotionOptions::new().clock(Heartbeat::new()));
    let patches = restored
        .channels()
        .into_iter()
        .zip(&saved)
        .map(|(key, json)| (key, serde_json::from_str::<ChannelPatch>(json).unwrap()))
        .collect::<Vec<_>>();
    restored.patch(patches).unwrap();

    assert_eq!(restored.get(), source.get());
    assert_eq!(restored.get_velocity(), source.get_velocity());
    assert!(!restored.is_complete());
}

#[test]
fn test_channel_key_serializes() {
    assert_eq!(serde_json::to_string(&ChannelKey::Index(3)).unwrap(), r#"{"Index":3}"#);
    assert_eq!(serde_json::to_string(&ChannelKey::Value).unwrap(), r#""Value""#);
}
