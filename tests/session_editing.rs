// Copyright (c) 2024 Mike Tsao

use chordline::{
    playback::{AudioSinkCall, PlaybackCursor, RecordingAudioSink},
    prelude::*,
};
use float_cmp::approx_eq;

fn layout(session: &Session, index: usize) -> Vec<(String, usize, usize)> {
    session.sections()[index]
        .chords
        .iter()
        .map(|c| (c.name.clone(), c.start_beat, c.duration))
        .collect()
}

#[test]
fn build_a_song_by_hand() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = Session::default().with_rng(Rng::new_with_seed(0xc0ffee));

    // A verse from a preset progression.
    assert!(session.apply_progression(0, Progression::preset("I-V-vi-IV").unwrap().chords));
    assert_eq!(
        layout(&session, 0),
        vec![
            ("C".to_string(), 0, 4),
            ("G".to_string(), 4, 4),
            ("Am".to_string(), 8, 4),
            ("F".to_string(), 12, 4),
        ]
    );

    // Second verse is the same, but the last chord turns into a two-beat
    // turnaround. Clicking inside the F span opens it rather than adding one.
    let second = session.duplicate_section(0).unwrap();
    assert_eq!(session.sections()[1].id, second);
    let f = session.add_or_edit_chord(1, 13).unwrap();
    assert_eq!(f.name, "F");
    assert!(session.resize_span(1, f.id, ResizeEdge::Right, 14));
    session.cancel_edit();

    // The freed beats get a G7 by clicking, then editing the new chord.
    let g7 = session.add_or_edit_chord(1, 14).unwrap();
    assert_eq!((g7.name.as_str(), g7.duration), ("C", 1));
    assert!(session.update_chord(ChordSpan {
        name: "G7".to_string(),
        duration: 2,
        ..g7
    }));
    assert_eq!(
        layout(&session, 1)[3..],
        [("F".to_string(), 12, 2), ("G7".to_string(), 14, 2)]
    );
    assert!(!session.sections()[1].has_overlaps());

    // A bridge, copied from the first verse and then shuffled.
    session.add_section();
    assert!(session.copy_section(0));
    assert!(session.paste_section(2));
    assert!(session.shuffle_section_chords(2));
    let mut bridge_names: Vec<String> = layout(&session, 2).into_iter().map(|c| c.0).collect();
    bridge_names.sort();
    assert_eq!(bridge_names, vec!["Am", "C", "F", "G"]);
    assert_eq!(
        layout(&session, 2)
            .iter()
            .map(|c| (c.1, c.2))
            .collect::<Vec<_>>(),
        vec![(0, 4), (4, 4), (8, 4), (12, 4)]
    );

    assert_eq!(session.timeline().total_beats(), 48);
}

#[test]
fn resize_is_clamped_and_may_overlap() {
    let mut session = Session::default();
    session.apply_progression(0, &["C", "G"]);
    let c = session.sections()[0].chords[0].clone();

    // Dragging far past the end clamps to the section.
    session.resize_span(0, c.id, ResizeEdge::Right, 40);
    assert_eq!(session.sections()[0].chords[0].duration, 16);
    // ...and now C runs over G. That's allowed.
    assert!(session.sections()[0].has_overlaps());

    session.resize_span(0, c.id, ResizeEdge::Right, -3);
    assert_eq!(session.sections()[0].chords[0].duration, 1);

    let g = session.sections()[0].chords[1].clone();
    session.resize_span(0, g.id, ResizeEdge::Left, -7);
    let g = session.sections()[0].span(g.id).unwrap().clone();
    assert_eq!((g.start_beat, g.duration), (0, 16));
    session.resize_span(0, g.id, ResizeEdge::Left, 99);
    let g = session.sections()[0].span(g.id).unwrap().clone();
    assert_eq!((g.start_beat, g.duration), (15, 1));

    assert!(!session.resize_span(3, g.id, ResizeEdge::Left, 0));
}

#[test]
fn playback_follows_edits_and_tempo() {
    let mut session = Session::default();
    session.add_section();
    session.apply_progression(0, &["C"]);
    session.apply_progression(1, &["Am", "Bdim"]);
    session.set_tempo(Tempo::new(60));

    let mut sink = RecordingAudioSink::default();
    let first = session.toggle_playback(&mut sink).unwrap();
    assert_eq!(sink.init_count(), 1);
    assert_eq!(first.position, BeatPosition::default());
    assert_eq!(first.next_delay.as_millis(), 1000);

    let mut heard = sink.take_calls();
    for _ in 1..32 {
        session.tick(&mut sink).unwrap();
        heard.extend(sink.take_calls());
    }
    let chords: Vec<(Vec<String>, f64)> = heard
        .into_iter()
        .map(|call| match call {
            AudioSinkCall::Chord {
                pitches, seconds, ..
            } => (pitches.iter().map(|p| p.to_string()).collect(), seconds),
            AudioSinkCall::Note { .. } => panic!("transport plays chords"),
        })
        .collect();
    assert_eq!(chords.len(), 3);
    assert_eq!(chords[0].0, vec!["C", "E", "G"]);
    assert!(approx_eq!(f64, chords[0].1, 16.0, ulps = 2));
    assert_eq!(chords[1].0, vec!["A", "C", "E"]);
    assert_eq!(chords[2].0, vec!["B", "D", "F"]);
    assert!(approx_eq!(f64, chords[2].1, 8.0, ulps = 2));

    // Wrapped around to the top.
    assert_eq!(session.cursor().global_beat, 0);

    // Speeding up applies on the next tick.
    session.set_tempo(Tempo::new(120));
    let tick = session.tick(&mut sink).unwrap();
    assert_eq!(tick.next_delay.as_millis(), 500);
    assert!(approx_eq!(f64, tick.chord.unwrap().seconds, 8.0, ulps = 2));

    // Structural edits stop the transport.
    session.apply_progression(1, &["D"]);
    assert!(!session.is_playing());
    assert!(session.tick(&mut sink).is_none());

    // Toggling twice starts and stops. Only the start prepares the sink.
    assert!(session.toggle_playback(&mut sink).is_some());
    assert!(session.toggle_playback(&mut sink).is_none());
    assert_eq!(sink.init_count(), 2);
    assert_eq!(session.cursor(), &PlaybackCursor::default());
}
