// Copyright (c) 2024 Mike Tsao

//! The `export-progression` example builds a timeline from preset chord
//! progressions, walks it once through the transport, and writes it out as a
//! MIDI file.

use chordline::{playback::RecordingAudioSink, prelude::*};
use clap::Parser;
use std::path::PathBuf;

/// The program's command-line arguments.
#[derive(clap::Parser, Debug, Default)]
#[clap(author, about, version, long_about = None)]
struct Args {
    /// List the preset progressions and exit
    #[clap(short = 'l', long, value_parser)]
    list: bool,

    /// Preset progressions to lay out, one section each (e.g. "ii-V-I")
    #[clap(short = 'p', long = "progression", value_parser)]
    progressions: Vec<String>,

    /// Tempo in beats per minute [default: from settings]
    #[clap(short = 'b', long, value_parser)]
    bpm: Option<u16>,

    /// Shuffle the chords within each section
    #[clap(short = 's', long, value_parser)]
    shuffle: bool,

    /// Print each beat as the transport plays it
    #[clap(long, value_parser)]
    preview: bool,

    /// Directory to write the MIDI file to
    #[clap(short = 'o', long, value_parser, default_value = ".")]
    output_dir: PathBuf,

    /// Settings file [default: settings.json in the user data directory]
    #[clap(long, value_parser)]
    settings: Option<PathBuf>,

    /// Also save the timeline as a playlist with this name
    #[clap(long, value_parser)]
    save_as: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        for p in Progression::PRESETS {
            println!("{:<14} {:<16} {}", p.name, p.label, p.chords.join(" "));
        }
        return Ok(());
    }

    let settings_path = args.settings.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path).unwrap_or_else(|e| {
        eprintln!("Using default settings ({e})");
        Settings::default()
    });
    let mut session = Session::new_from_settings(settings);
    if let Some(bpm) = args.bpm {
        session.set_tempo(Tempo::from(bpm));
    }

    let names = if args.progressions.is_empty() {
        vec!["I-V-vi-IV".to_string()]
    } else {
        args.progressions
    };
    for (index, name) in names.iter().enumerate() {
        let Some(progression) = Progression::preset(name) else {
            return Err(anyhow::format_err!(
                "Unknown progression '{name}' (try --list)"
            ));
        };
        if index > 0 {
            session.add_section();
        }
        session.apply_progression(index, progression.chords);
        if args.shuffle {
            session.shuffle_section_chords(index);
        }
    }

    if args.preview {
        preview(&mut session);
    }

    if let Some(name) = args.save_as.as_deref() {
        match session.save_as_playlist(name) {
            Some(id) => println!(
                "Saved playlist {id} to {}",
                session.settings().playlist_directory().display()
            ),
            None => eprintln!("Playlist names can't be blank"),
        }
    }

    let export = session.export_midi();
    let path = export.write_to_dir(&args.output_dir)?;
    let smf = midly::Smf::parse(export.bytes())?;
    println!(
        "Wrote {} ({} bytes, {} events) at {}",
        path.display(),
        export.bytes().len(),
        smf.tracks.iter().map(|t| t.len()).sum::<usize>(),
        session.tempo()
    );
    Ok(())
}

// Runs the transport once around the timeline without waiting between beats.
fn preview(session: &mut Session) {
    let mut sink = RecordingAudioSink::default();
    let total_beats = session.timeline().total_beats();
    let Some(mut tick) = session.toggle_playback(&mut sink) else {
        return;
    };
    for _ in 0..total_beats {
        if let Some(chord) = tick.chord.as_ref() {
            let pitches: Vec<String> = chord.pitches.iter().map(|p| p.to_string()).collect();
            println!(
                "{:>8}  {:<6} {} ({:.2}s)",
                tick.position.to_string(),
                chord.name,
                pitches.join("-"),
                chord.seconds
            );
        }
        match session.tick(&mut sink) {
            Some(next) => tick = next,
            None => break,
        }
    }
    session.stop_playback();
}
