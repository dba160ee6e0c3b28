// mpeg1-player
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demo player: decodes an MPEG-1 Program Stream, plays the audio on the default output
//! device, and reports video frame delivery. There is no display surface; video frames are
//! decoded and accounted for, nothing more.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{App, Arg};
use log::{error, info, warn};

use mpeg1_core::errors::unsupported_error;
use mpeg1_core::Result;
use mpeg1_player::output::CpalAudioOutput;
use mpeg1_player::{Player, DEFAULT_PROBE_SIZE};

fn main() {
    pretty_env_logger::init();

    let matches = App::new("MPEG-1 Play")
        .version("1.0")
        .about("Play MPEG-1 program streams")
        .arg(
            Arg::new("seek")
                .long("seek")
                .short('s')
                .takes_value(true)
                .value_name("TIME")
                .help("Seek to the given position in seconds before playing"),
        )
        .arg(Arg::new("loop").long("loop").help("Loop back to the start at the end of the stream"))
        .arg(Arg::new("no-video").long("no-video").help("Skip video decoding"))
        .arg(Arg::new("no-audio").long("no-audio").help("Skip audio decoding"))
        .arg(
            Arg::new("audio-stream")
                .long("audio-stream")
                .takes_value(true)
                .value_name("INDEX")
                .help("Audio stream to play (0-3)"),
        )
        .arg(
            Arg::new("INPUT")
                .help("The MPEG program stream file to play")
                .required(true)
                .index(1),
        )
        .get_matches();

    let path = matches.value_of("INPUT").unwrap();
    let seek = matches.value_of("seek").and_then(|v| v.parse::<f64>().ok());
    let audio_stream =
        matches.value_of("audio-stream").and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);

    let options = PlayOptions {
        loop_playback: matches.is_present("loop"),
        no_video: matches.is_present("no-video"),
        no_audio: matches.is_present("no-audio"),
        audio_stream,
        seek,
    };

    if let Err(err) = run(path, &options) {
        error!("{}: {}", path, err);
        std::process::exit(1);
    }
}

struct PlayOptions {
    loop_playback: bool,
    no_video: bool,
    no_audio: bool,
    audio_stream: usize,
    seek: Option<f64>,
}

fn run(path: &str, options: &PlayOptions) -> Result<()> {
    let mut player = Player::with_filename(path)?;
    player.set_loop(options.loop_playback);
    player.set_video_enabled(!options.no_video);
    player.set_audio_enabled(!options.no_audio);
    player.set_audio_stream(options.audio_stream);

    if !player.has_headers() && !player.probe(DEFAULT_PROBE_SIZE) {
        return unsupported_error("no MPEG-1 program stream headers found");
    }

    info!(
        "{}: {}x{} @ {:.3} fps, {} Hz audio, {:.1} s",
        path,
        player.width(),
        player.height(),
        player.framerate(),
        player.samplerate(),
        player.duration()
    );

    let frames_delivered = Rc::new(RefCell::new(0u64));
    let counter = Rc::clone(&frames_delivered);
    player.set_video_decode_callback(move |frame| {
        log::trace!("video frame at {:.3} s", frame.time);
        *counter.borrow_mut() += 1;
    });

    if player.audio_enabled() && player.samplerate() > 0 {
        match CpalAudioOutput::try_open(player.samplerate()) {
            Ok(mut audio_output) => {
                player.set_audio_decode_callback(move |samples| {
                    if audio_output.write(samples).is_err() {
                        warn!("audio output stream closed");
                    }
                });
            }
            Err(err) => {
                warn!("audio output unavailable ({:?}), decoding without playback", err);
                player.set_audio_decode_callback(|_| ());
            }
        }
    }

    if let Some(seek_time) = options.seek {
        if !player.seek(seek_time, true) {
            warn!("seek to {:.3} s failed, playing from the start", seek_time);
        }
    }

    // Drive the virtual clock from the wall clock. The tick is clamped so a long stall (e.g. a
    // suspended terminal) doesn't make the player churn through seconds of frames at once.
    let framerate = player.framerate();
    let max_tick = if framerate > 0.0 { 2.0 / framerate } else { 2.0 / 30.0 };

    let mut last = Instant::now();
    while !player.has_ended() {
        let now = Instant::now();
        let tick = now.duration_since(last).as_secs_f64().min(max_tick);
        last = now;

        player.decode(tick);
        std::thread::sleep(Duration::from_millis(4));
    }

    info!(
        "done: {:.1} s played, {} video frames delivered",
        player.time(),
        frames_delivered.borrow()
    );

    Ok(())
}
