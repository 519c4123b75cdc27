use std::path::PathBuf;

use super::*;

fn pcm(frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: 100,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn segment_files_are_matched_by_phase_name() {
    assert_eq!(
        segment_phase(&PathBuf::from("/a/drawing.wav")),
        Some(Phase::Drawing)
    );
    assert_eq!(
        segment_phase(&PathBuf::from("Word_Reveal.MP3")),
        Some(Phase::WordReveal)
    );
    assert_eq!(segment_phase(&PathBuf::from("drawing.txt")), None);
    assert_eq!(segment_phase(&PathBuf::from("music.wav")), None);
}

#[test]
fn cue_sheet_follows_phase_spans() {
    let timeline = Timeline::new(90, 2, 0).unwrap();
    let cues = build_cue_sheet(&timeline);

    // First round has no analyzing phase.
    assert_eq!(cues.len(), 4 + 5);
    assert_eq!(cues[0].phase, Phase::WordReveal);
    assert_eq!(cues[0].start, FrameIndex(0));
    assert_eq!(cues[4].round_index, 1);
    assert_eq!(cues[4].phase, Phase::Analyzing);
    assert_eq!(cues[4].start, FrameIndex(90));
    assert_eq!(cues[4].len_frames, 16);

    let covered = cues.iter().map(|c| c.len_frames).sum::<u64>();
    assert_eq!(covered, timeline.total_frames());
    assert!(cues.windows(2).all(|w| w[0].start.0 + w[0].len_frames == w[1].start.0));
}

#[test]
fn segments_are_placed_at_cues_and_cut_at_phase_end() {
    let fps = Fps::integer(10).unwrap();
    let cues = [
        Cue {
            round_index: 0,
            phase: Phase::WordReveal,
            start: FrameIndex(0),
            len_frames: 2,
        },
        Cue {
            round_index: 0,
            phase: Phase::Drawing,
            start: FrameIndex(2),
            len_frames: 3,
        },
    ];
    let mut segments = PhaseSegments::default();
    // 100 Hz at 10 fps: 10 samples per frame.
    segments.insert(Phase::WordReveal, pcm(50, 0.25));
    segments.insert(Phase::Drawing, pcm(5, -0.5));

    let track = assemble_track(&cues, &segments, fps, 6, 100);
    assert_eq!(track.len(), 60 * 2);

    // Word reveal: truncated to its 20 samples.
    assert!(track[..40].iter().all(|&s| s == 0.25));
    // Drawing: 5 samples of audio, then silence until the end.
    assert!(track[40..50].iter().all(|&s| s == -0.5));
    assert!(track[50..].iter().all(|&s| s == 0.0));
}

#[test]
fn phases_without_segments_stay_silent() {
    let timeline = Timeline::new(30, 1, 0).unwrap();
    let fps = Fps::integer(30).unwrap();
    let track = assemble_track(&build_cue_sheet(&timeline), &PhaseSegments::default(), fps, 30, 48_000);
    assert_eq!(track.len(), 48_000 * 2);
    assert!(track.iter().all(|&s| s == 0.0));
}

#[test]
fn music_is_mixed_and_clamped() {
    let mut track = vec![0.0, 0.9, 0.2, 0.0];
    mix_music(&mut track, &pcm(1, 0.5));
    assert_eq!(track, vec![0.5, 1.0, 0.2, 0.0]);
}
