use super::*;

fn job(audio: Option<AudioInputConfig>) -> EncodeJob {
    EncodeJob {
        frames_dir: PathBuf::from("/tmp/frames"),
        total_frames: 4,
        failed_frames: Vec::new(),
        fps: 30,
        out_path: PathBuf::from("/tmp/out.mp4"),
        audio,
    }
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn has_pair(args: &[String], a: &str, b: &str) -> bool {
    args.windows(2).any(|w| w[0] == a && w[1] == b)
}

#[test]
fn concat_list_lists_every_frame_and_repeats_the_last() {
    let text = concat_list_text(3, &[], 25);
    assert_eq!(
        text,
        "file 'frame_00000.png'\nduration 0.040000\n\
         file 'frame_00001.png'\nduration 0.040000\n\
         file 'frame_00002.png'\nduration 0.040000\n\
         file 'frame_00002.png'\n"
    );
}

#[test]
fn failed_frames_extend_their_neighbour() {
    let text = concat_list_text(5, &[3, 0], 10);
    assert_eq!(
        text,
        "file 'frame_00001.png'\nduration 0.200000\n\
         file 'frame_00002.png'\nduration 0.200000\n\
         file 'frame_00004.png'\nduration 0.100000\n\
         file 'frame_00004.png'\n"
    );
}

#[test]
fn concat_profile_arguments() {
    let args = strings(&job(None).args(EncodeProfile::Concat));
    assert_eq!(args[0], "-y");
    assert!(has_pair(&args, "-f", "concat"));
    assert!(has_pair(&args, "-safe", "0"));
    assert!(has_pair(&args, "-i", "/tmp/frames/frames.txt"));
    assert!(has_pair(&args, "-crf", "23"));
    assert!(has_pair(&args, "-preset", "medium"));
    assert!(has_pair(&args, "-pix_fmt", "yuv420p"));
    assert!(args.contains(&"-an".to_string()));
    assert_eq!(args.last().unwrap(), "/tmp/out.mp4");
}

#[test]
fn image_sequence_profile_arguments() {
    let args = strings(&job(None).args(EncodeProfile::ImageSequence));
    assert!(has_pair(&args, "-framerate", "30"));
    assert!(has_pair(&args, "-i", "/tmp/frames/frame_%05d.png"));
    assert!(!args.contains(&"concat".to_string()));
}

#[test]
fn audio_input_is_muxed_with_aac() {
    let audio = AudioInputConfig {
        path: PathBuf::from("/tmp/track.f32le"),
        sample_rate: 48_000,
        channels: 2,
    };
    let args = strings(&job(Some(audio)).args(EncodeProfile::Concat));
    assert!(has_pair(&args, "-f", "f32le"));
    assert!(has_pair(&args, "-ar", "48000"));
    assert!(has_pair(&args, "-ac", "2"));
    assert!(has_pair(&args, "-i", "/tmp/track.f32le"));
    assert!(has_pair(&args, "-c:a", "aac"));
    assert!(args.contains(&"-shortest".to_string()));
    assert!(!args.contains(&"-an".to_string()));
}

#[test]
fn invalid_jobs_fail_before_spawning() {
    let mut j = job(None);
    j.fps = 0;
    assert!(matches!(encode_frames(&j), Err(ReelError::Encode(_))));

    let mut j = job(None);
    j.total_frames = 0;
    assert!(matches!(encode_frames(&j), Err(ReelError::Encode(_))));
}

#[test]
fn stderr_tail_keeps_last_lines() {
    let long = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let tail = stderr_tail(&long);
    assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
    assert!(tail.ends_with("line 49"));
}
