use super::*;

#[test]
fn parses_generator_summary() {
    let text = "Round 3\n--------\nActual Word: Hot Air Balloon\nImage File: round_3_hot_air_balloon.png\nAI's Wrong Guess: jellyfish\n";
    let s = parse_summary(text).unwrap();
    assert_eq!(s.round_number, Some(3));
    assert_eq!(s.prompt, "Hot Air Balloon");
    assert_eq!(s.image_file.as_deref(), Some("round_3_hot_air_balloon.png"));
    assert_eq!(s.guess.as_deref(), Some("jellyfish"));
}

#[test]
fn keys_are_case_insensitive_and_values_trimmed() {
    let s = parse_summary("final WORD:   \"lighthouse\"  \n").unwrap();
    assert_eq!(s.prompt, "lighthouse");
    assert_eq!(s.round_number, None);
    assert_eq!(s.image_file, None);
}

#[test]
fn missing_prompt_is_a_data_error() {
    let err = parse_summary("Round 1\nImage File: a.png\n").unwrap_err();
    assert!(matches!(err, ReelError::Data(_)));
}
