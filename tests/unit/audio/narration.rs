use super::*;

#[test]
fn from_config_takes_program_and_voice() {
    let cfg = NarrationConfig {
        program: "espeak".to_owned(),
        voice: "en-us".to_owned(),
        ..NarrationConfig::default()
    };
    let s = CommandSynthesizer::from_config(&cfg);
    assert_eq!(s, CommandSynthesizer::new("espeak", "en-us"));
    assert_eq!(s.program(), "espeak");
}

#[test]
fn missing_program_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    let s = CommandSynthesizer::new("versus-no-such-synthesizer", "en");
    let err = s
        .synthesize("Who has most goals", &dir.path().join("n.wav"))
        .unwrap_err();
    assert!(matches!(err, VersusError::Encoding(_)));
}

#[test]
fn blank_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let s = CommandSynthesizer::new("espeak-ng", "en");
    assert!(matches!(
        s.synthesize("  ", &dir.path().join("n.wav")),
        Err(VersusError::Validation(_))
    ));
}
