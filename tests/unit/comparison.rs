use super::*;

#[test]
fn winner_is_strictly_larger_value() {
    assert_eq!(winner_of(213, 1121), Some(Side::B));
    assert_eq!(winner_of(1121, 213), Some(Side::A));
    assert_eq!(winner_of(50, 50), None);
    assert_eq!(winner_of(0, 0), None);
}

#[test]
fn new_rejects_negative_stats_and_empty_names() {
    assert!(matches!(
        ComparisonSpec::new("Goals", "Messi", "Ronaldo", -1, 3),
        Err(VersusError::InvalidSpec(_))
    ));
    assert!(matches!(
        ComparisonSpec::new("Goals", "  ", "Ronaldo", 1, 3),
        Err(VersusError::InvalidSpec(_))
    ));
    assert!(matches!(
        ComparisonSpec::new("", "Messi", "Ronaldo", 1, 3),
        Err(VersusError::InvalidSpec(_))
    ));
}

#[test]
fn json_accepts_player_aliases_and_integer_strings() {
    let spec = ComparisonSpec::from_json_str(
        r#"{"title":"Assists","player1":"Xavi","player2":"Iniesta","stat1":"213","stat2":1121}"#,
    )
    .unwrap();
    assert_eq!(spec.title(), "Assists");
    assert_eq!(spec.subject(Side::A).name, "Xavi");
    assert_eq!(spec.subject(Side::A).final_value, 213);
    assert_eq!(spec.subject(Side::B).final_value, 1121);
    assert_eq!(spec.winner(), Some(Side::B));
    assert!(spec.secondary_stats().is_empty());
}

#[test]
fn json_rejects_non_numeric_stats() {
    let err = ComparisonSpec::from_json_str(
        r#"{"title":"Goals","subjectA":"A","subjectB":"B","statA":"many","statB":3}"#,
    )
    .unwrap_err();
    assert!(matches!(err, VersusError::InvalidSpec(_)));

    let err = ComparisonSpec::from_json_str(
        r#"{"title":"Goals","subjectA":"A","subjectB":"B","statA":1.5,"statB":3}"#,
    )
    .unwrap_err();
    assert!(matches!(err, VersusError::InvalidSpec(_)));
}

#[test]
fn json_parses_secondary_stats_in_order() {
    let spec = ComparisonSpec::from_json_str(
        r#"{
            "title": "Goals",
            "subjectA": "A",
            "subjectB": "B",
            "statA": 10,
            "statB": 20,
            "secondaryStats": [
                {"label": "Matches", "value": 700},
                {"label": "Ratio", "value": 0.75},
                {"label": "Club", "value": "Inter Miami"}
            ]
        }"#,
    )
    .unwrap();
    let stats = spec.secondary_stats();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0].value, StatValue::Integer(700));
    assert_eq!(stats[1].value.to_string(), "0.75");
    assert_eq!(stats[2].value.to_string(), "Inter Miami");
}

#[test]
fn series_position_is_optional_and_validated() {
    let plain = ComparisonSpec::new("Goals", "A", "B", 1, 2).unwrap();
    assert_eq!(plain.series(), None);

    let spec = plain.clone().with_series(2, 3).unwrap();
    assert_eq!(spec.series().unwrap().to_string(), "2/3");
    assert!(matches!(
        plain.clone().with_series(0, 3),
        Err(VersusError::InvalidSpec(_))
    ));
    assert!(plain.with_series(4, 3).is_err());

    let parsed = ComparisonSpec::from_json_str(
        r#"{"title": "Goals", "player1": "A", "player2": "B", "stat1": 1, "stat2": 2,
            "series": {"index": 1, "count": 3}}"#,
    )
    .unwrap();
    assert_eq!(parsed.series(), Some(SeriesPosition { index: 1, count: 3 }));
}
