use super::*;

fn spec(a: &str, b: &str, va: i64, vb: i64) -> ComparisonSpec {
    ComparisonSpec::new("Goals", a, b, va, vb).unwrap()
}

#[test]
fn key_is_order_independent() {
    assert_eq!(
        ComparisonKey::of(&spec("Messi", "Ronaldo", 10, 20)),
        ComparisonKey::of(&spec("Ronaldo", "Messi", 20, 10))
    );
    assert_ne!(
        ComparisonKey::of(&spec("Messi", "Ronaldo", 10, 20)),
        ComparisonKey::of(&spec("Messi", "Ronaldo", 20, 10))
    );
}

#[test]
fn file_name_sorts_subjects_and_sanitizes() {
    let s = ComparisonSpec::new("Hat tricks", "Zlatan Ibra-himovic", "Eden Hazard", 5, 2).unwrap();
    assert_eq!(
        suggested_file_name(&s),
        "Hat_tricks_Eden_Hazard_vs_Zlatan_Ibra_himovic_2_5.mp4"
    );
}

#[test]
fn in_memory_registry_rejects_repeats() {
    let mut reg = InMemoryRegistry::new();
    let s = spec("A", "B", 1, 2);
    assert!(reg.is_unique(&s));
    reg.record(&s).unwrap();
    assert!(!reg.is_unique(&spec("B", "A", 2, 1)));
    assert_eq!(reg.len(), 1);
}

#[test]
fn json_registry_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    let s = spec("A", "B", 1, 2);
    {
        let mut reg = JsonFileRegistry::open(&path).unwrap();
        assert!(reg.is_unique(&s));
        reg.record(&s).unwrap();
    }
    let reg = JsonFileRegistry::open(&path).unwrap();
    assert!(!reg.is_unique(&s));
    assert_eq!(reg.path(), path.as_path());
}
