use std::collections::HashMap;

pub fn builtin_characters() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "brakka",
            include_str!("../content/characters/brakka.json"),
        ),
        ("seren", include_str!("../content/characters/seren.json")),
        (
            "training_dummy",
            include_str!("../content/characters/training_dummy.json"),
        ),
    ])
}
