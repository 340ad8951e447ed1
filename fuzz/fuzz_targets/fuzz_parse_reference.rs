#![no_main]

use libfuzzer_sys::fuzz_target;
use singverse_bible::{
    make_snippet, parse_reference, resolve_route, BibleData, Book, Chapter, Verse,
};
use singverse_melody::{generate_melody, MelodySettings, Schedule};

fn data() -> BibleData {
    let chapter = |texts: &[&str]| Chapter {
        verses: texts
            .iter()
            .enumerate()
            .map(|(i, t)| Verse {
                n: i as u32 + 1,
                t: t.to_string(),
            })
            .collect(),
    };
    BibleData {
        books: vec![
            Book {
                id: "john".to_string(),
                name: "John".to_string(),
                chapters: vec![chapter(&["In the beginning was the Word.", "Jesus wept."])],
            },
            Book {
                id: "1-john".to_string(),
                name: "1 John".to_string(),
                chapters: vec![chapter(&["That which was from the beginning."])],
            },
        ],
        order: vec!["john".to_string(), "1-john".to_string()],
    }
}

fuzz_target!(|input: &str| {
    let data = data();
    let _ = parse_reference(input, &data);
    let _ = resolve_route(&data, input);
    let _ = make_snippet(input, "the");
    let _ = make_snippet("In the beginning was the Word.", input);

    let notes = generate_melody(input, &MelodySettings::default());
    let _ = Schedule::build(&notes, 1.0);
});
