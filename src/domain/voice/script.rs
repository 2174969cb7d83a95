/// Check whether the text contains at least one character from the Bengali
/// Unicode block (U+0980..U+09FF). Used to steer multilingual voices toward
/// Bengali without asking the caller for a language.
pub fn contains_bengali(text: &str) -> bool {
    let block = regex::Regex::new(r"[\u{0980}-\u{09FF}]").unwrap();
    block.is_match(text)
}
