/// Fixed symbol table, ordered by character.
///
/// `<` and `>` are reserved with empty patterns. They are valid entries that
/// play as silence.
pub static MORSE_TABLE: [(&str, char); 47] = [
    ("--..--", ','), ("-....-", '-'), (".-.-.-", '.'), ("-..-.", '/'),
    ("-----", '0'), (".----", '1'), ("..---", '2'), ("...--", '3'),
    ("....-", '4'), (".....", '5'), ("-....", '6'), ("--...", '7'),
    ("---..", '8'), ("----.", '9'), ("---...", ':'), ("-.-.-.", ';'),
    ("", '<'), ("-...-", '='), ("", '>'), ("..--..", '?'),
    (".--.-.", '@'), (".-", 'A'), ("-...", 'B'), ("-.-.", 'C'),
    ("-..", 'D'), (".", 'E'), ("..-.", 'F'), ("--.", 'G'),
    ("....", 'H'), ("..", 'I'), (".---", 'J'), ("-.-", 'K'),
    (".-..", 'L'), ("--", 'M'), ("-.", 'N'), ("---", 'O'),
    (".--.", 'P'), ("--.-", 'Q'), (".-.", 'R'), ("...", 'S'),
    ("-", 'T'), ("..-", 'U'), ("...-", 'V'), (".--", 'W'),
    ("-..-", 'X'), ("-.--", 'Y'), ("--..", 'Z'),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Tone length in units.
    pub fn units(self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
        }
    }
}

/// Outcome of looking a character up in [`MORSE_TABLE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Table entry with a non-empty pattern.
    Found(usize),
    /// Reserved entry: known character, no sound.
    Silent(usize),
    NotFound,
}

/// Index of `c` in the table. First match wins; lowercase is folded to
/// uppercase before the scan.
pub fn find_index(c: char) -> Option<usize> {
    let c = c.to_ascii_uppercase();
    MORSE_TABLE.iter().position(|&(_, letter)| letter == c)
}

pub fn lookup(c: char) -> Lookup {
    match find_index(c) {
        Some(index) if MORSE_TABLE[index].0.is_empty() => Lookup::Silent(index),
        Some(index) => Lookup::Found(index),
        None => Lookup::NotFound,
    }
}

/// Dot/dash pattern of the entry at `index`, as written in the table.
pub(crate) fn pattern(index: usize) -> &'static str {
    MORSE_TABLE[index].0
}

pub(crate) fn symbols(index: usize) -> impl Iterator<Item = Symbol> {
    pattern(index)
        .chars()
        .map(|c| if c == '-' { Symbol::Dash } else { Symbol::Dot })
}

/// Pattern for `c`, or `None` for unknown characters and reserved entries.
pub fn encode(c: char) -> Option<&'static str> {
    match lookup(c) {
        Lookup::Found(index) => Some(pattern(index)),
        Lookup::Silent(_) | Lookup::NotFound => None,
    }
}

/// Renders `text` as dot/dash notation: letters separated by a space, words
/// by ` / `. Characters without a pattern are left out.
pub fn render(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().filter_map(encode).collect::<Vec<_>>().join(" "))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}
